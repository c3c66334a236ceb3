use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use serde_yaml;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Bookmark;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_LOG_FILE: &str = "info.log";

#[derive(Parser, Debug)]
#[command(name = "bookmarks")]
#[command(about = "Runs the bookmarks service", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".bookmarks")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

/// `production` or anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "String")]
pub enum DeploymentMode {
    Production,
    #[default]
    Development,
}

impl DeploymentMode {
    pub fn is_production(&self) -> bool {
        *self == DeploymentMode::Production
    }
}

impl From<String> for DeploymentMode {
    fn from(mode: String) -> Self {
        DeploymentMode::from(mode.as_str())
    }
}

impl From<&str> for DeploymentMode {
    fn from(mode: &str) -> Self {
        match mode.trim() {
            "production" => DeploymentMode::Production,
            _ => DeploymentMode::Development,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    api_token: String,
    #[serde(default)]
    pub mode: DeploymentMode,
    #[serde(default = "default_log_file")]
    log_file: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

impl Default for App {
    fn default() -> Self {
        App {
            port: DEFAULT_PORT,
            api_token: String::new(),
            mode: DeploymentMode::default(),
            log_file: default_log_file(),
        }
    }
}

impl App {
    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn get_api_token(&self) -> &str {
        &self.api_token
    }

    pub fn get_log_file(&self) -> &str {
        &self.log_file
    }
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    /// Loaded into the store at startup, in file order.
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let cfg = Config::load_config(path)?;
        Ok(cfg)
    }

    /// `--config` wins, then the default config file if one exists, then the
    /// process environment.
    pub fn load(cli: &Cli) -> Result<Self> {
        Config::load_with_default(cli, &default_config_path())
    }

    fn load_with_default(cli: &Cli, default_path: &Path) -> Result<Self> {
        if let Some(path) = &cli.config_path {
            return Config::new(path).with_context(|| format!("loading config from {}", path));
        }

        if default_path.exists() {
            let path = default_path.to_string_lossy();
            return Config::new(&path).with_context(|| format!("loading config from {}", path));
        }

        Config::from_env()
    }

    pub fn from_env() -> Result<Self> {
        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("invalid PORT value {:?}", port))?,
            Err(_) => DEFAULT_PORT,
        };

        let app = App {
            port,
            api_token: env::var("API_TOKEN").unwrap_or_default(),
            mode: env::var("NODE_ENV")
                .map(DeploymentMode::from)
                .unwrap_or_default(),
            log_file: env::var("LOG_FILE").unwrap_or_else(|_| default_log_file()),
        };

        Ok(Config {
            app,
            bookmarks: vec![],
        })
    }

    fn load_config(path: &str) -> Result<Config> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    fn from_yaml(yaml_str: &str) -> Result<Config> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        Ok(config)
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            if let Some(end) = result[actual_start..].find("}") {
                let var_name = &result[actual_start + 2..actual_start + end];

                // ${VAR:-default}
                let env_value = if let Some(default_start) = var_name.find(":-") {
                    let actual_var = &var_name[..default_start];
                    let default_val = &var_name[default_start + 2..];
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                } else {
                    env::var(var_name).unwrap_or_else(|_| {
                        eprintln!("Warning: Environment variable '{}' not found", var_name);
                        String::new()
                    })
                };

                result.replace_range(actual_start..actual_start + end + 1, &env_value);
                offset = actual_start + env_value.len();
            } else {
                break;
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_mode_parsing() {
        assert_eq!(DeploymentMode::from("production"), DeploymentMode::Production);
        assert_eq!(DeploymentMode::from("development"), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from("test"), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from("Production"), DeploymentMode::Development);
        assert_eq!(DeploymentMode::from(""), DeploymentMode::Development);
    }

    #[test]
    fn test_substitute_env_vars_defaults() {
        let out = Config::substitute_env_vars(
            "port: ${BOOKMARKS_TEST_UNSET_PORT:-9001}\ntoken: \"${BOOKMARKS_TEST_UNSET_TOKEN}\"",
        )
        .unwrap();
        assert_eq!(out, "port: 9001\ntoken: \"\"");
    }

    #[test]
    fn test_substitute_env_vars_unterminated() {
        let out = Config::substitute_env_vars("token: ${OOPS").unwrap();
        assert_eq!(out, "token: ${OOPS");
    }

    #[test]
    fn test_from_yaml_with_seed() {
        let cfg = Config::from_yaml(
            r#"
app:
  port: 3000
  api_token: "abc123"
  mode: production
  log_file: /tmp/bookmarks.log
bookmarks:
  - id: "seed-1"
    title: "Rust"
    url: "https://www.rust-lang.org"
    rating: 5
  - id: "seed-2"
    title: "Docs"
"#,
        )
        .unwrap();

        assert_eq!(cfg.app.get_port(), 3000);
        assert_eq!(cfg.app.get_api_token(), "abc123");
        assert!(cfg.app.mode.is_production());
        assert_eq!(cfg.app.get_log_file(), "/tmp/bookmarks.log");
        assert_eq!(cfg.bookmarks.len(), 2);
        assert_eq!(cfg.bookmarks[0].id, "seed-1");
        assert_eq!(cfg.bookmarks[0].rating, Some(serde_json::json!(5)));
        assert_eq!(cfg.bookmarks[1].url, None);
    }

    #[test]
    fn test_from_yaml_defaults() {
        let cfg = Config::from_yaml("app:\n  api_token: \"${BOOKMARKS_TEST_UNSET_TOKEN}\"\n").unwrap();

        assert_eq!(cfg.app.get_port(), DEFAULT_PORT);
        assert_eq!(cfg.app.get_api_token(), "");
        assert_eq!(cfg.app.mode, DeploymentMode::Development);
        assert_eq!(cfg.app.get_log_file(), DEFAULT_LOG_FILE);
        assert!(cfg.bookmarks.is_empty());
    }

    #[test]
    fn test_new_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  port: ${{BOOKMARKS_TEST_UNSET_PORT:-8123}}").unwrap();

        let cfg = Config::new(file.path().to_str().unwrap()).unwrap();
        assert_eq!(cfg.app.get_port(), 8123);
    }

    #[test]
    fn test_new_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        assert!(Config::new(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_prefers_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  port: 4321\n  mode: production").unwrap();

        let cli = Cli {
            config_path: Some(file.path().to_string_lossy().into_owned()),
        };
        let cfg = Config::load(&cli).unwrap();
        assert_eq!(cfg.app.get_port(), 4321);
        assert!(cfg.app.mode.is_production());
    }

    #[test]
    fn test_load_uses_default_file_without_cli_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "app:\n  port: 5555\nbookmarks:\n  - id: \"from-default\"").unwrap();

        let cli = Cli { config_path: None };
        let cfg = Config::load_with_default(&cli, file.path()).unwrap();
        assert_eq!(cfg.app.get_port(), 5555);
        assert_eq!(cfg.bookmarks[0].id, "from-default");
    }

    #[test]
    fn test_load_falls_back_to_env_without_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("config.yaml");

        let cli = Cli { config_path: None };
        let cfg = Config::load_with_default(&cli, &missing).unwrap();
        assert!(cfg.bookmarks.is_empty());
    }
}
