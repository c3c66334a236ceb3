//! Tracing setup.
//!
//! JSON lines always go to the log file. Outside production a compact
//! console layer is stacked on top.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;

use anyhow::Context;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::DeploymentMode;

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

fn subscriber(mode: DeploymentMode, file: File) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(Mutex::new(file));

    let console_layer = (!mode.is_production()).then(|| tracing_subscriber::fmt::layer().compact());

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(console_layer)
}

pub fn init(mode: DeploymentMode, log_file: &str) -> anyhow::Result<()> {
    let file = open_log_file(Path::new(log_file))
        .with_context(|| format!("failed to open log file {}", log_file))?;

    subscriber(mode, file).try_init()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_log_file_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/logs/info.log");

        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_file_layer_writes_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("info.log");
        let file = open_log_file(&path).unwrap();

        tracing::subscriber::with_default(subscriber(DeploymentMode::Production, file), || {
            tracing::error!("Bookmark with id {} not found.", "abc");
        });

        let contents = fs::read_to_string(&path).unwrap();
        let line = contents.lines().next().unwrap();
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(value["level"], "ERROR");
        assert_eq!(value["fields"]["message"], "Bookmark with id abc not found.");
    }
}
