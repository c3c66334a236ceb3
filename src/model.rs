use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Caller-supplied fields keep whatever JSON the caller sent. `None` means the
/// key was absent; an explicit `null` is stored as `Some(Value::Null)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub rating: Option<Value>,
}

/// Body of `POST /bookmarks`. Every field is optional and unknown fields are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct CreateBookmark {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub url: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub rating: Option<Value>,
}

// Only runs for keys that are present, so `null` becomes `Some(Value::Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl CreateBookmark {
    pub fn into_bookmark(self) -> Bookmark {
        Bookmark {
            id: new_id(),
            title: self.title,
            url: self.url,
            description: self.description,
            rating: self.rating,
        }
    }
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
