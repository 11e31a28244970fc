use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Quiz,
    Video,
    Text,
    #[serde(other)]
    Unknown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Quiz => "quiz",
            ContentType::Video => "video",
            ContentType::Text => "text",
            ContentType::Unknown => "unknown",
        }
    }
}

/// Course content entry as stored in the `contents` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub content_type: ContentType,
    /// Public object-store URL of the content document.
    pub url: String,
}

/// Student-to-course enrollment, `assignments` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub user_id: String,
    pub course_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_content_types_do_not_fail() {
        let record: ContentRecord = serde_json::from_value(json!({
            "_id": "c1",
            "content_type": "podcast",
            "url": "https://cdn.example.com/focused/course-1/podcast/c1.json"
        }))
        .unwrap();
        assert_eq!(record.content_type, ContentType::Unknown);
    }
}
