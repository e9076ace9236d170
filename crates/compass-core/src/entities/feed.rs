use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// How an attachment is presented on the feed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttachmentKind {
    /// Displayed inline.
    Image,
    /// Displayed as a link.
    Document,
}

impl AttachmentKind {
    /// Map the portal's numeric attachment type. `1` is an image, any other
    /// non-zero value a document.
    #[must_use]
    pub const fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => None,
            1 => Some(Self::Image),
            _ => Some(Self::Document),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedAttachment {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// Absolute URL of the file.
    pub url: Option<String>,
    pub kind: Option<AttachmentKind>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItemAuthor {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// An item on the user's news feed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub id: Option<i64>,
    pub title: Option<String>,
    /// HTML body.
    pub content: Option<String>,
    pub author: FeedItemAuthor,
    pub attachments: Vec<FeedAttachment>,
    pub created_time: Option<DateTime<Utc>>,
    pub can_react: bool,
    pub is_saved: bool,
    pub is_viewed: bool,
}
