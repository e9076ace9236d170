use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewsAuthor {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// A news post on an activity's (e.g. a class's) feed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityNewsItem {
    pub id: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub secondary_content: Option<String>,
    pub author: NewsAuthor,
    pub created_by_admin: Option<bool>,
    pub locked: Option<bool>,
    pub priority: Option<bool>,
    pub communication_type: Option<i64>,
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
    pub email_sent_date: Option<DateTime<Utc>>,
    pub attachment_count: usize,
}
