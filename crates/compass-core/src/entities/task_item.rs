use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A personal to-do item from the user's task list.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub due: Option<DateTime<Utc>>,
    pub completed: Option<bool>,
}
