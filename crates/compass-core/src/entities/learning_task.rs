use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A criterion a learning task is graded on, e.g. `Percentage` or `Comment`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GradingItem {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub include_in_semester_report: Option<bool>,
}

/// The user's result against one grading item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    pub id: Option<i64>,
    /// Raw result value; numeric for scores, text for comments.
    pub result: Option<serde_json::Value>,
    pub modified_timestamp: Option<DateTime<Utc>>,
}

/// An assignment, test, or piece of homework.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningTask {
    pub id: Option<i64>,
    pub name: Option<String>,
    /// HTML description.
    pub description: Option<String>,
    /// Class the task is set for, e.g. `CHEM4`.
    pub group_name: Option<String>,
    pub subject_name: Option<String>,
    pub important: Option<bool>,
    pub start_date: Option<DateTime<Utc>>,
    pub due_date: Option<DateTime<Utc>>,
    pub submitted_timestamp: Option<DateTime<Utc>>,
    pub grading_items: Vec<GradingItem>,
    pub results: Vec<TaskResult>,
}
