use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A subject the user is enrolled in, with the ids of its teachers.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub name: Option<String>,
    pub teacher_ids: Vec<i64>,
}
