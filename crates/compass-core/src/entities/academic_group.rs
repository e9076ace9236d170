use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An academic group (e.g. `2024 Academic`). Learning tasks are scoped to one.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AcademicGroup {
    pub id: Option<i64>,
    pub name: Option<String>,
}
