use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct YearLevel {
    /// e.g. `7` for `Year 7`.
    pub id: Option<i64>,
    pub name: Option<String>,
}
