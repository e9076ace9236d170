use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A bookable room or space within the school.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: Option<i64>,
    /// Portal type tag (`__type` upstream). Values are not documented.
    pub type_tag: Option<String>,
    pub archived: Option<bool>,
    pub building: Option<String>,
    /// Verbose name, e.g. `Court 1`.
    pub long_name: Option<String>,
    /// Short code, e.g. `C1`.
    pub name: Option<String>,
    pub room_name: Option<String>,
}
