use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A campus of the institute.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Campus {
    pub id: Option<i64>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub institute_name: Option<String>,
    pub active: bool,
    pub archived: bool,
    pub default_campus: bool,
}
