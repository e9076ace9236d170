use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A staff member listed in the school directory.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: Option<i64>,
    /// Teacher code, e.g. `JHD`.
    pub display_code: Option<String>,
    pub campus_id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    /// Full name with the last name capitalised, e.g. `John DOE`.
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub join_date: Option<DateTime<Utc>>,
}
