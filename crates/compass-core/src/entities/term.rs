use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A school term.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Term {
    pub id: Option<i64>,
    pub year: Option<i64>,
    /// e.g. `Term 1`.
    pub name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    /// Portal-formatted start date, e.g. `Thursday, 24 April`.
    pub start_date_formatted: Option<String>,
}
