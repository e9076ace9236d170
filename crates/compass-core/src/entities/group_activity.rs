use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A group activity: exam, club, meeting, detention and the like.
///
/// The `is_exam`/`is_club`/`is_meeting` flags are set by staff by hand and
/// are only a loose indicator.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupActivity {
    pub activity_id: Option<i64>,
    pub name: Option<String>,
    /// `None` usually means the activity spans all year levels.
    pub year_level: Option<i64>,
    pub manager_id: Option<i64>,
    pub default_location_id: Option<i64>,
    pub is_exam: Option<bool>,
    pub is_club: Option<bool>,
    pub is_meeting: Option<bool>,
    pub start: Option<DateTime<Utc>>,
    pub finish: Option<DateTime<Utc>>,
}
