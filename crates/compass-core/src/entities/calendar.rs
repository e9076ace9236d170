use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A location attached to a calendar event. Carries less than [`crate::entities::Location`].
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventLocation {
    pub location_id: Option<i64>,
    /// Usually the room code, e.g. `A03`.
    pub location_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventManager {
    pub user_id: Option<i64>,
    /// Teacher code, e.g. `JHD`.
    pub identifier: Option<String>,
}

/// One entry on the user's calendar: a class, exam, or school event.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub activity_id: Option<i64>,
    /// Lesson instance id, accepted by `get_lesson_info`.
    pub instance_id: Option<String>,
    pub all_day: Option<bool>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub locations: Vec<CalendarEventLocation>,
    pub managers: Vec<CalendarEventManager>,
    /// May contain HTML, e.g. `10:30: 1 - 3MATA - (Year 3: Mathematics) - A03 - <s>ABC</s>`.
    pub long_title: Option<String>,
    pub long_title_without_time: Option<String>,
    /// 1-indexed period of the day.
    pub period: Option<i64>,
    pub roll_marked: Option<bool>,
    /// e.g. `Year 11: Specialist Mathematics - Units 1 & 2`.
    pub subject_long_name: Option<String>,
    /// Usually the subject code, e.g. `3MATA`.
    pub subject_title: Option<String>,
}
