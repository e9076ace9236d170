use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonLocation {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub archived: Option<bool>,
    pub bookable: Option<bool>,
    pub computers: Option<i64>,
    pub has_cooling: Option<bool>,
    pub has_heating: Option<bool>,
    pub has_projector: Option<bool>,
    pub has_smartboard: Option<bool>,
    pub has_speakers: Option<bool>,
    pub has_tv: Option<bool>,
    pub has_water: Option<bool>,
    pub has_wheelchair_access: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonTeacher {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

/// File asset holding the lesson plan.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonPlan {
    pub asset_id: Option<String>,
    pub name: Option<String>,
}

/// Detail for one lesson instance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LessonInfo {
    pub activity_id: Option<i64>,
    pub activity_display_name: Option<String>,
    pub subject_id: Option<i64>,
    pub subject_name: Option<String>,
    pub attendee_count: Option<i64>,
    pub attendee_user_ids: Vec<i64>,
    pub cover_photo_url: Option<String>,
    pub location: Option<LessonLocation>,
    pub teacher: LessonTeacher,
    pub lesson_plan: Option<LessonPlan>,
}
