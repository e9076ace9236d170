//! `GetLessonsByInstanceIdQuick`: detail for one lesson instance, and its
//! lesson plan.

use compass_core::decode::{
    lenient_bool, lenient_i64, lenient_i64_list, lenient_string, non_empty, resolve_url,
};
use compass_core::entities::{LessonInfo, LessonLocation, LessonPlan, LessonTeacher};
use compass_core::{CompassError, Result};
use compass_session::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetLessonsByInstanceIdQuick";
const PATH: &str = "/Services/Activity.svc/GetLessonsByInstanceIdQuick";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLocationDetails {
    // Misspelled upstream.
    #[serde(rename = "achived", deserialize_with = "lenient_bool")]
    archived: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    available_for_booking: Option<bool>,
    #[serde(deserialize_with = "lenient_i64")]
    computer_number: Option<i64>,
    #[serde(deserialize_with = "lenient_bool")]
    has_cooling: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_heating: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_projector: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_smartboard: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_speakers: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_tv: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_water: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    has_wheelchair: Option<bool>,
    long_name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLessonPlan {
    #[serde(deserialize_with = "lenient_string")]
    file_asset_id: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawLesson {
    #[serde(deserialize_with = "lenient_i64")]
    activity_id: Option<i64>,
    activity_display_name: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    subject_id: Option<i64>,
    subject_name: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    attendee_count: Option<i64>,
    #[serde(deserialize_with = "lenient_i64_list")]
    attendee_user_id_list: Option<Vec<i64>>,
    covering_photo_path: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    location_id: Option<i64>,
    location_details: Option<RawLocationDetails>,
    manager_text_readable: Option<String>,
    manager_photo_path: Option<String>,
    #[serde(rename = "mi", deserialize_with = "lenient_i64")]
    manager_id: Option<i64>,
    #[serde(rename = "lp")]
    lesson_plan: Option<RawLessonPlan>,
}

fn normalize_location(id: Option<i64>, details: Option<RawLocationDetails>) -> Option<LessonLocation> {
    if id.is_none() && details.is_none() {
        return None;
    }
    let d = details.unwrap_or_default();
    Some(LessonLocation {
        id,
        name: d.long_name,
        archived: d.archived,
        bookable: d.available_for_booking,
        computers: d.computer_number,
        has_cooling: d.has_cooling,
        has_heating: d.has_heating,
        has_projector: d.has_projector,
        has_smartboard: d.has_smartboard,
        has_speakers: d.has_speakers,
        has_tv: d.has_tv,
        has_water: d.has_water,
        has_wheelchair_access: d.has_wheelchair,
    })
}

fn normalize(raw: RawLesson, base: &Url) -> LessonInfo {
    LessonInfo {
        activity_id: raw.activity_id,
        activity_display_name: raw.activity_display_name,
        subject_id: raw.subject_id,
        subject_name: raw.subject_name,
        attendee_count: raw.attendee_count,
        attendee_user_ids: raw.attendee_user_id_list.unwrap_or_default(),
        cover_photo_url: resolve_url(base, raw.covering_photo_path.as_deref()),
        location: normalize_location(raw.location_id, raw.location_details),
        teacher: LessonTeacher {
            id: raw.manager_id,
            name: raw.manager_text_readable,
            photo_url: resolve_url(base, raw.manager_photo_path.as_deref()),
        },
        lesson_plan: raw.lesson_plan.map(|lp| LessonPlan {
            asset_id: non_empty(lp.file_asset_id),
            name: lp.name,
        }),
    }
}

/// Decode a captured `GetLessonsByInstanceIdQuick` response. Photo paths are
/// resolved against `base`.
///
/// # Errors
///
/// Returns [`CompassError::Upstream`] for a failed envelope or a payload that
/// is not an object.
pub fn decode(response: Value, base: &Url) -> Result<LessonInfo> {
    let raw: RawLesson = decode_envelope(OPERATION, response)?;
    Ok(normalize(raw, base))
}

fn require_instance_id(instance_id: &str) -> Result<()> {
    if instance_id.trim().is_empty() {
        return Err(CompassError::Configuration("instance id must not be empty".into()));
    }
    Ok(())
}

impl CompassClient {
    /// Detail for one lesson. `instance_id` comes from
    /// [`compass_core::entities::CalendarEvent::instance_id`].
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] for an empty instance id,
    /// otherwise precondition, transport, or upstream errors.
    pub async fn get_lesson_info(&self, instance_id: &str) -> Result<LessonInfo> {
        require_instance_id(instance_id)?;
        let body = json!({ "instanceId": instance_id });
        let raw: RawLesson = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        Ok(normalize(raw, self.base_url()?))
    }

    /// Download the lesson plan attached to a lesson. `None` when the lesson
    /// has no plan.
    ///
    /// # Errors
    ///
    /// Anything [`CompassClient::get_lesson_info`] or
    /// [`CompassClient::download_file`] can return.
    pub async fn get_lesson_plan(&self, instance_id: &str) -> Result<Option<Vec<u8>>> {
        let info = self.get_lesson_info(instance_id).await?;
        let Some(asset_id) = info.lesson_plan.and_then(|lp| lp.asset_id) else {
            tracing::debug!(instance_id, "lesson has no plan");
            return Ok(None);
        };
        self.download_file(&asset_id).await.map(Some)
    }
}
