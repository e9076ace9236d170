//! `GetGroupActiviesList` (sic): exams, clubs, meetings and other group
//! activities.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, parse_timestamp};
use compass_core::entities::GroupActivity;
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetGroupActiviesList";
const PATH: &str = "/Services/Activity.svc/GetGroupActiviesList?sessionstate=readonly";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawGroupActivity {
    #[serde(deserialize_with = "lenient_i64")]
    academic_year_level: Option<i64>,
    activity_display_name: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    activity_manager_id: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    activity_id: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    activity_default_location_id: Option<i64>,
    #[serde(deserialize_with = "lenient_bool")]
    is_exam: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    is_club: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    is_meeting: Option<bool>,
    activity_start: Option<String>,
    activity_finish: Option<String>,
}

fn normalize(raw: RawGroupActivity) -> GroupActivity {
    GroupActivity {
        activity_id: raw.activity_id,
        name: raw.activity_display_name,
        year_level: raw.academic_year_level,
        manager_id: raw.activity_manager_id,
        default_location_id: raw.activity_default_location_id,
        is_exam: raw.is_exam,
        is_club: raw.is_club,
        is_meeting: raw.is_meeting,
        start: parse_timestamp(raw.activity_start.as_deref()),
        finish: parse_timestamp(raw.activity_finish.as_deref()),
    }
}

/// Decode a captured `GetGroupActiviesList` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<GroupActivity>> {
    let raw: Vec<RawGroupActivity> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Group activities visible to the user.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_group_activities(&self) -> Result<Vec<GroupActivity>> {
        let body = json!({ "page": 1, "start": 0, "limit": 25 });
        let raw: Vec<RawGroupActivity> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
