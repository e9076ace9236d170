//! The signed-in user's profile: `GetUserDetailsBlobByUserId` and
//! `GetNamesById`.

use compass_core::decode::{lenient_i64, lenient_string, resolve_url};
use compass_core::entities::{UserDetails, UserName};
use compass_core::{CompassError, Result};
use compass_session::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const DETAILS_OPERATION: &str = "GetUserDetailsBlobByUserId";
const DETAILS_PATH: &str = "/Services/User.svc/GetUserDetailsBlobByUserId";
const NAMES_OPERATION: &str = "GetNamesById";
const NAMES_PATH: &str = "/Services/User.svc/GetNamesById";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawUserDetails {
    age: Option<String>,
    birthday: Option<String>,
    gender: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    user_compass_person_id: Option<String>,
    user_display_code: Option<String>,
    user_email: Option<String>,
    user_first_name: Option<String>,
    user_last_name: Option<String>,
    user_full_name: Option<String>,
    user_preferred_name: Option<String>,
    user_preferred_last_name: Option<String>,
    user_form_group: Option<String>,
    user_house: Option<String>,
    user_photo_path: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    user_year_level_id: Option<i64>,
}

fn normalize_details(raw: RawUserDetails, base: &Url) -> UserDetails {
    UserDetails {
        verbose_age: raw.age,
        birthday: raw.birthday,
        gender: raw.gender,
        compass_id: raw.user_compass_person_id,
        display_code: raw.user_display_code,
        email: raw.user_email,
        first_name: raw.user_first_name,
        last_name: raw.user_last_name,
        full_name: raw.user_full_name,
        preferred_name: raw.user_preferred_name,
        preferred_last_name: raw.user_preferred_last_name,
        form_group: raw.user_form_group,
        house: raw.user_house,
        photo_url: resolve_url(base, raw.user_photo_path.as_deref()),
        year_level: raw.user_year_level_id,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawUserName {
    n: Option<String>,
    name_first_pref_last_id_form: Option<String>,
    name_pref_last_id: Option<String>,
    title: Option<String>,
}

fn normalize_name(raw: RawUserName) -> UserName {
    UserName {
        name: raw.n,
        name_first_pref_last_id_form: raw.name_first_pref_last_id_form,
        name_pref_last_id: raw.name_pref_last_id,
        title: raw.title,
    }
}

/// Decode a captured `GetUserDetailsBlobByUserId` response. The photo path
/// is resolved against `base`.
///
/// # Errors
///
/// Returns [`CompassError::Upstream`] for a failed envelope or a payload that
/// is not an object.
pub fn decode_details(response: Value, base: &Url) -> Result<UserDetails> {
    let raw: RawUserDetails = decode_envelope(DETAILS_OPERATION, response)?;
    Ok(normalize_details(raw, base))
}

/// Decode a captured `GetNamesById` response, keeping the first record.
///
/// # Errors
///
/// Returns [`CompassError::Upstream`] for a failed envelope or an empty list.
pub fn decode_name(response: Value) -> Result<UserName> {
    let raw: Vec<RawUserName> = decode_envelope(NAMES_OPERATION, response)?;
    raw.into_iter()
        .next()
        .map(normalize_name)
        .ok_or_else(|| CompassError::upstream(NAMES_OPERATION, "no name record for the user"))
}

impl CompassClient {
    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_user_details(&self) -> Result<UserDetails> {
        let body = json!({ "targetUserId": self.get_user_id()? });
        let raw: RawUserDetails = self
            .call(DETAILS_OPERATION, DETAILS_PATH, Method::POST, Some(body))
            .await?;
        Ok(normalize_details(raw, self.base_url()?))
    }

    /// Name forms the portal uses for the signed-in user.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors; an empty result is an
    /// upstream error.
    pub async fn get_user_name(&self) -> Result<UserName> {
        let body = json!({
            "userIds": [self.get_user_id()?],
            "page": 1,
            "start": 0,
            "limit": 25,
        });
        let response = self
            .session()
            .request(NAMES_PATH, Method::POST, Some(&body))
            .await?;
        decode_name(response)
    }
}
