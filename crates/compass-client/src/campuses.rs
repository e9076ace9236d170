//! `GetAllCampuses`.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, lenient_string};
use compass_core::entities::Campus;
use compass_session::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{CompassClient, decode_envelope, reference_data_path};

const OPERATION: &str = "GetAllCampuses";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawCampus {
    campus_name: Option<String>,
    name: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    active: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    archived: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    default_campus: Option<bool>,
    #[serde(deserialize_with = "lenient_string")]
    campus_guid: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    campus_id: Option<i64>,
}

fn normalize(raw: RawCampus) -> Campus {
    Campus {
        id: raw.campus_id,
        uuid: raw.campus_guid,
        name: raw.campus_name,
        institute_name: raw.name,
        active: raw.active.unwrap_or(false),
        archived: raw.archived.unwrap_or(false),
        default_campus: raw.default_campus.unwrap_or(false),
    }
}

/// Decode a captured `GetAllCampuses` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<Campus>> {
    let raw: Vec<RawCampus> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Campuses of the institute. Sends the school config key as the cache
    /// key when the landing page provided one.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_campuses(&self) -> Result<Vec<Campus>> {
        let path = reference_data_path(OPERATION, self.session().school_config_key());
        let raw: Vec<RawCampus> = self.call(OPERATION, &path, Method::GET, None).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
