//! `GetAllStaff`: the staff directory.

use compass_core::Result;
use compass_core::decode::{lenient_i64, parse_timestamp};
use compass_core::entities::Staff;
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetAllStaff";
const PATH: &str = "/Services/User.svc/GetAllStaff?sessionstate=readonly";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawStaff {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    display_code: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    campus_id: Option<i64>,
    #[serde(rename = "fn")]
    first_name: Option<String>,
    #[serde(rename = "ln")]
    last_name: Option<String>,
    n: Option<String>,
    ce: Option<String>,
    start: Option<String>,
}

fn normalize(raw: RawStaff) -> Staff {
    Staff {
        id: raw.id,
        display_code: raw.display_code,
        campus_id: raw.campus_id,
        first_name: raw.first_name,
        last_name: raw.last_name,
        full_name: raw.n,
        email: raw.ce,
        join_date: parse_timestamp(raw.start.as_deref()),
    }
}

/// Decode a captured `GetAllStaff` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<Staff>> {
    let raw: Vec<RawStaff> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Every staff member in the school directory.
    ///
    /// The portal ignores the page size, so it is not configurable.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_staff(&self) -> Result<Vec<Staff>> {
        let body = json!({ "page": 1, "start": 0, "limit": 25 });
        let raw: Vec<RawStaff> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
