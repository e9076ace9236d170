//! `GetAllYearLevels`.

use compass_core::Result;
use compass_core::decode::lenient_i64;
use compass_core::entities::YearLevel;
use compass_session::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetAllYearLevels";
const PATH: &str =
    "/Services/ReferenceDataCache.svc/GetAllYearLevels?sessionstate=readonly&page=1&start=0&limit=100";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawYearLevel {
    k: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    v: Option<i64>,
}

fn normalize(raw: RawYearLevel) -> YearLevel {
    YearLevel {
        id: raw.v,
        name: raw.k,
    }
}

/// Decode a captured `GetAllYearLevels` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<YearLevel>> {
    let raw: Vec<RawYearLevel> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_year_levels(&self) -> Result<Vec<YearLevel>> {
        let raw: Vec<RawYearLevel> = self.call(OPERATION, PATH, Method::GET, None).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
