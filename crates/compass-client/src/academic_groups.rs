//! `GetAllAcademicGroups`.

use compass_core::Result;
use compass_core::decode::lenient_i64;
use compass_core::entities::AcademicGroup;
use compass_session::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{CompassClient, decode_envelope, reference_data_path};

const OPERATION: &str = "GetAllAcademicGroups";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAcademicGroup {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    name: Option<String>,
}

/// Decode a captured `GetAllAcademicGroups` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<AcademicGroup>> {
    let raw: Vec<RawAcademicGroup> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

fn normalize(raw: RawAcademicGroup) -> AcademicGroup {
    AcademicGroup {
        id: raw.id,
        name: raw.name,
    }
}

impl CompassClient {
    /// Academic groups (usually one per school year). Learning tasks are
    /// fetched per group.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_academic_groups(&self) -> Result<Vec<AcademicGroup>> {
        let path = reference_data_path(OPERATION, self.session().school_config_key());
        let raw: Vec<RawAcademicGroup> = self.call(OPERATION, &path, Method::GET, None).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
