//! `GetAllTerms`: school terms across years.

use compass_core::Result;
use compass_core::decode::{lenient_i64, parse_timestamp};
use compass_core::entities::Term;
use compass_session::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetAllTerms";
const PATH: &str = "/Services/ReferenceDataCache.svc/GetAllTerms?page=1&start=0&limit=100";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTerm {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    #[serde(deserialize_with = "lenient_i64")]
    cy: Option<i64>,
    n: Option<String>,
    s: Option<String>,
    f: Option<String>,
    sl: Option<String>,
}

fn normalize(raw: RawTerm) -> Term {
    Term {
        id: raw.id,
        year: raw.cy,
        name: raw.n,
        start_date: parse_timestamp(raw.s.as_deref()),
        end_date: parse_timestamp(raw.f.as_deref()),
        start_date_formatted: raw.sl,
    }
}

/// Decode a captured `GetAllTerms` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<Term>> {
    let raw: Vec<RawTerm> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_terms(&self) -> Result<Vec<Term>> {
        let raw: Vec<RawTerm> = self.call(OPERATION, PATH, Method::GET, None).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
