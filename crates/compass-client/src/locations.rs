//! `GetAllLocations`: every room and space in the school.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, non_empty};
use compass_core::entities::Location;
use compass_session::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetAllLocations";
const PATH: &str = "/Services/ReferenceDataCache.svc/GetAllLocations";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLocation {
    #[serde(rename = "__type")]
    type_tag: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    archived: Option<bool>,
    building: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    long_name: Option<String>,
    n: Option<String>,
    room_name: Option<String>,
}

fn normalize(raw: RawLocation) -> Location {
    Location {
        id: raw.id,
        type_tag: raw.type_tag,
        archived: raw.archived,
        building: non_empty(raw.building),
        long_name: raw.long_name,
        name: raw.n,
        room_name: raw.room_name,
    }
}

/// Decode a captured `GetAllLocations` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<Location>> {
    let raw: Vec<RawLocation> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Every location in the school, in portal order.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors; see [`crate::CompassError`].
    pub async fn get_all_locations(&self) -> Result<Vec<Location>> {
        let raw: Vec<RawLocation> = self.call(OPERATION, PATH, Method::GET, None).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::ErrorKind;
    use pretty_assertions::assert_eq;

    const FIXTURE: &str = r#"{
        "d": [
            {
                "__type": "LocationLite:http://jdlf.com.au/ns/data/locations",
                "archived": false,
                "building": "",
                "id": 12,
                "longName": "Court 1",
                "n": "C1",
                "roomName": "C1"
            },
            {
                "__type": "LocationLite:http://jdlf.com.au/ns/data/locations",
                "archived": true,
                "building": "B Block",
                "id": "13",
                "longName": "Science Lab 2",
                "n": "B2",
                "roomName": null
            }
        ]
    }"#;

    #[test]
    fn parse_locations() {
        let locations = decode(serde_json::from_str(FIXTURE).unwrap()).unwrap();
        assert_eq!(locations.len(), 2);
        assert_eq!(
            locations[0],
            Location {
                id: Some(12),
                type_tag: Some("LocationLite:http://jdlf.com.au/ns/data/locations".into()),
                archived: Some(false),
                building: None,
                long_name: Some("Court 1".into()),
                name: Some("C1".into()),
                room_name: Some("C1".into()),
            }
        );
        assert_eq!(locations[1].id, Some(13));
        assert_eq!(locations[1].building.as_deref(), Some("B Block"));
        assert_eq!(locations[1].room_name, None);
    }

    #[test]
    fn object_payload_is_upstream_error() {
        let err = decode(serde_json::json!({ "d": { "id": 1 } })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[test]
    fn array_shaped_record_is_upstream_error() {
        let err = decode(serde_json::json!({ "d": [[]] })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);

        let err = decode(serde_json::json!({ "d": [{ "id": 12 }, [13, "Lab"]] })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Upstream);
    }
}
