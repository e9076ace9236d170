//! `GetClassTeacherDetailsByStudent`: the user's subjects and their teachers.

use compass_core::Result;
use compass_core::decode::lenient_i64_list;
use compass_core::entities::Subject;
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetClassTeacherDetailsByStudent";
const PATH: &str = "/Services/Communications.svc/GetClassTeacherDetailsByStudent";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSubject {
    subject_name: Option<String>,
    #[serde(deserialize_with = "lenient_i64_list")]
    ids: Option<Vec<i64>>,
}

fn normalize(raw: RawSubject) -> Subject {
    Subject {
        name: raw.subject_name,
        teacher_ids: raw.ids.unwrap_or_default(),
    }
}

/// Decode a captured `GetClassTeacherDetailsByStudent` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<Subject>> {
    let raw: Vec<RawSubject> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Subjects the signed-in user takes.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_subjects(&self) -> Result<Vec<Subject>> {
        let body = json!({ "userId": self.get_user_id()? });
        let raw: Vec<RawSubject> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_subjects() {
        let subjects = decode(serde_json::json!({
            "d": [
                { "subjectName": "Year 11: Chemistry", "ids": [301, "302"] },
                { "subjectName": "Year 11: English" }
            ]
        }))
        .unwrap();
        assert_eq!(
            subjects,
            vec![
                Subject {
                    name: Some("Year 11: Chemistry".into()),
                    teacher_ids: vec![301, 302],
                },
                Subject {
                    name: Some("Year 11: English".into()),
                    teacher_ids: vec![],
                },
            ]
        );
    }
}
