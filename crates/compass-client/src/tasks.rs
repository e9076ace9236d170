//! `GetTaskItems`: the user's personal to-do list.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, parse_timestamp};
use compass_core::entities::TaskItem;
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetTaskItems";
const PATH: &str = "/Services/TaskService.svc/GetTaskItems";

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawTaskItem {
    due_date: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    task_name: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    status: Option<bool>,
}

fn normalize(raw: RawTaskItem) -> TaskItem {
    TaskItem {
        id: raw.id,
        name: raw.task_name,
        due: parse_timestamp(raw.due_date.as_deref()),
        completed: raw.status,
    }
}

/// Decode a captured `GetTaskItems` response.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value) -> Result<Vec<TaskItem>> {
    let raw: Vec<RawTaskItem> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_task_items(&self) -> Result<Vec<TaskItem>> {
        let body = json!({ "page": 1, "start": 0 });
        let raw: Vec<RawTaskItem> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        Ok(raw.into_iter().map(normalize).collect())
    }
}
