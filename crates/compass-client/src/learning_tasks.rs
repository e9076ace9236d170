//! `GetAllLearningTasksByUserId`: assignments, tests and homework for one
//! academic group.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, parse_timestamp};
use compass_core::entities::{GradingItem, LearningTask, TaskResult};
use compass_session::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::DataPage;
use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetAllLearningTasksByUserId";
const PATH: &str = "/Services/LearningTasks.svc/GetAllLearningTasksByUserId?sessionstate=readonly";
const SORT: &str =
    r#"[{"property":"groupName","direction":"ASC"},{"property":"dueDateTimestamp","direction":"DESC"}]"#;

/// Options for [`CompassClient::get_all_learning_tasks`]. The academic group
/// is required; see [`CompassClient::get_all_academic_groups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningTasksQuery {
    pub academic_group_id: i64,
    /// Falls back to the client's `learning_task_limit` default.
    pub limit: Option<u32>,
}

impl LearningTasksQuery {
    #[must_use]
    pub const fn new(academic_group_id: i64) -> Self {
        Self {
            academic_group_id,
            limit: None,
        }
    }

    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn body(&self, user_id: i64, default_limit: u32) -> Value {
        json!({
            "academicGroupId": self.academic_group_id,
            "userId": user_id,
            "showHiddenTasks": true,
            "page": 1,
            "start": 0,
            "limit": self.limit.unwrap_or(default_limit),
            "sort": SORT,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawGradingItem {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    name: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    include_in_semester_report: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawResult {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    result: Option<Value>,
    modified_timestamp: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawStudent {
    results: Option<Vec<RawResult>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawLearningTask {
    #[serde(deserialize_with = "lenient_i64")]
    id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    group_name: Option<String>,
    subject_name: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    important: Option<bool>,
    activity_start: Option<String>,
    due_date_timestamp: Option<String>,
    submitted_timestamp: Option<String>,
    grading_items: Option<Vec<RawGradingItem>>,
    students: Option<Vec<RawStudent>>,
}

fn normalize(raw: RawLearningTask) -> LearningTask {
    let results = raw
        .students
        .and_then(|students| students.into_iter().next())
        .and_then(|student| student.results)
        .unwrap_or_default()
        .into_iter()
        .map(|r| TaskResult {
            id: r.id,
            result: r.result,
            modified_timestamp: parse_timestamp(r.modified_timestamp.as_deref()),
        })
        .collect();

    LearningTask {
        id: raw.id,
        name: raw.name,
        description: raw.description,
        group_name: raw.group_name,
        subject_name: raw.subject_name,
        important: raw.important,
        start_date: parse_timestamp(raw.activity_start.as_deref()),
        due_date: parse_timestamp(raw.due_date_timestamp.as_deref()),
        submitted_timestamp: parse_timestamp(raw.submitted_timestamp.as_deref()),
        grading_items: raw
            .grading_items
            .unwrap_or_default()
            .into_iter()
            .map(|g| GradingItem {
                id: g.id,
                name: g.name,
                include_in_semester_report: g.include_in_semester_report,
            })
            .collect(),
        results,
    }
}

/// Decode a captured `GetAllLearningTasksByUserId` response (`d` shaped
/// `{ "data": [...] }`).
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed envelope or
/// a payload without a `data` array.
pub fn decode(response: Value) -> Result<Vec<LearningTask>> {
    let page: DataPage<RawLearningTask> = decode_envelope(OPERATION, response)?;
    Ok(page.data.into_iter().map(normalize).collect())
}

impl CompassClient {
    /// Learning tasks for the signed-in user within one academic group.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_all_learning_tasks(&self, query: LearningTasksQuery) -> Result<Vec<LearningTask>> {
        let body = query.body(self.get_user_id()?, self.defaults().learning_task_limit);
        let page: DataPage<RawLearningTask> =
            self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        tracing::debug!(
            academic_group_id = query.academic_group_id,
            count = page.data.len(),
            "learning tasks fetched"
        );
        Ok(page.data.into_iter().map(normalize).collect())
    }
}
