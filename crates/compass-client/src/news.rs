//! `GetActivityNewsFeedPaged`: news posted to an activity such as a class.

use compass_core::decode::{lenient_bool, lenient_i64, lenient_string, parse_timestamp, resolve_url};
use compass_core::entities::{ActivityNewsItem, NewsAuthor};
use compass_core::{CompassError, Result};
use compass_session::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::envelope::DataPage;
use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetActivityNewsFeedPaged";
const PATH: &str = "/Services/NewsFeed.svc/GetActivityNewsFeedPaged";

/// Paging for [`CompassClient::get_activity_news_feed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewsFeedQuery {
    pub limit: u32,
    pub start: u32,
}

impl Default for NewsFeedQuery {
    fn default() -> Self {
        Self { limit: 25, start: 0 }
    }
}

impl NewsFeedQuery {
    #[must_use]
    pub const fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    #[must_use]
    pub const fn start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    fn body(self, activity_id: &str) -> Value {
        json!({
            "activityId": activity_id,
            "limit": self.limit,
            "start": self.start,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
struct RawNewsItem {
    attachments: Option<Value>,
    #[serde(deserialize_with = "lenient_bool")]
    created_by_admin: Option<bool>,
    email_sent_date: Option<String>,
    finish: Option<String>,
    start: Option<String>,
    #[serde(deserialize_with = "lenient_bool")]
    locked: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    priority: Option<bool>,
    #[serde(deserialize_with = "lenient_i64")]
    communication_type: Option<i64>,
    #[serde(deserialize_with = "lenient_string")]
    news_item_id: Option<String>,
    user_name: Option<String>,
    user_image_url: Option<String>,
    title: Option<String>,
    content1: Option<String>,
    content2: Option<String>,
}

/// `Attachments` is usually a list; some portals send a bare count.
fn attachment_count(value: Option<&Value>) -> usize {
    match value {
        Some(Value::Array(items)) => items.len(),
        Some(Value::Number(n)) => n.as_u64().and_then(|n| usize::try_from(n).ok()).unwrap_or(0),
        _ => 0,
    }
}

fn normalize(raw: RawNewsItem, base: &Url) -> ActivityNewsItem {
    ActivityNewsItem {
        id: raw.news_item_id,
        title: raw.title,
        content: raw.content1,
        secondary_content: raw.content2,
        author: NewsAuthor {
            name: raw.user_name,
            photo_url: resolve_url(base, raw.user_image_url.as_deref()),
        },
        created_by_admin: raw.created_by_admin,
        locked: raw.locked,
        priority: raw.priority,
        communication_type: raw.communication_type,
        start: parse_timestamp(raw.start.as_deref()),
        finish: parse_timestamp(raw.finish.as_deref()),
        email_sent_date: parse_timestamp(raw.email_sent_date.as_deref()),
        attachment_count: attachment_count(raw.attachments.as_ref()),
    }
}

/// Decode a captured `GetActivityNewsFeedPaged` response (`d` shaped
/// `{ "data": [...] }`). Author photos are resolved against `base`.
///
/// # Errors
///
/// Returns [`CompassError::Upstream`] for a failed envelope or a payload
/// without a `data` array.
pub fn decode(response: Value, base: &Url) -> Result<Vec<ActivityNewsItem>> {
    let page: DataPage<RawNewsItem> = decode_envelope(OPERATION, response)?;
    Ok(page.data.into_iter().map(|item| normalize(item, base)).collect())
}

impl CompassClient {
    /// News posted to an activity, e.g. a class's `activity_id` from a
    /// calendar event.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] for an empty activity id,
    /// otherwise precondition, transport, or upstream errors.
    pub async fn get_activity_news_feed(
        &self,
        activity_id: &str,
        query: NewsFeedQuery,
    ) -> Result<Vec<ActivityNewsItem>> {
        if activity_id.trim().is_empty() {
            return Err(CompassError::Configuration("activity id must not be empty".into()));
        }
        let body = query.body(activity_id);
        let page: DataPage<RawNewsItem> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        let base = self.base_url()?;
        Ok(page.data.into_iter().map(|item| normalize(item, base)).collect())
    }
}
