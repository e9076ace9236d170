//! `GetFeedItems`: the user's home-page news feed.

use compass_core::Result;
use compass_core::decode::{lenient_bool, lenient_i64, parse_timestamp, resolve_url};
use compass_core::entities::{AttachmentKind, FeedAttachment, FeedItem, FeedItemAuthor};
use compass_session::{Method, Url};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{CompassClient, decode_envelope};

const OPERATION: &str = "GetFeedItems";
const PATH: &str = "/Services/Feed.svc/GetFeedItems";

/// Options for [`CompassClient::get_feed_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedItemsQuery {
    /// Items to fetch; falls back to the client's `feed_count` default.
    pub count: Option<u32>,
    /// Only items the user has saved.
    pub saved_only: bool,
}

impl FeedItemsQuery {
    #[must_use]
    pub const fn count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub const fn saved_only(mut self) -> Self {
        self.saved_only = true;
        self
    }

    fn body(&self, default_count: u32) -> Value {
        json!({
            "count": self.count.unwrap_or(default_count),
            "sortBy": 1,
            "filterOptions": {
                "isSavedOnly": self.saved_only,
                "tags": [],
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawAttachment {
    #[serde(deserialize_with = "lenient_i64")]
    attachment_id: Option<i64>,
    name: Option<String>,
    path: Option<String>,
    #[serde(rename = "type", deserialize_with = "lenient_i64")]
    kind: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawFeedItem {
    attachments: Option<Vec<RawAttachment>>,
    #[serde(deserialize_with = "lenient_bool")]
    can_react: Option<bool>,
    created_timestamp: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    user_id_creator: Option<i64>,
    created_user_name: Option<String>,
    user_photo_path: Option<String>,
    #[serde(deserialize_with = "lenient_i64")]
    feed_item_id: Option<i64>,
    #[serde(deserialize_with = "lenient_bool")]
    is_saved: Option<bool>,
    #[serde(deserialize_with = "lenient_bool")]
    is_viewed: Option<bool>,
    item_content: Option<String>,
    title: Option<String>,
}

fn normalize(raw: RawFeedItem, base: &Url) -> FeedItem {
    FeedItem {
        id: raw.feed_item_id,
        title: raw.title,
        content: raw.item_content,
        author: FeedItemAuthor {
            id: raw.user_id_creator,
            name: raw.created_user_name,
            photo_url: resolve_url(base, raw.user_photo_path.as_deref()),
        },
        attachments: raw
            .attachments
            .unwrap_or_default()
            .into_iter()
            .map(|a| FeedAttachment {
                id: a.attachment_id,
                name: a.name,
                url: resolve_url(base, a.path.as_deref()),
                kind: a.kind.and_then(AttachmentKind::from_code),
            })
            .collect(),
        created_time: parse_timestamp(raw.created_timestamp.as_deref()),
        can_react: raw.can_react.unwrap_or(false),
        is_saved: raw.is_saved.unwrap_or(false),
        is_viewed: raw.is_viewed.unwrap_or(false),
    }
}

/// Decode a captured `GetFeedItems` response. Attachment and photo paths are
/// resolved against `base`.
///
/// # Errors
///
/// Returns [`compass_core::CompassError::Upstream`] for a failed or
/// mis-shaped envelope.
pub fn decode(response: Value, base: &Url) -> Result<Vec<FeedItem>> {
    let raw: Vec<RawFeedItem> = decode_envelope(OPERATION, response)?;
    Ok(raw.into_iter().map(|item| normalize(item, base)).collect())
}

impl CompassClient {
    /// Items on the user's home-page feed, newest first as the portal orders
    /// them.
    ///
    /// # Errors
    ///
    /// Precondition, transport, or upstream errors.
    pub async fn get_feed_items(&self, query: FeedItemsQuery) -> Result<Vec<FeedItem>> {
        let body = query.body(self.defaults().feed_count);
        let raw: Vec<RawFeedItem> = self.call(OPERATION, PATH, Method::POST, Some(body)).await?;
        let base = self.base_url()?;
        Ok(raw.into_iter().map(|item| normalize(item, base)).collect())
    }
}
