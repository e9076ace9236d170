//! Default paging parameters for list endpoints.

use serde::{Deserialize, Serialize};

const fn default_calendar_limit() -> u32 {
    25
}

const fn default_feed_count() -> u32 {
    25
}

const fn default_learning_task_limit() -> u32 {
    500
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    /// Calendar events fetched per call when the query leaves `limit` unset.
    #[serde(default = "default_calendar_limit")]
    pub calendar_limit: u32,

    #[serde(default = "default_feed_count")]
    pub feed_count: u32,

    #[serde(default = "default_learning_task_limit")]
    pub learning_task_limit: u32,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            calendar_limit: default_calendar_limit(),
            feed_count: default_feed_count(),
            learning_task_limit: default_learning_task_limit(),
        }
    }
}
