//! Portal connection settings.

use serde::{Deserialize, Serialize};

fn default_login_endpoint() -> String {
    "/login.aspx?sessionstate=disabled".to_string()
}

fn default_session_cookie() -> String {
    "cpssid".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PortalConfig {
    /// School host or origin, e.g. `school.compass.education`.
    #[serde(default)]
    pub base_url: String,

    /// Login form path, resolved against `base_url`.
    #[serde(default = "default_login_endpoint")]
    pub login_endpoint: String,

    /// Name of the cookie that proves a session exists.
    #[serde(default = "default_session_cookie")]
    pub session_cookie: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds. `0` keeps the transport default.
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            login_endpoint: default_login_endpoint(),
            session_cookie: default_session_cookie(),
            user_agent: default_user_agent(),
            timeout_secs: 0,
        }
    }
}

impl PortalConfig {
    pub fn is_configured(&self) -> bool {
        !self.base_url.trim().is_empty()
    }
}
