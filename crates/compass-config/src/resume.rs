//! Pre-existing session cookies.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ResumeConfig {
    /// Serialized cookies (`name=value`) from an earlier login. When present
    /// the client can restore the session instead of logging in again.
    #[serde(default)]
    pub cookies: Vec<String>,
}

impl ResumeConfig {
    pub fn is_configured(&self) -> bool {
        self.cookies.iter().any(|c| !c.trim().is_empty())
    }
}
