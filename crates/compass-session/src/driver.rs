//! The login surface.
//!
//! [`LoginDriver`] is the seam between the session manager and whatever
//! actually submits the portal's login form. [`crate::FormLoginDriver`]
//! posts the form over HTTP; a headless-browser driver implements the same
//! trait and reports the same [`LoginOutcome`].

use std::fmt;

use async_trait::async_trait;
use compass_core::Result;
use reqwest::Url;

use crate::cookies::CookieJar;

/// Username and password for the portal.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What the driver saw once navigation after submitting the form settled.
#[derive(Debug, Clone, Default)]
pub struct LoginOutcome {
    /// Every cookie set during the flow.
    pub cookies: CookieJar,
    /// HTML of the page the portal landed on.
    pub landing_page: String,
    /// Text of a visible error indicator, if the page showed one.
    pub error_banner: Option<String>,
}

/// Submits credentials to the portal and reports the resulting page.
#[async_trait]
pub trait LoginDriver: Send + Sync {
    /// Fill and submit the login form at `login_url`, wait for navigation to
    /// finish, and report cookies, landing page, and any error banner.
    ///
    /// A rejected login is reported through [`LoginOutcome::error_banner`],
    /// not as an `Err`; `Err` is for transport failures.
    async fn submit(&self, login_url: &Url, credentials: &Credentials) -> Result<LoginOutcome>;

    /// Release whatever the driver holds (browser process, connections).
    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
