//! # compass-client
//!
//! Typed accessors for Compass portal services.
//!
//! Each module wraps one remote operation: it builds the request, sends it
//! through the owned [`Session`], validates the `{ d, h? }` envelope and maps
//! the loosely typed payload onto a record from [`compass_core::entities`].
//! Every module also exposes a pure `decode` function that turns a captured
//! response into the same records without touching the network.
//!
//! ```no_run
//! use compass_client::{CalendarEventsQuery, CompassClient};
//!
//! # async fn run() -> compass_core::Result<()> {
//! let mut client = CompassClient::new("school.compass.education")?;
//! client.login("jdoe", "hunter2").await?;
//! for event in client.get_calendar_events(CalendarEventsQuery::default()).await? {
//!     println!("{:?} {:?}", event.start, event.subject_title);
//! }
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```

pub mod academic_groups;
pub mod calendar;
pub mod campuses;
pub mod feed;
pub mod files;
pub mod group_activities;
pub mod learning_tasks;
pub mod lessons;
pub mod locations;
pub mod news;
pub mod staff;
pub mod subjects;
pub mod tasks;
pub mod terms;
pub mod user;
pub mod year_levels;

mod envelope;

pub use calendar::CalendarEventsQuery;
pub use envelope::decode_envelope;
pub use feed::FeedItemsQuery;
pub use learning_tasks::LearningTasksQuery;
pub use news::NewsFeedQuery;

pub use compass_core::entities;
pub use compass_core::{CompassError, ErrorKind, Result};

use compass_config::{CompassConfig, DefaultsConfig};
use compass_session::{Credentials, Method, Session, SessionOptions, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Client for one school's Compass portal. Owns exactly one [`Session`].
#[derive(Debug)]
pub struct CompassClient {
    session: Session,
    defaults: DefaultsConfig,
}

impl CompassClient {
    /// A configured, not yet authenticated client with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] for an unusable base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self::with_session(Session::with_base_url(
            base_url,
            SessionOptions::default(),
        )?))
    }

    /// A configured client built from loaded configuration. Does not log in;
    /// see [`CompassClient::connect`].
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] if the configuration does not
    /// validate or the base URL is unusable.
    pub fn from_config(config: &CompassConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| CompassError::Configuration(e.to_string()))?;
        let session = Session::with_base_url(
            &config.portal.base_url,
            SessionOptions::from_config(&config.portal),
        )?;
        Ok(Self {
            session,
            defaults: config.defaults.clone(),
        })
    }

    /// Wrap an existing session, in whatever state it is.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session,
            defaults: DefaultsConfig::default(),
        }
    }

    /// Build from configuration and authenticate: restore the configured
    /// cookies if there are any, otherwise log in with the configured
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] if neither cookies nor
    /// credentials are configured, plus anything [`Session::restore`] or
    /// [`Session::login`] can return.
    pub async fn connect(config: &CompassConfig) -> Result<Self> {
        let mut client = Self::from_config(config)?;
        if config.session.is_configured() {
            let cookies: Vec<&str> = config
                .session
                .cookies
                .iter()
                .map(String::as_str)
                .filter(|c| !c.trim().is_empty())
                .collect();
            client.restore(&cookies).await?;
        } else if config.credentials.is_configured() {
            client
                .login(&config.credentials.username, &config.credentials.password)
                .await?;
        } else {
            return Err(CompassError::Configuration(
                "neither session cookies nor credentials are configured".into(),
            ));
        }
        Ok(client)
    }

    /// Override the paging defaults used when a query leaves them unset.
    #[must_use]
    pub fn with_defaults(mut self, defaults: DefaultsConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// # Errors
    ///
    /// See [`Session::login`].
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        self.session
            .login(&Credentials::new(username, password))
            .await
    }

    /// Resume from serialized `name=value` cookies.
    ///
    /// # Errors
    ///
    /// See [`Session::restore_from_pairs`].
    pub async fn restore<S: AsRef<str>>(&mut self, cookies: &[S]) -> Result<()> {
        self.session.restore_from_pairs(cookies).await
    }

    /// # Errors
    ///
    /// See [`Session::logout`].
    pub async fn logout(&mut self) -> Result<()> {
        self.session.logout().await
    }

    /// The signed-in user's numeric id.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Precondition`] if the session is not
    /// authenticated.
    pub fn get_user_id(&self) -> Result<i64> {
        self.session.authenticated_user_id()
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    pub const fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    #[must_use]
    pub const fn defaults(&self) -> &DefaultsConfig {
        &self.defaults
    }

    /// Send a request and decode its envelope.
    pub(crate) async fn call<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        method: Method,
        body: Option<Value>,
    ) -> Result<T> {
        let response = self.session.request(path, method, body.as_ref()).await?;
        decode_envelope(operation, response)
    }

    pub(crate) fn base_url(&self) -> Result<&Url> {
        self.session
            .base_url()
            .ok_or_else(|| CompassError::Precondition("no base URL configured".into()))
    }
}

/// Path for a `ReferenceDataCache` listing. `key` is the school's config
/// cache key, sent as `v=` when known.
pub(crate) fn reference_data_path(endpoint: &str, key: Option<&str>) -> String {
    let cache_key = key.map_or_else(String::new, |k| format!("&v={}", urlencoding::encode(k)));
    format!(
        "/Services/ReferenceDataCache.svc/{endpoint}?sessionstate=readonly{cache_key}&page=1&start=0&limit=100"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_path_with_and_without_key() {
        assert_eq!(
            reference_data_path("GetAllCampuses", None),
            "/Services/ReferenceDataCache.svc/GetAllCampuses?sessionstate=readonly&page=1&start=0&limit=100"
        );
        assert_eq!(
            reference_data_path("GetAllAcademicGroups", Some("cfg 7")),
            "/Services/ReferenceDataCache.svc/GetAllAcademicGroups?sessionstate=readonly&v=cfg%207&page=1&start=0&limit=100"
        );
    }

    #[test]
    fn new_client_is_configured_but_not_authenticated() {
        let client = CompassClient::new("school.compass.education").unwrap();
        assert_eq!(
            client.session().state(),
            compass_session::SessionState::Configured
        );
        assert_eq!(client.get_user_id().unwrap_err().kind(), ErrorKind::Precondition);
    }

    #[test]
    fn from_config_requires_a_portal() {
        let err = CompassClient::from_config(&CompassConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn from_config_carries_defaults() {
        let mut config = CompassConfig::default();
        config.portal.base_url = "school.compass.education".into();
        config.defaults.feed_count = 10;
        let client = CompassClient::from_config(&config).unwrap();
        assert_eq!(client.defaults().feed_count, 10);
    }

    #[tokio::test]
    async fn connect_without_credentials_or_cookies_fails() {
        let mut config = CompassConfig::default();
        config.portal.base_url = "school.compass.education".into();
        let err = CompassClient::connect(&config).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }
}
