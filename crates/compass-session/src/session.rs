//! The session manager.
//!
//! A [`Session`] walks `Unconfigured → Configured → Authenticated → Closed`.
//! Navigation (`login`, `restore`, `logout`) takes `&mut self`; steady-state
//! traffic (`request`, `download`) takes `&self` and may run concurrently.

use std::fmt;
use std::time::Duration;

use compass_config::PortalConfig;
use compass_core::{CompassError, Result};
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde_json::Value;

use crate::cookies::{Cookie, CookieJar};
use crate::driver::{Credentials, LoginDriver};
use crate::extract;
use crate::form_login::FormLoginDriver;
use crate::http::{check_response, cookie_headers};
use crate::url::normalize_base_url;

const ACCEPT_LANGUAGE_VALUE: &str = "en-AU,en;q=0.9";
const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unconfigured,
    Configured,
    Authenticated,
    Closed,
}

impl SessionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::Configured => "configured",
            Self::Authenticated => "authenticated",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Portal-specific knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Login form path, resolved against the base URL.
    pub login_endpoint: String,
    /// Cookie whose presence proves a login succeeded.
    pub session_cookie: String,
    pub user_agent: String,
    /// `None` keeps the transport default.
    pub timeout: Option<Duration>,
}

impl SessionOptions {
    #[must_use]
    pub fn from_config(portal: &PortalConfig) -> Self {
        Self {
            login_endpoint: portal.login_endpoint.clone(),
            session_cookie: portal.session_cookie.clone(),
            user_agent: portal.user_agent.clone(),
            timeout: (portal.timeout_secs > 0).then(|| Duration::from_secs(portal.timeout_secs)),
        }
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self::from_config(&PortalConfig::default())
    }
}

pub struct Session {
    options: SessionOptions,
    base_url: Option<Url>,
    jar: CookieJar,
    user_id: Option<i64>,
    school_config_key: Option<String>,
    state: SessionState,
    http: reqwest::Client,
    driver: Box<dyn LoginDriver>,
}

impl Session {
    /// An unconfigured session using the [`FormLoginDriver`].
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Http`] if an HTTP client cannot be built.
    pub fn new(options: SessionOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(options.user_agent.as_str());
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }
        let driver = FormLoginDriver::new(&options.user_agent, options.timeout)?;
        Ok(Self {
            options,
            base_url: None,
            jar: CookieJar::new(),
            user_id: None,
            school_config_key: None,
            state: SessionState::Unconfigured,
            http: builder.build()?,
            driver: Box::new(driver),
        })
    }

    /// [`Session::new`] followed by [`Session::configure`].
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] for an unusable base URL.
    pub fn with_base_url(base_url: &str, options: SessionOptions) -> Result<Self> {
        let mut session = Self::new(options)?;
        session.configure(base_url)?;
        Ok(session)
    }

    /// Replace the login surface.
    #[must_use]
    pub fn with_driver(mut self, driver: impl LoginDriver + 'static) -> Self {
        self.driver = Box::new(driver);
        self
    }

    /// Set the portal origin. Allowed until the session authenticates.
    ///
    /// # Errors
    ///
    /// [`CompassError::Precondition`] once authenticated or closed;
    /// [`CompassError::Configuration`] for an unusable URL.
    pub fn configure(&mut self, base_url: &str) -> Result<()> {
        if matches!(
            self.state,
            SessionState::Authenticated | SessionState::Closed
        ) {
            return Err(CompassError::Precondition(format!(
                "cannot change the base URL of a {} session",
                self.state
            )));
        }
        let url = normalize_base_url(base_url)?;
        tracing::debug!(base_url = %url, "session configured");
        self.base_url = Some(url);
        self.state = SessionState::Configured;
        Ok(())
    }

    /// Log in through the configured [`LoginDriver`].
    ///
    /// On any failure the session stays `Configured` with no cookies.
    ///
    /// # Errors
    ///
    /// - [`CompassError::Precondition`] unless the session is `Configured`.
    /// - [`CompassError::Authentication`] for empty credentials, a visible
    ///   error banner, or a missing session cookie.
    /// - [`CompassError::Session`] if no user id can be derived.
    /// - Transport errors from the driver.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<()> {
        let base = self.configured_base("log in")?.clone();
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(CompassError::Authentication(
                "username and password must not be empty".into(),
            ));
        }
        let login_url = base.join(&self.options.login_endpoint).map_err(|e| {
            CompassError::Configuration(format!(
                "invalid login endpoint `{}`: {e}",
                self.options.login_endpoint
            ))
        })?;

        self.jar.clear();
        tracing::debug!(%login_url, username = %credentials.username, "submitting login form");
        let outcome = self.driver.submit(&login_url, credentials).await?;

        if let Some(banner) = outcome.error_banner {
            return Err(CompassError::Authentication(if banner.is_empty() {
                "failed to login".into()
            } else {
                format!("failed to login: {banner}")
            }));
        }
        if !outcome.cookies.contains(&self.options.session_cookie) {
            return Err(CompassError::Authentication(format!(
                "login did not produce a `{}` session cookie",
                self.options.session_cookie
            )));
        }
        let user_id = extract::derive_user_id(&outcome.cookies, &outcome.landing_page)?;

        self.school_config_key = extract::school_config_key(&outcome.landing_page);
        self.jar = outcome.cookies;
        self.user_id = Some(user_id);
        self.state = SessionState::Authenticated;
        tracing::info!(user_id, cookies = self.jar.len(), "logged in");
        Ok(())
    }

    /// Resume a session from cookies captured by an earlier login.
    ///
    /// Loads the portal home page with the cookies and derives the user id
    /// from it. On failure the session stays `Configured` with no cookies.
    ///
    /// # Errors
    ///
    /// - [`CompassError::Precondition`] unless the session is `Configured`.
    /// - [`CompassError::Configuration`] for an empty cookie list.
    /// - [`CompassError::Session`] if the home page yields no user id, which
    ///   usually means the cookies have expired.
    pub async fn restore(&mut self, cookies: impl IntoIterator<Item = Cookie>) -> Result<()> {
        let base = self.configured_base("restore")?.clone();
        let mut jar: CookieJar = cookies.into_iter().collect();
        if jar.is_empty() {
            return Err(CompassError::Configuration(
                "no cookies to restore the session from".into(),
            ));
        }

        self.jar.clear();
        let resp = self
            .http
            .get(base.clone())
            .headers(cookie_headers(&jar)?)
            .send()
            .await?;
        jar.absorb(resp.headers(), base.host_str().unwrap_or_default());
        let page = check_response(resp, base.path()).await?.text().await?;
        let user_id = extract::derive_user_id(&jar, &page)?;

        self.school_config_key = extract::school_config_key(&page);
        self.jar = jar;
        self.user_id = Some(user_id);
        self.state = SessionState::Authenticated;
        tracing::info!(user_id, cookies = self.jar.len(), "session restored");
        Ok(())
    }

    /// [`Session::restore`] from serialized `name=value` pairs, each either a
    /// single cookie or a whole `a=1; b=2` header.
    ///
    /// # Errors
    ///
    /// As [`Session::restore`], plus [`CompassError::Configuration`] for a
    /// malformed pair.
    pub async fn restore_from_pairs<S: AsRef<str>>(&mut self, pairs: &[S]) -> Result<()> {
        let host = self
            .configured_base("restore")?
            .host_str()
            .unwrap_or_default()
            .to_string();
        let mut cookies = Vec::new();
        for pair in pairs {
            cookies.extend(Cookie::parse_header(pair.as_ref(), &host)?);
        }
        self.restore(cookies).await
    }

    /// Send an authenticated request and return the parsed JSON body as-is.
    ///
    /// # Errors
    ///
    /// [`CompassError::Precondition`] unless authenticated (no network call
    /// is made); transport errors for a failed send, a non-2xx status, or a
    /// body that is not JSON.
    pub async fn request(&self, path: &str, method: Method, body: Option<&Value>) -> Result<Value> {
        let url = self.resolve(path)?;
        let resp = self.send(url.clone(), method, body).await?;
        let bytes = resp.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Authenticated GET returning the raw body.
    ///
    /// # Errors
    ///
    /// As [`Session::request`], minus JSON decoding.
    pub async fn download(&self, path: &str) -> Result<Vec<u8>> {
        let url = self.resolve(path)?;
        let resp = self.send(url, Method::GET, None).await?;
        Ok(resp.bytes().await?.to_vec())
    }

    /// Release the driver and forget the session. Idempotent.
    ///
    /// The session is `Closed` afterwards even if the driver fails to close;
    /// that failure is still returned.
    ///
    /// # Errors
    ///
    /// Whatever [`LoginDriver::close`] reports.
    pub async fn logout(&mut self) -> Result<()> {
        if self.state == SessionState::Closed {
            return Ok(());
        }
        let closed = self.driver.close().await;
        self.jar.clear();
        self.user_id = None;
        self.school_config_key = None;
        self.state = SessionState::Closed;
        tracing::info!("logged out");
        closed
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    #[must_use]
    pub const fn user_id(&self) -> Option<i64> {
        self.user_id
    }

    /// The user id, or [`CompassError::Precondition`] if not authenticated.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn authenticated_user_id(&self) -> Result<i64> {
        self.require_authenticated()?;
        self.user_id
            .ok_or_else(|| CompassError::Precondition("session has no user id".into()))
    }

    #[must_use]
    pub const fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    #[must_use]
    pub fn cookie_header(&self) -> String {
        self.jar.header_value()
    }

    #[must_use]
    pub fn school_config_key(&self) -> Option<&str> {
        self.school_config_key.as_deref()
    }

    #[must_use]
    pub const fn options(&self) -> &SessionOptions {
        &self.options
    }

    fn configured_base(&self, action: &str) -> Result<&Url> {
        match (self.state, self.base_url.as_ref()) {
            (SessionState::Configured, Some(base)) => Ok(base),
            (SessionState::Unconfigured, _) => Err(CompassError::Precondition(format!(
                "cannot {action}: no base URL configured"
            ))),
            (state, _) => Err(CompassError::Precondition(format!(
                "cannot {action}: session is {state}"
            ))),
        }
    }

    fn require_authenticated(&self) -> Result<&Url> {
        match (self.state, self.base_url.as_ref()) {
            (SessionState::Authenticated, Some(base)) => Ok(base),
            (state, _) => Err(CompassError::Precondition(format!(
                "request requires an authenticated session, but it is {state}"
            ))),
        }
    }

    fn resolve(&self, path: &str) -> Result<Url> {
        self.require_authenticated()?
            .join(path)
            .map_err(|e| CompassError::Configuration(format!("invalid request path `{path}`: {e}")))
    }

    async fn send(&self, url: Url, method: Method, body: Option<&Value>) -> Result<reqwest::Response> {
        tracing::debug!(%method, path = url.path(), "portal request");
        let mut request = self
            .http
            .request(method, url.clone())
            .headers(cookie_headers(&self.jar)?)
            .header(ACCEPT, "*/*")
            .header(ACCEPT_LANGUAGE, ACCEPT_LANGUAGE_VALUE)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }
        check_response(request.send().await?, url.path()).await
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("base_url", &self.base_url.as_ref().map(Url::as_str))
            .field("user_id", &self.user_id)
            .field("cookies", &self.jar.len())
            .finish_non_exhaustive()
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if self.state == SessionState::Authenticated {
            tracing::debug!("authenticated session dropped without logout");
        }
    }
}
