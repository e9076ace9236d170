//! Shared HTTP helpers for the session manager and login driver.

use compass_core::{CompassError, Result};
use reqwest::header::{COOKIE, HeaderMap, HeaderValue};

use crate::cookies::CookieJar;

/// Return the response unchanged on success; otherwise a
/// [`CompassError::Status`] carrying the status code and response body.
///
/// Redirects count as success here; callers that follow redirects by hand
/// inspect them before calling this.
pub async fn check_response(resp: reqwest::Response, path: &str) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() || status.is_redirection() {
        return Ok(resp);
    }
    Err(CompassError::Status {
        status: status.as_u16(),
        path: path.to_string(),
        message: resp.text().await.unwrap_or_default(),
    })
}

/// A `Cookie` header for every cookie in the jar, or nothing if it is empty.
pub fn cookie_headers(jar: &CookieJar) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    if !jar.is_empty() {
        let value = HeaderValue::from_str(&jar.header_value()).map_err(|e| {
            CompassError::Configuration(format!("cookie values are not valid header text: {e}"))
        })?;
        headers.insert(COOKIE, value);
    }
    Ok(headers)
}
