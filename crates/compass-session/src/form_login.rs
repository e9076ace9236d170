//! Login by posting the portal's ASP.NET form over plain HTTP.

use std::time::Duration;

use async_trait::async_trait;
use compass_core::{CompassError, Result};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Method, Url};

use crate::cookies::CookieJar;
use crate::driver::{Credentials, LoginDriver, LoginOutcome};
use crate::extract;
use crate::http::{check_response, cookie_headers};

/// Redirect hops followed after submitting the form.
const MAX_REDIRECTS: usize = 10;

/// Names of the form fields the driver fills in.
#[derive(Debug, Clone)]
pub struct FormFields {
    pub username: String,
    pub password: String,
    /// Value posted as `__EVENTTARGET`, naming the submit control.
    pub event_target: Option<String>,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            username: "username".into(),
            password: "password".into(),
            event_target: Some("button1".into()),
        }
    }
}

/// [`LoginDriver`] that fetches the login page, carries over its hidden
/// fields (`__VIEWSTATE` and friends), posts the credentials, and follows the
/// redirect chain by hand so every `Set-Cookie` along the way is kept.
pub struct FormLoginDriver {
    http: reqwest::Client,
    fields: FormFields,
}

impl FormLoginDriver {
    /// # Errors
    ///
    /// Returns [`CompassError::Http`] if the HTTP client cannot be built.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
            fields: FormFields::default(),
        })
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FormFields) -> Self {
        self.fields = fields;
        self
    }

    /// Body pairs for the form post: the page's hidden inputs, then the
    /// credentials and event target, which override same-named hidden inputs.
    fn form_pairs(&self, login_page: &str, credentials: &Credentials) -> Vec<(String, String)> {
        let mut overrides = vec![
            (self.fields.username.clone(), credentials.username.clone()),
            (self.fields.password.clone(), credentials.password.clone()),
        ];
        if let Some(target) = &self.fields.event_target {
            overrides.push(("__EVENTTARGET".into(), target.clone()));
        }

        let mut pairs: Vec<(String, String)> = extract::hidden_inputs(login_page)
            .into_iter()
            .filter(|(name, _)| !overrides.iter().any(|(o, _)| o == name))
            .collect();
        pairs.extend(overrides);
        pairs
    }

    async fn send(
        &self,
        method: Method,
        url: &Url,
        jar: &CookieJar,
        form: Option<String>,
    ) -> Result<reqwest::Response> {
        let mut request = self
            .http
            .request(method, url.clone())
            .headers(cookie_headers(jar)?);
        if let Some(body) = form {
            request = request
                .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(body);
        }
        Ok(request.send().await?)
    }

    /// Follow redirects from `resp`, absorbing cookies at every hop. Returns
    /// the final URL and page body.
    async fn settle(
        &self,
        mut resp: reqwest::Response,
        mut url: Url,
        jar: &mut CookieJar,
    ) -> Result<(Url, String)> {
        for _ in 0..=MAX_REDIRECTS {
            jar.absorb(resp.headers(), url.host_str().unwrap_or_default());
            let resp_checked = check_response(resp, url.path()).await?;
            if !resp_checked.status().is_redirection() {
                let body = resp_checked.text().await?;
                return Ok((url, body));
            }

            let location = resp_checked
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| CompassError::Status {
                    status: resp_checked.status().as_u16(),
                    path: url.path().to_string(),
                    message: "redirect without a Location header".into(),
                })?;
            url = url.join(location).map_err(|e| CompassError::Status {
                status: resp_checked.status().as_u16(),
                path: url.path().to_string(),
                message: format!("unusable redirect target `{location}`: {e}"),
            })?;
            tracing::debug!(%url, "following login redirect");
            resp = self.send(Method::GET, &url, jar, None).await?;
        }

        Err(CompassError::Status {
            status: resp.status().as_u16(),
            path: url.path().to_string(),
            message: format!("more than {MAX_REDIRECTS} redirects during login"),
        })
    }
}

fn encode_form(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl LoginDriver for FormLoginDriver {
    async fn submit(&self, login_url: &Url, credentials: &Credentials) -> Result<LoginOutcome> {
        let mut jar = CookieJar::new();

        let resp = self.send(Method::GET, login_url, &jar, None).await?;
        let (form_url, login_page) = self.settle(resp, login_url.clone(), &mut jar).await?;

        let body = encode_form(&self.form_pairs(&login_page, credentials));
        let resp = self.send(Method::POST, &form_url, &jar, Some(body)).await?;
        let (landing_url, landing_page) = self.settle(resp, form_url, &mut jar).await?;

        tracing::debug!(%landing_url, cookies = jar.len(), "login form submitted");
        Ok(LoginOutcome {
            error_banner: extract::error_banner(&landing_page),
            cookies: jar,
            landing_page,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn driver() -> FormLoginDriver {
        FormLoginDriver::new("test-agent", None).unwrap()
    }

    #[test]
    fn form_pairs_keep_hidden_fields_and_override_target() {
        let page = r#"<input type="hidden" name="__VIEWSTATE" value="vs" />
                      <input type="hidden" name="__EVENTTARGET" value="" />"#;
        let pairs = driver().form_pairs(page, &Credentials::new("jdoe", "p@ss word"));
        assert_eq!(
            pairs,
            vec![
                ("__VIEWSTATE".to_string(), "vs".to_string()),
                ("username".to_string(), "jdoe".to_string()),
                ("password".to_string(), "p@ss word".to_string()),
                ("__EVENTTARGET".to_string(), "button1".to_string()),
            ]
        );
    }

    #[test]
    fn custom_fields_without_event_target() {
        let fields = FormFields {
            username: "user".into(),
            password: "pass".into(),
            event_target: None,
        };
        let pairs = driver()
            .with_fields(fields)
            .form_pairs("", &Credentials::new("a", "b"));
        assert_eq!(
            pairs,
            vec![
                ("user".to_string(), "a".to_string()),
                ("pass".to_string(), "b".to_string()),
            ]
        );
    }

    #[test]
    fn form_encoding_escapes_values() {
        let body = encode_form(&[
            ("username".into(), "jdoe".into()),
            ("password".into(), "p@ss word&x".into()),
        ]);
        assert_eq!(body, "username=jdoe&password=p%40ss%20word%26x");
    }
}
