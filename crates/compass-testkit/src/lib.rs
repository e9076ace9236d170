//! # compass-testkit
//!
//! A mock Compass portal on `tiny_http`, bound to `127.0.0.1:0`.
//!
//! The portal serves:
//! - `GET /login.aspx`: a login form with ASP.NET hidden fields and a
//!   pre-login `ASP.NET_SessionId` cookie.
//! - `POST /login.aspx`: checks the posted credentials. A match redirects to
//!   `/` with the session cookie set; a mismatch re-renders the form with an
//!   `error` banner.
//! - `GET /`: the landing page carrying `Compass.organisationUserId` when the
//!   session cookie is valid, otherwise a redirect back to the login form.
//! - Any route registered on the builder, gated on the session cookie.
//!
//! Every request is recorded so tests can assert on what the client sent.

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use serde_json::Value;
use tiny_http::{Header, Request, Response, Server};

/// Value of the session cookie the portal issues after a good login.
pub const SESSION_TOKEN: &str = "mock-session-token";

const LOGIN_PATH: &str = "/login.aspx";
const VIEWSTATE: &str = "dDwtMTM4NzY5MTc1Ozs+";

/// One request as the portal received it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path and query exactly as sent.
    pub url: String,
    pub cookie: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    /// The path without its query string.
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or_default()
    }

    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, q)| q)
    }

    /// The body parsed as JSON, or `Value::Null` when it is empty.
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    /// The value of a header, case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body parsed as an urlencoded form.
    pub fn form(&self) -> Vec<(String, String)> {
        parse_form(&self.body)
    }
}

#[derive(Debug, Clone)]
struct Route {
    method: String,
    path: String,
    status: u16,
    content_type: String,
    body: Vec<u8>,
}

#[derive(Debug, Clone)]
struct PortalState {
    username: String,
    password: String,
    user_id: i64,
    session_cookie: String,
    user_id_cookie: bool,
    school_config_key: Option<String>,
    routes: Vec<Route>,
}

/// Builder for a [`MockPortal`].
#[derive(Debug, Clone)]
pub struct MockPortalBuilder {
    state: PortalState,
}

impl Default for MockPortalBuilder {
    fn default() -> Self {
        Self {
            state: PortalState {
                username: "jdoe".into(),
                password: "hunter2".into(),
                user_id: 4821,
                session_cookie: "cpssid".into(),
                user_id_cookie: false,
                school_config_key: None,
                routes: Vec::new(),
            },
        }
    }
}

impl MockPortalBuilder {
    #[must_use]
    pub fn credentials(mut self, username: &str, password: &str) -> Self {
        self.state.username = username.into();
        self.state.password = password.into();
        self
    }

    #[must_use]
    pub const fn user_id(mut self, user_id: i64) -> Self {
        self.state.user_id = user_id;
        self
    }

    /// Name of the cookie set on a successful login.
    #[must_use]
    pub fn session_cookie(mut self, name: &str) -> Self {
        self.state.session_cookie = name.into();
        self
    }

    /// Also set an `organisationUserId` cookie on login, carrying a user id
    /// that differs from the one on the landing page.
    #[must_use]
    pub const fn with_user_id_cookie(mut self) -> Self {
        self.state.user_id_cookie = true;
        self
    }

    #[must_use]
    pub fn school_config_key(mut self, key: &str) -> Self {
        self.state.school_config_key = Some(key.into());
        self
    }

    /// Serve `{"d": data}` for `method path` (query ignored when matching).
    #[must_use]
    pub fn envelope(self, method: &str, path: &str, data: Value) -> Self {
        self.json(method, path, &serde_json::json!({ "d": data }))
    }

    /// Serve an arbitrary JSON body.
    #[must_use]
    pub fn json(self, method: &str, path: &str, body: &Value) -> Self {
        self.raw(method, path, 200, "application/json; charset=utf-8", body.to_string().into_bytes())
    }

    /// Serve raw bytes with a status and content type.
    #[must_use]
    pub fn raw(
        mut self,
        method: &str,
        path: &str,
        status: u16,
        content_type: &str,
        body: Vec<u8>,
    ) -> Self {
        self.state.routes.push(Route {
            method: method.to_ascii_uppercase(),
            path: path.into(),
            status,
            content_type: content_type.into(),
            body,
        });
        self
    }

    /// Bind to a random local port and start serving.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot bind.
    pub fn start(self) -> MockPortal {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("bind mock portal"));
        let port = server
            .server_addr()
            .to_ip()
            .map(|addr| addr.port())
            .expect("mock portal has an IP address");
        let requests = Arc::new(Mutex::new(Vec::new()));

        let handle = {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            let state = self.state;
            std::thread::spawn(move || serve(&server, &state, &requests))
        };

        MockPortal {
            base_url: format!("http://127.0.0.1:{port}"),
            server,
            requests,
            handle: Some(handle),
        }
    }
}

/// A running mock portal. Stops serving when dropped.
pub struct MockPortal {
    base_url: String,
    server: Arc<Server>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    handle: Option<JoinHandle<()>>,
}

impl MockPortal {
    pub fn builder() -> MockPortalBuilder {
        MockPortalBuilder::default()
    }

    /// `http://127.0.0.1:<port>`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Requests whose path (without query) equals `path`.
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() == path)
            .collect()
    }

    /// The most recent request to `path`.
    pub fn last_request_to(&self, path: &str) -> Option<RecordedRequest> {
        self.requests_to(path).pop()
    }

    /// Requests that reached a registered service route.
    pub fn service_requests(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path() != LOGIN_PATH && r.path() != "/")
            .collect()
    }
}

impl Drop for MockPortal {
    fn drop(&mut self) {
        self.server.unblock();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn serve(server: &Server, state: &PortalState, requests: &Mutex<Vec<RecordedRequest>>) {
    for mut request in server.incoming_requests() {
        let mut body = String::new();
        let _ = request.as_reader().read_to_string(&mut body);
        let recorded = RecordedRequest {
            method: request.method().as_str().to_ascii_uppercase(),
            url: request.url().to_string(),
            cookie: header_value(&request, "Cookie"),
            headers: request
                .headers()
                .iter()
                .map(|h| (h.field.as_str().as_str().to_string(), h.value.as_str().to_string()))
                .collect(),
            body,
        };
        requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(recorded.clone());

        let _ = request.respond(route(state, &recorded));
    }
}

fn route(state: &PortalState, req: &RecordedRequest) -> Response<std::io::Cursor<Vec<u8>>> {
    let authed = has_session(state, req);
    match (req.method.as_str(), req.path()) {
        ("GET", LOGIN_PATH) => html(200, &login_page(None))
            .with_header(header("Set-Cookie", "ASP.NET_SessionId=pre-login; path=/; HttpOnly")),
        ("POST", LOGIN_PATH) => submit_login(state, req),
        ("GET", "/") if authed => html(200, &landing_page(state)),
        ("GET", "/") => redirect(LOGIN_PATH),
        (method, path) => {
            if !authed {
                return text(401, "session cookie missing or invalid");
            }
            state
                .routes
                .iter()
                .find(|r| r.method == method && r.path == path)
                .map_or_else(
                    || text(404, &format!("no route for {method} {path}")),
                    |r| {
                        Response::from_data(r.body.clone())
                            .with_status_code(r.status)
                            .with_header(header("Content-Type", &r.content_type))
                    },
                )
        }
    }
}

fn submit_login(state: &PortalState, req: &RecordedRequest) -> Response<std::io::Cursor<Vec<u8>>> {
    let form = req.form();
    let field = |name: &str| {
        form.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    };

    let well_formed = field("__VIEWSTATE") == Some(VIEWSTATE) && field("__EVENTTARGET") == Some("button1");
    if !well_formed {
        return html(200, &login_page(Some("The form was submitted incorrectly.")));
    }
    if field("username") != Some(state.username.as_str())
        || field("password") != Some(state.password.as_str())
    {
        return html(
            200,
            &login_page(Some("Sorry - your username and/or password was incorrect.")),
        );
    }

    let mut resp = redirect("/").with_header(header(
        "Set-Cookie",
        &format!("{}={SESSION_TOKEN}; path=/; HttpOnly", state.session_cookie),
    ));
    resp.add_header(header("Set-Cookie", &format!("username={}; path=/", state.username)));
    resp.add_header(header("Set-Cookie", "ASP.NET_SessionId=; Max-Age=0; path=/"));
    if state.user_id_cookie {
        resp.add_header(header(
            "Set-Cookie",
            &format!("organisationUserId={}; path=/", state.user_id + 1),
        ));
    }
    resp
}

fn has_session(state: &PortalState, req: &RecordedRequest) -> bool {
    let expected = format!("{}={SESSION_TOKEN}", state.session_cookie);
    req.cookie
        .as_deref()
        .is_some_and(|c| c.split(';').any(|pair| pair.trim() == expected))
}

fn login_page(error: Option<&str>) -> String {
    let banner = error.map_or_else(String::new, |msg| {
        format!(r#"<div class="login-box error"><span>{msg}</span></div>"#)
    });
    format!(
        r#"<!DOCTYPE html>
<html><head><title>Compass - Login</title></head>
<body>
<form method="post" action="{LOGIN_PATH}?sessionstate=disabled" id="form1">
  <input type="hidden" name="__EVENTTARGET" id="__EVENTTARGET" value="" />
  <input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="{VIEWSTATE}" />
  {banner}
  <input name="username" type="text" id="username" />
  <input name="password" type="password" id="password" />
  <input type="submit" name="button1" value="Sign in" id="button1" />
</form>
</body></html>"#
    )
}

fn landing_page(state: &PortalState) -> String {
    let key = state
        .school_config_key
        .as_deref()
        .map_or_else(String::new, |k| format!("Compass.schoolConfigKey = \"{k}\";"));
    format!(
        r"<!DOCTYPE html>
<html><head><script>
var Compass = Compass || {{}};
Compass.organisationUserId = {id};
{key}
</script></head>
<body><div id='c-main'>Welcome</div></body></html>",
        id = state.user_id
    )
}

fn parse_form(body: &str) -> Vec<(String, String)> {
    body.split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(k), decode(v))
        })
        .collect()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced).map_or(spaced.clone(), std::borrow::Cow::into_owned)
}

fn header_value(request: &Request, name: &str) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str().to_string())
}

fn header(name: &str, value: &str) -> Header {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).expect("valid header")
}

fn html(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body)
        .with_status_code(status)
        .with_header(header("Content-Type", "text/html; charset=utf-8"))
}

fn text(status: u16, body: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string(body).with_status_code(status)
}

fn redirect(location: &str) -> Response<std::io::Cursor<Vec<u8>>> {
    Response::from_string("")
        .with_status_code(302)
        .with_header(header("Location", location))
}
