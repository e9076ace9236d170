//! Session cookies.
//!
//! The portal is a single origin, so the jar does no domain or path matching
//! when building the `Cookie` header: every stored cookie is replayed.

use chrono::{DateTime, NaiveDateTime, Utc};
use compass_core::{CompassError, Result};
use reqwest::header::{HeaderMap, SET_COOKIE};

/// `Expires` layouts seen in the wild besides RFC 1123, with the trailing
/// `GMT` stripped.
const EXPIRES_FORMATS: [&str; 3] = [
    "%a, %d-%b-%Y %H:%M:%S",
    "%A, %d-%b-%y %H:%M:%S",
    "%a %b %e %H:%M:%S %Y",
];

/// One session cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: "/".into(),
        }
    }

    /// Parse a serialized `name=value` pair.
    ///
    /// Splits on the first `=` so values may themselves contain `=`.
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] if there is no `=` or the name
    /// is empty.
    pub fn parse_pair(pair: &str, domain: &str) -> Result<Self> {
        let (name, value) = pair
            .trim()
            .trim_end_matches(';')
            .split_once('=')
            .ok_or_else(|| {
                CompassError::Configuration(format!("cookie `{pair}` is not of the form name=value"))
            })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(CompassError::Configuration(format!(
                "cookie `{pair}` has an empty name"
            )));
        }
        Ok(Self::new(name, value.trim(), domain))
    }

    /// Parse every pair in a serialized cookie header (`a=1; b=2`).
    ///
    /// # Errors
    ///
    /// Returns [`CompassError::Configuration`] if any non-empty segment is
    /// malformed.
    pub fn parse_header(header: &str, domain: &str) -> Result<Vec<Self>> {
        header
            .split(';')
            .filter(|segment| !segment.trim().is_empty())
            .map(|segment| Self::parse_pair(segment, domain))
            .collect()
    }

    /// Parse a `Set-Cookie` header value. `Domain` and `Path` attributes are
    /// honoured. `Max-Age`, or failing that `Expires`, decides whether the
    /// cookie is already expired. Returns `None` for a malformed header.
    #[must_use]
    pub fn parse_set_cookie(header: &str, default_domain: &str) -> Option<SetCookie> {
        let mut parts = header.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut cookie = Self::new(name, value.trim().trim_matches('"'), default_domain);
        let mut max_age = None;
        let mut expires = None;
        for attribute in parts {
            let (key, val) = attribute
                .split_once('=')
                .map_or((attribute.trim(), ""), |(k, v)| (k.trim(), v.trim()));
            if key.eq_ignore_ascii_case("domain") && !val.is_empty() {
                cookie.domain = val.trim_start_matches('.').to_string();
            } else if key.eq_ignore_ascii_case("path") && !val.is_empty() {
                cookie.path = val.to_string();
            } else if key.eq_ignore_ascii_case("max-age") {
                max_age = val.parse::<i64>().ok();
            } else if key.eq_ignore_ascii_case("expires") {
                expires = parse_expires(val);
            }
        }

        let expired = cookie.value.is_empty()
            || max_age.map_or_else(
                || expires.is_some_and(|at| at <= Utc::now()),
                |secs| secs <= 0,
            );

        Some(if expired {
            SetCookie::Remove(cookie)
        } else {
            SetCookie::Store(cookie)
        })
    }

    /// `name=value`, as sent in a `Cookie` header.
    #[must_use]
    pub fn pair(&self) -> String {
        format!("{}={}", self.name, self.value)
    }

    fn same_slot(&self, other: &Self) -> bool {
        self.name == other.name && self.domain == other.domain && self.path == other.path
    }
}

fn parse_expires(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc2822(value) {
        return Some(at.with_timezone(&Utc));
    }
    let value = value.trim_end_matches("GMT").trim_end();
    let parsed = EXPIRES_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok());
    if parsed.is_none() {
        tracing::debug!(expires = value, "ignoring unparseable cookie expiry");
    }
    parsed.map(|naive| naive.and_utc())
}

/// Outcome of parsing a `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetCookie {
    Store(Cookie),
    /// Empty value, non-positive `Max-Age` or a past `Expires`: the server is
    /// clearing it.
    Remove(Cookie),
}

/// Ordered cookie store. A cookie with the same name, domain and path as an
/// existing one replaces it in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<Cookie>,
}

impl CookieJar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cookie: Cookie) {
        if let Some(slot) = self.cookies.iter_mut().find(|c| c.same_slot(&cookie)) {
            *slot = cookie;
        } else {
            self.cookies.push(cookie);
        }
    }

    pub fn remove(&mut self, cookie: &Cookie) {
        self.cookies.retain(|c| !c.same_slot(cookie));
    }

    pub fn apply(&mut self, set_cookie: SetCookie) {
        match set_cookie {
            SetCookie::Store(cookie) => self.insert(cookie),
            SetCookie::Remove(cookie) => self.remove(&cookie),
        }
    }

    /// Apply every `Set-Cookie` header in a response.
    pub fn absorb(&mut self, headers: &HeaderMap, default_domain: &str) {
        for value in headers.get_all(SET_COOKIE) {
            let Ok(raw) = value.to_str() else {
                tracing::warn!("ignoring non-ASCII Set-Cookie header");
                continue;
            };
            match Cookie::parse_set_cookie(raw, default_domain) {
                Some(set_cookie) => self.apply(set_cookie),
                None => tracing::warn!("ignoring malformed Set-Cookie header"),
            }
        }
    }

    /// First cookie with this name, regardless of domain or path.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Cookie> {
        self.cookies.iter().find(|c| c.name == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// The value of a `Cookie` request header carrying every stored cookie.
    #[must_use]
    pub fn header_value(&self) -> String {
        self.cookies
            .iter()
            .map(Cookie::pair)
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cookie> {
        self.cookies.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }
}

impl FromIterator<Cookie> for CookieJar {
    fn from_iter<I: IntoIterator<Item = Cookie>>(iter: I) -> Self {
        let mut jar = Self::new();
        for cookie in iter {
            jar.insert(cookie);
        }
        jar
    }
}
