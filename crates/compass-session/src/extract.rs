//! Scraping the login and landing pages.
//!
//! The portal renders the signed-in user's id into page-global script state:
//!
//! ```text
//! Compass.organisationUserId = 4821;
//! ```
//!
//! [`USER_ID_PATTERN`] is the only extraction rule. Everything here works on
//! plain HTML text so any login surface can feed it.

use std::sync::LazyLock;

use compass_core::{CompassError, Result};
use regex::Regex;

use crate::cookies::CookieJar;

/// Script assignment holding the user id. Group 1 is the raw right-hand side.
/// The first right-hand character may not be `=`, so `==`/`===` comparisons
/// are skipped.
pub const USER_ID_PATTERN: &str = r"Compass\.organisationUserId\s*=\s*([^=;\r\n<][^;\r\n<]*)";

/// Cookie the portal may set with the user id, checked before the page.
pub const USER_ID_COOKIE: &str = "organisationUserId";

static USER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(USER_ID_PATTERN).expect("valid user id regex"));
static SCHOOL_CONFIG_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"Compass\.schoolConfigKey\s*=\s*["']([^"']*)["']"#)
        .expect("valid config key regex")
});
static ERROR_BANNER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bclass\s*=\s*["'](?:[^"']*\s)?error(?:\s[^"']*)?["'][^>]*>(.*?)</"#,
    )
    .expect("valid error banner regex")
});
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<input\b[^>]*>").expect("valid input regex"));
static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Parse the user id out of page script state. The first assignment whose
/// value is an integer wins.
///
/// # Errors
///
/// Returns [`CompassError::Session`] if there is no assignment, or none of
/// them assigns an integer.
pub fn user_id_from_page(html: &str) -> Result<i64> {
    let mut first_err = None;
    for caps in USER_ID_RE.captures_iter(html) {
        match parse_user_id(&caps[1]) {
            Ok(id) => return Ok(id),
            Err(e) => {
                first_err.get_or_insert(e);
            }
        }
    }
    Err(first_err.unwrap_or_else(|| {
        CompassError::Session("could not find Compass.organisationUserId in the page".into())
    }))
}

fn parse_user_id(raw: &str) -> Result<i64> {
    let value = raw.trim().trim_matches(|c| c == '"' || c == '\'');
    value
        .parse::<i64>()
        .map_err(|_| CompassError::Session(format!("user id `{value}` is not an integer")))
}

/// Derive the user id: the [`USER_ID_COOKIE`] marker first, then the page.
///
/// # Errors
///
/// Returns [`CompassError::Session`] if neither source yields an integer.
pub fn derive_user_id(jar: &CookieJar, html: &str) -> Result<i64> {
    if let Some(cookie) = jar.get(USER_ID_COOKIE) {
        return parse_user_id(&cookie.value);
    }
    user_id_from_page(html)
}

/// The `Compass.schoolConfigKey` cache key, if the page sets one.
#[must_use]
pub fn school_config_key(html: &str) -> Option<String> {
    SCHOOL_CONFIG_KEY_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|key| !key.is_empty())
}

/// Text of the first element whose class list contains `error`.
///
/// Returns `Some` even for an empty banner: its presence alone means the
/// login was rejected.
#[must_use]
pub fn error_banner(html: &str) -> Option<String> {
    let inner = ERROR_BANNER_RE.captures(html)?.get(1)?.as_str();
    let text = TAG_RE.replace_all(inner, " ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    Some(decode_entities(text.trim()))
}

/// `(name, value)` of every `<input type="hidden">` in document order.
#[must_use]
pub fn hidden_inputs(html: &str) -> Vec<(String, String)> {
    INPUT_RE
        .find_iter(html)
        .filter_map(|tag| {
            let mut name = None;
            let mut value = String::new();
            let mut hidden = false;
            for caps in ATTR_RE.captures_iter(tag.as_str()) {
                let key = caps[1].to_ascii_lowercase();
                let val = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
                match key.as_str() {
                    "type" => hidden = val.eq_ignore_ascii_case("hidden"),
                    "name" => name = Some(decode_entities(val)),
                    "value" => value = decode_entities(val),
                    _ => {}
                }
            }
            if hidden { name.map(|n| (n, value)) } else { None }
        })
        .collect()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#x27;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::Cookie;
    use compass_core::ErrorKind;
    use pretty_assertions::assert_eq;

    const LANDING: &str = r#"<html><head><script>
        var Compass = Compass || {};
        Compass.organisationUserId = 4821;
        Compass.schoolConfigKey = "cfg-77";
    </script></head><body>Welcome</body></html>"#;

    #[test]
    fn user_id_from_script_global() {
        assert_eq!(user_id_from_page(LANDING).unwrap(), 4821);
    }

    #[test]
    fn quoted_user_id_is_accepted() {
        let html = "<script>Compass.organisationUserId = '77';</script>";
        assert_eq!(user_id_from_page(html).unwrap(), 77);
    }

    #[test]
    fn missing_user_id_is_session_error() {
        let err = user_id_from_page("<html>login</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Session);
    }

    #[test]
    fn non_integer_user_id_is_session_error() {
        let html = "<script>Compass.organisationUserId = undefined;</script>";
        let err = user_id_from_page(html).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Session);
        assert!(err.to_string().contains("undefined"));
    }

    #[test]
    fn comparisons_before_the_assignment_are_skipped() {
        let html = r"<script>
            if (Compass.organisationUserId === 0) { init(); }
            if (Compass.organisationUserId == null) { wait(); }
            Compass.organisationUserId = 4821;
        </script>";
        assert_eq!(user_id_from_page(html).unwrap(), 4821);
    }

    #[test]
    fn later_integer_assignment_wins_over_placeholder() {
        let html = "<script>Compass.organisationUserId = null;</script>\
                    <script>Compass.organisationUserId = 4821;</script>";
        assert_eq!(user_id_from_page(html).unwrap(), 4821);
    }

    #[test]
    fn cookie_marker_wins_over_page() {
        let jar: CookieJar = [Cookie::new(USER_ID_COOKIE, "99", "d")].into_iter().collect();
        assert_eq!(derive_user_id(&jar, LANDING).unwrap(), 99);
        assert_eq!(derive_user_id(&CookieJar::new(), LANDING).unwrap(), 4821);
    }

    #[test]
    fn config_key_extraction() {
        assert_eq!(school_config_key(LANDING).as_deref(), Some("cfg-77"));
        assert!(school_config_key("<html></html>").is_none());
    }

    #[test]
    fn error_banner_text_is_flattened() {
        let html = r#"<form><div class="signInWrapper"></div>
            <div class="box error">
                <span>Sorry - your username and/or password was incorrect.</span>
            </div></form>"#;
        assert_eq!(
            error_banner(html).as_deref(),
            Some("Sorry - your username and/or password was incorrect.")
        );
    }

    #[test]
    fn error_class_must_be_a_whole_word() {
        let html = r#"<div class="error-free">fine</div><p class="noerror">fine</p>"#;
        assert!(error_banner(html).is_none());
        assert!(error_banner(LANDING).is_none());
    }

    #[test]
    fn hidden_inputs_in_document_order() {
        let html = r#"<form>
            <input type="hidden" name="__VIEWSTATE" id="__VIEWSTATE" value="dDwtMT==" />
            <input type='hidden' name='__EVENTVALIDATION' value='a&amp;b'>
            <input type="text" name="username" value="">
            <input name="__EVENTTARGET" type="HIDDEN" value="" />
        </form>"#;
        assert_eq!(
            hidden_inputs(html),
            vec![
                ("__VIEWSTATE".to_string(), "dDwtMT==".to_string()),
                ("__EVENTVALIDATION".to_string(), "a&b".to_string()),
                ("__EVENTTARGET".to_string(), String::new()),
            ]
        );
    }
}
