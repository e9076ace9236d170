//! Base URL normalization.

use compass_core::{CompassError, Result};
use reqwest::Url;

/// Normalize a school host or URL into its canonical origin.
///
/// `school.compass.education`, `https://school.compass.education/` and
/// `https://school.compass.education/login.aspx` all become
/// `https://school.compass.education`. A missing scheme defaults to `https`;
/// only `http` and `https` are accepted.
///
/// # Errors
///
/// Returns [`CompassError::Configuration`] for empty input, an unparseable
/// URL, an unsupported scheme, or a URL without a host.
pub fn normalize_base_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CompassError::Configuration(
            "base URL must not be empty".into(),
        ));
    }

    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed.trim_start_matches('/'))
    };

    let url = Url::parse(&candidate).map_err(|e| {
        CompassError::Configuration(format!("invalid base URL `{trimmed}`: {e}"))
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(CompassError::Configuration(format!(
            "unsupported scheme `{}` in base URL `{trimmed}`",
            url.scheme()
        )));
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(CompassError::Configuration(format!(
            "base URL `{trimmed}` has no host"
        )));
    }

    let origin = url.origin().ascii_serialization();
    Url::parse(&origin)
        .map_err(|e| CompassError::Configuration(format!("invalid base URL `{trimmed}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use compass_core::ErrorKind;

    #[test]
    fn bare_host_defaults_to_https() {
        let url = normalize_base_url("school.compass.education").unwrap();
        assert_eq!(url.as_str(), "https://school.compass.education/");
    }

    #[test]
    fn explicit_http_is_kept() {
        let url = normalize_base_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/");
    }

    #[test]
    fn path_and_query_are_dropped() {
        let url =
            normalize_base_url("https://school.compass.education/login.aspx?x=1").unwrap();
        assert_eq!(url.as_str(), "https://school.compass.education/");
    }

    #[test]
    fn whitespace_is_trimmed() {
        let url = normalize_base_url("  school.example  ").unwrap();
        assert_eq!(url.host_str(), Some("school.example"));
    }

    #[test]
    fn empty_is_configuration_error() {
        for raw in ["", "   "] {
            let err = normalize_base_url(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let err = normalize_base_url("ftp://school.example").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn join_resolves_relative_paths() {
        let base = normalize_base_url("https://school.example").unwrap();
        assert_eq!(
            base.join("/photo.jpg").unwrap().as_str(),
            "https://school.example/photo.jpg"
        );
        assert_eq!(
            base.join("Services/Calendar.svc/GetCalendarEventsByUser")
                .unwrap()
                .as_str(),
            "https://school.example/Services/Calendar.svc/GetCalendarEventsByUser"
        );
    }
}
