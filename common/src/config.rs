//! Backend location.
//!
//! Both front ends take a single base URL for the backend, falling back to a
//! local development server when none is configured.

use thiserror::Error;

use crate::Url;

/// Where the backend listens during local development.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Environment variable holding the backend base URL.
pub const API_URL_ENV: &str = "PASTEBIN_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid backend url {0:?}: {1}")]
    BadUrl(String, url::ParseError),
    #[error("Backend url must be http or https, got {0:?}")]
    UnsupportedScheme(String),
}

/// Parses a configured base URL, using [`DEFAULT_API_URL`] when the value is
/// missing or blank.
///
/// # Errors
///
/// Fails if the value is not an absolute http(s) URL.
pub fn api_url(value: Option<&str>) -> Result<Url, ConfigError> {
    let value = value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_URL);

    let url = Url::parse(value).map_err(|e| ConfigError::BadUrl(value.to_owned(), e))?;
    validate_base(url)
}

/// Checks that paths can be appended to `url` and drops any query or
/// fragment, which would otherwise end up on every request.
///
/// # Errors
///
/// Fails for anything other than an http(s) URL.
pub fn validate_base(mut url: Url) -> Result<Url, ConfigError> {
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedScheme(url.scheme().to_owned()));
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}
