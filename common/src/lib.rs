#![warn(clippy::nursery, clippy::pedantic)]

//! Contains the types and client logic shared by the Pastebin Lite front ends.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::Visitor;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
pub use url::Url;

pub mod client;
pub mod config;
pub mod route;
pub mod ui;

pub use client::{ApiError, Client, Operation};

pub const API_ENDPOINT: &str = "api";
pub const PASTES_ENDPOINT: &str = "pastes";

/// Body of a create request. Limits that are not set are left out of the
/// JSON entirely rather than sent as `null`.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct NewPaste {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_views: Option<i64>,
}

impl NewPaste {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn ttl_seconds(mut self, ttl: Option<i64>) -> Self {
        self.ttl_seconds = ttl;
        self
    }

    #[must_use]
    pub const fn max_views(mut self, max_views: Option<i64>) -> Self {
        self.max_views = max_views;
        self
    }
}

/// What the server answers to a successful create.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CreatedPaste {
    pub id: String,
    /// Link to the server-rendered view of the paste, if the server sent one.
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    #[serde(default)]
    pub max_views: Option<i64>,
}

/// A paste as returned by a successful fetch. Every fetch consumes a view on
/// the server, so `remaining_views` already accounts for this one.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct FetchedPaste {
    pub content: String,
    #[serde(default)]
    pub remaining_views: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
}

/// Failure payload of the backend. `detail` is usually a string, but request
/// validation failures carry a list of objects instead.
#[derive(Deserialize, Debug, Default)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: serde_json::Value,
}

impl ErrorBody {
    /// The server's message, if it sent a usable one.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.detail.as_str().filter(|detail| !detail.is_empty())
    }
}

/// A point in time reported by the server.
///
/// The backend stores naive UTC timestamps, so a value without an offset is
/// read as UTC instead of local time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(pub DateTime<Utc>);

#[derive(Debug, Error)]
#[error("Invalid timestamp: {0:?}")]
pub struct ParseTimestampError(String);

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(time) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(time.with_timezone(&Utc)));
        }

        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| ParseTimestampError(s.to_owned()))
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;
        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("an ISO 8601 timestamp")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_str(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;

    use super::*;

    #[test]
    fn new_paste_omits_unset_limits() {
        let body = serde_json::to_value(NewPaste::new("hello")).unwrap();
        assert_eq!(body, json!({ "content": "hello" }));

        let body =
            serde_json::to_value(NewPaste::new("hello").ttl_seconds(Some(60)).max_views(Some(5)))
                .unwrap();
        assert_eq!(
            body,
            json!({ "content": "hello", "ttl_seconds": 60, "max_views": 5 })
        );
    }

    #[test]
    fn timestamp_with_offset() {
        let ts: Timestamp = "2024-03-01T12:30:00+02:00".parse().unwrap();
        assert_eq!(ts.0, Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn naive_timestamp_is_utc() {
        let ts: Timestamp = "2024-03-01T12:30:00.250000".parse().unwrap();
        assert_eq!(
            ts.0,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap() + Duration::milliseconds(250)
        );
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!("tomorrow".parse::<Timestamp>().is_err());
    }

    #[test]
    fn fetched_paste_with_nulls() {
        let paste: FetchedPaste = serde_json::from_value(json!({
            "content": "hi",
            "remaining_views": null,
            "expires_at": null,
        }))
        .unwrap();
        assert_eq!(paste.remaining_views, None);
        assert_eq!(paste.expires_at, None);

        let paste: FetchedPaste = serde_json::from_value(json!({ "content": "hi" })).unwrap();
        assert_eq!(paste.remaining_views, None);
    }

    #[test]
    fn created_paste_ignores_unknown_fields() {
        let paste: CreatedPaste = serde_json::from_value(json!({
            "id": "abc123",
            "url": "http://127.0.0.1:8000/p/abc123",
            "something_else": true,
        }))
        .unwrap();
        assert_eq!(paste.id, "abc123");
        assert_eq!(paste.url.as_deref(), Some("http://127.0.0.1:8000/p/abc123"));
    }

    #[test]
    fn error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({ "detail": "Paste not found" })).unwrap();
        assert_eq!(body.message(), Some("Paste not found"));

        let body: ErrorBody =
            serde_json::from_value(json!({ "detail": [{ "msg": "field required" }] })).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_value(json!({ "detail": "" })).unwrap();
        assert_eq!(body.message(), None);

        let body: ErrorBody = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.message(), None);
    }
}
