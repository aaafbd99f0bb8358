//! State behind the create and retrieve panels.
//!
//! Each panel is a small state machine. `begin` validates the input, marks
//! the panel busy and hands back the request to send; the front end performs
//! the request and passes the outcome to `finish`. A `begin` that returns
//! `None` means no request must be made.

use chrono::{DateTime, Local, TimeZone};
use thiserror::Error;

use crate::route::{paste_path, share_link};
use crate::{ApiError, CreatedPaste, FetchedPaste, NewPaste, Timestamp, Url};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("{field} must be a whole number")]
pub struct LimitError {
    field: &'static str,
}

/// Reads a limit typed into a form field. Blank and zero both mean "no
/// limit".
///
/// # Errors
///
/// Fails when the field holds something other than an integer.
pub fn parse_limit(field: &'static str, raw: &str) -> Result<Option<i64>, LimitError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    match raw.parse::<i64>() {
        Ok(0) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(LimitError { field }),
    }
}

pub const TTL_LABEL: &str = "Expires in (seconds)";
pub const MAX_VIEWS_LABEL: &str = "Max Views";

/// A paste the user just created, with the link to hand out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreatedLink {
    pub paste: CreatedPaste,
    pub link: Url,
}

/// The create panel.
#[derive(Debug, Default)]
pub struct Composer {
    pub content: String,
    pub ttl: String,
    pub max_views: String,
    created: Option<CreatedLink>,
    error: Option<String>,
    busy: bool,
}

impl Composer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a create. Blank content, or a create already in flight, is
    /// ignored without touching any state.
    pub fn begin(&mut self) -> Option<NewPaste> {
        if self.busy || self.content.trim().is_empty() {
            return None;
        }

        self.error = None;
        self.created = None;

        let limits = parse_limit(TTL_LABEL, &self.ttl)
            .and_then(|ttl| Ok((ttl, parse_limit(MAX_VIEWS_LABEL, &self.max_views)?)));
        let (ttl, max_views) = match limits {
            Ok(limits) => limits,
            Err(e) => {
                self.error = Some(e.to_string());
                return None;
            }
        };

        self.busy = true;
        Some(
            NewPaste::new(self.content.clone())
                .ttl_seconds(ttl)
                .max_views(max_views),
        )
    }

    /// Applies the outcome of a create. On success the content is cleared
    /// and a link under `origin` is kept for display.
    pub fn finish(&mut self, result: Result<CreatedPaste, ApiError>, origin: &Url) {
        self.busy = false;
        match result {
            Ok(paste) => {
                let link = share_link(origin, &paste.id);
                self.created = Some(CreatedLink { paste, link });
                self.content.clear();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    #[must_use]
    pub const fn created(&self) -> Option<&CreatedLink> {
        self.created.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.busy && !self.content.is_empty()
    }

    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        if self.busy {
            "Creating Paste..."
        } else {
            "Generate Shareable Link"
        }
    }
}

/// The retrieve panel.
#[derive(Debug, Default)]
pub struct Viewer {
    pub search_id: String,
    retrieved: Option<FetchedPaste>,
    error: Option<String>,
    /// Id of the fetch whose outcome will be shown.
    pending: Option<String>,
}

impl Viewer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch of `id_override`, or of the search field when `None`.
    /// An id coming from the URL is copied into the search field first and
    /// replaces any fetch still in flight; the search field is ignored while
    /// busy.
    pub fn begin(&mut self, id_override: Option<&str>) -> Option<String> {
        if let Some(id) = id_override {
            self.search_id = id.to_owned();
        } else if self.is_busy() {
            return None;
        }

        let id = self.search_id.trim();
        if id.is_empty() {
            return None;
        }
        let id = id.to_owned();

        self.pending = Some(id.clone());
        self.error = None;
        self.retrieved = None;
        Some(id)
    }

    /// Applies the outcome of fetching `id`. On success, returns the path the
    /// address bar should be switched to. Outcomes of superseded fetches are
    /// dropped.
    pub fn finish(&mut self, id: &str, result: Result<FetchedPaste, ApiError>) -> Option<String> {
        if self.pending.as_deref() != Some(id) {
            return None;
        }

        self.pending = None;
        match result {
            Ok(paste) => {
                self.retrieved = Some(paste);
                Some(paste_path(id))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                None
            }
        }
    }

    #[must_use]
    pub const fn retrieved(&self) -> Option<&FetchedPaste> {
        self.retrieved.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub const fn button_label(&self) -> &'static str {
        if self.is_busy() {
            "..."
        } else {
            "Fetch"
        }
    }
}

/// Both panels of the page.
#[derive(Debug, Default)]
pub struct Panels {
    pub composer: Composer,
    pub viewer: Viewer,
}

#[must_use]
pub fn views_label(remaining_views: Option<i64>) -> String {
    remaining_views.map_or_else(
        || "Views: Unlimited".to_owned(),
        |views| format!("Views Left: {views}"),
    )
}

#[must_use]
pub fn expiry_label(expires_at: Option<Timestamp>) -> String {
    expiry_label_in(expires_at, &Local)
}

/// [`expiry_label`] for an explicit time zone.
#[must_use]
pub fn expiry_label_in<Tz: TimeZone>(expires_at: Option<Timestamp>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    expires_at.map_or_else(
        || "No Expiry".to_owned(),
        |Timestamp(time)| format!("Expires: {}", local_time(&time.with_timezone(tz))),
    )
}

fn local_time<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M:%S %p").to_string()
}

impl FetchedPaste {
    #[must_use]
    pub fn views_label(&self) -> String {
        views_label(self.remaining_views)
    }

    #[must_use]
    pub fn expiry_label(&self) -> String {
        expiry_label(self.expires_at)
    }
}
