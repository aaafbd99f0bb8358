//! Client-side routes and shareable links.
//!
//! The page answers on `/` and `/p/{id}`. Ids are percent-encoded the same
//! way `Url` encodes a path segment, and decoded again when a path is read.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};

use crate::Url;

const PASTE_PREFIX: &str = "p";

/// Matches the set `Url::path_segments_mut` escapes for http(s) urls.
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'?')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%')
    .add(b'\\');

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Home,
    Paste(String),
}

impl Route {
    /// Maps a URL path to a route. Unknown paths land on [`Route::Home`].
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let mut segments = path
            .trim_start_matches('/')
            .trim_end_matches('/')
            .split('/');

        match (segments.next(), segments.next(), segments.next()) {
            (Some(PASTE_PREFIX), Some(id), None) if !id.is_empty() => percent_decode_str(id)
                .decode_utf8()
                .map_or(Self::Home, |id| Self::Paste(id.into_owned())),
            _ => Self::Home,
        }
    }

    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Paste(id) => paste_path(id),
        }
    }
}

/// Path of the page showing paste `id`.
#[must_use]
pub fn paste_path(id: &str) -> String {
    format!("/{PASTE_PREFIX}/{}", utf8_percent_encode(id, SEGMENT))
}

/// Builds `{origin}/p/{id}`. Any path, query or fragment on `origin` is
/// discarded.
#[must_use]
pub fn share_link(origin: &Url, id: &str) -> Url {
    let mut link = origin.clone();
    link.set_query(None);
    link.set_fragment(None);
    if let Ok(mut segments) = link.path_segments_mut() {
        segments.clear().extend([PASTE_PREFIX, id]);
    }
    link
}

/// Extracts a paste id from user input, which may be a bare id, a `/p/{id}`
/// path, or a full share link.
#[must_use]
pub fn paste_id(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let path = match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url.path().to_owned(),
        _ if input.starts_with('/') => input.to_owned(),
        _ => return Some(input.to_owned()),
    };

    match Route::from_path(&path) {
        Route::Paste(id) => Some(id),
        Route::Home => None,
    }
}

/// Decides when a route should trigger an automatic fetch: once for each
/// change of the id in the URL, and never for a URL the page rewrote itself
/// after a manual fetch.
#[derive(Debug, Default)]
pub struct RouteTracker {
    current: Option<String>,
}

impl RouteTracker {
    #[must_use]
    pub const fn new() -> Self {
        Self { current: None }
    }

    /// Returns the id to fetch, if any.
    pub fn observe(&mut self, route: &Route) -> Option<String> {
        match route {
            Route::Home => {
                self.reset();
                None
            }
            Route::Paste(id) if self.current.as_deref() == Some(id.as_str()) => None,
            Route::Paste(id) => {
                self.current = Some(id.clone());
                Some(id.clone())
            }
        }
    }

    /// Forgets the current id, as when the page goes back to `/`.
    pub fn reset(&mut self) {
        self.current = None;
    }

    /// Records that the visible URL now shows `id`.
    pub fn rewrote(&mut self, id: &str) {
        self.current = Some(id.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_routes() {
        assert_eq!(Route::from_path("/"), Route::Home);
        assert_eq!(Route::from_path(""), Route::Home);
        assert_eq!(Route::from_path("/p/abc123"), Route::Paste("abc123".into()));
        assert_eq!(Route::from_path("/p/abc123/"), Route::Paste("abc123".into()));
        assert_eq!(Route::from_path("/p/"), Route::Home);
        assert_eq!(Route::from_path("/p/a/b"), Route::Home);
        assert_eq!(Route::from_path("/q/abc"), Route::Home);
    }

    #[test]
    fn route_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Paste("MB_56b5srI".into()).path(), "/p/MB_56b5srI");
    }

    #[test]
    fn share_link_ends_with_id() {
        let origin = Url::parse("http://localhost:5173").unwrap();
        assert_eq!(
            share_link(&origin, "X").as_str(),
            "http://localhost:5173/p/X"
        );

        let origin = Url::parse("https://paste.example.com/p/old?q=1#frag").unwrap();
        assert_eq!(
            share_link(&origin, "new").as_str(),
            "https://paste.example.com/p/new"
        );
    }

    #[test]
    fn share_links_round_trip_through_routes() {
        let origin = Url::parse("https://paste.example.com").unwrap();
        let link = share_link(&origin, "Zx-9_q");
        assert_eq!(Route::from_path(link.path()), Route::Paste("Zx-9_q".into()));
    }

    #[test]
    fn odd_ids_survive_a_trip_through_the_address_bar() {
        let origin = Url::parse("https://paste.example.com").unwrap();
        for id in ["a b", "what?", "50%", "x#y", "naïve"] {
            let path = paste_path(id);
            assert_eq!(share_link(&origin, id).path(), path);
            assert_eq!(Route::from_path(&path), Route::Paste(id.into()));
        }
        assert_eq!(paste_path("a b?"), "/p/a%20b%3F");
        assert_eq!(paste_id("https://paste.example.com/p/a%20b"), Some("a b".into()));
    }

    #[test]
    fn undecodable_segment_is_home() {
        assert_eq!(Route::from_path("/p/%FF"), Route::Home);
    }

    #[test]
    fn paste_ids_from_input() {
        assert_eq!(paste_id("abc123"), Some("abc123".into()));
        assert_eq!(paste_id("  abc123 \n"), Some("abc123".into()));
        assert_eq!(paste_id("/p/abc123"), Some("abc123".into()));
        assert_eq!(
            paste_id("https://paste.example.com/p/abc123"),
            Some("abc123".into())
        );
        assert_eq!(paste_id("https://paste.example.com/"), None);
        assert_eq!(paste_id("   "), None);
    }

    #[test]
    fn fetches_once_per_id_change() {
        let mut tracker = RouteTracker::new();
        let abc = Route::Paste("abc123".into());

        assert_eq!(tracker.observe(&abc), Some("abc123".into()));
        assert_eq!(tracker.observe(&abc), None);

        let other = Route::Paste("other".into());
        assert_eq!(tracker.observe(&other), Some("other".into()));

        assert_eq!(tracker.observe(&Route::Home), None);
        assert_eq!(tracker.observe(&abc), Some("abc123".into()));
    }

    #[test]
    fn reset_allows_the_same_id_again() {
        let mut tracker = RouteTracker::new();
        let abc = Route::Paste("abc123".into());
        assert_eq!(tracker.observe(&abc), Some("abc123".into()));

        tracker.reset();
        assert_eq!(tracker.observe(&abc), Some("abc123".into()));
    }

    #[test]
    fn rewritten_url_does_not_refetch() {
        let mut tracker = RouteTracker::new();
        assert_eq!(tracker.observe(&Route::Home), None);

        tracker.rewrote("typed");
        assert_eq!(tracker.observe(&Route::Paste("typed".into())), None);
    }
}
