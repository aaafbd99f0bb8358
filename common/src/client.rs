//! Thin wrapper around the two backend endpoints.
//!
//! Every failure is folded into an [`ApiError`] whose `Display` is the
//! message a user should see: the server's own `detail` when it sent one,
//! otherwise a fixed per-operation fallback.

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::{self, ConfigError};
use crate::{CreatedPaste, ErrorBody, FetchedPaste, NewPaste, Url, API_ENDPOINT, PASTES_ENDPOINT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    Create,
    Fetch,
}

impl Operation {
    #[must_use]
    pub const fn fallback_message(self) -> &'static str {
        match self {
            Self::Create => "Failed to create paste",
            Self::Fetch => "Failed to fetch paste",
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request and explained why.
    #[error("{detail}")]
    Rejected { status: StatusCode, detail: String },
    /// The server rejected the request without a usable explanation.
    #[error("{}", .operation.fallback_message())]
    Status {
        operation: Operation,
        status: StatusCode,
    },
    /// No response, or a response we could not read.
    #[error("{}", .operation.fallback_message())]
    Transport {
        operation: Operation,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Rejected { status, .. } | Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base: Url,
}

impl Client {
    /// # Errors
    ///
    /// Fails if the base URL cannot have paths appended to it.
    pub fn new(base: Url) -> Result<Self, ConfigError> {
        Ok(Self {
            http: reqwest::Client::new(),
            base: config::validate_base(base)?,
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Submits a new paste.
    ///
    /// # Errors
    ///
    /// Returns the normalized failure of the request.
    #[instrument(skip_all, err, fields(len = paste.content.len()))]
    pub async fn create_paste(&self, paste: &NewPaste) -> Result<CreatedPaste, ApiError> {
        let url = self.endpoint(&[]);
        debug!(%url, ttl = ?paste.ttl_seconds, max_views = ?paste.max_views, "creating paste");
        let response = self.http.post(url).json(paste).send().await;
        read_json(Operation::Create, response).await
    }

    /// Fetches a paste by its identifier. Note that the server counts this as
    /// a view.
    ///
    /// # Errors
    ///
    /// Returns the normalized failure of the request.
    #[instrument(skip(self), err)]
    pub async fn get_paste(&self, id: &str) -> Result<FetchedPaste, ApiError> {
        let url = self.endpoint(&[id]);
        debug!(%url, "fetching paste");
        let response = self.http.get(url).send().await;
        read_json(Operation::Fetch, response).await
    }

    fn endpoint(&self, extra: &[&str]) -> Url {
        let mut url = self.base.clone();
        // validate_base guarantees the url can be a base.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([API_ENDPOINT, PASTES_ENDPOINT])
                .extend(extra);
        }
        url
    }
}

async fn read_json<T: DeserializeOwned>(
    operation: Operation,
    response: reqwest::Result<Response>,
) -> Result<T, ApiError> {
    let response = response.map_err(|source| ApiError::Transport { operation, source })?;
    let status = response.status();

    if !status.is_success() {
        return Err(rejection(operation, status, response).await);
    }

    response
        .json()
        .await
        .map_err(|source| ApiError::Transport { operation, source })
}

async fn rejection(operation: Operation, status: StatusCode, response: Response) -> ApiError {
    let detail = response
        .bytes()
        .await
        .ok()
        .and_then(|body| serde_json::from_slice::<ErrorBody>(&body).ok())
        .and_then(|body| body.message().map(ToOwned::to_owned));

    match detail {
        Some(detail) => ApiError::Rejected { status, detail },
        None => ApiError::Status { operation, status },
    }
}
