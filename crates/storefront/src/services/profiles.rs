//! Remote profile document store client.
//!
//! Documents live in the `profiles` collection, keyed by provider user id.
//! The store is schemaless on the wire; [`crate::models::ProfileDocument`]
//! captures the fields this client reads and writes.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::models::ProfileDocument;

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors that can occur when talking to the document store.
#[derive(Debug, Error)]
pub enum ProfileStoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store returned an error response.
    #[error("profile store API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Base URL did not parse.
    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}

/// Client for the remote profile document store.
pub struct ProfileStore {
    client: Client,
    base_url: String,
}

impl ProfileStore {
    /// Create a client for the store at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileStoreError::BaseUrl`] if the URL does not parse, or
    /// [`ProfileStoreError::Http`] if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ProfileStoreError> {
        Url::parse(base_url)
            .map_err(|e| ProfileStoreError::BaseUrl(format!("{base_url}: {e}")))?;

        let client = Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the profile document for `uid`.
    ///
    /// Returns `Ok(None)` when no document exists yet.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileStoreError::Api`] carrying the response body text
    /// for any non-2xx status other than 404.
    pub async fn get(&self, uid: &str) -> Result<Option<ProfileDocument>, ProfileStoreError> {
        let response = self.client.get(self.document_url(uid)).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProfileStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(Some(response.json().await?))
    }

    /// Write the profile document for `uid`.
    ///
    /// With `merge` the fields in `doc` are merged into any existing
    /// document (PATCH); without it the document is replaced (PUT).
    ///
    /// # Errors
    ///
    /// Returns [`ProfileStoreError::Api`] carrying the response body text
    /// for any non-2xx status.
    pub async fn set(
        &self,
        uid: &str,
        doc: &ProfileDocument,
        merge: bool,
    ) -> Result<(), ProfileStoreError> {
        let url = self.document_url(uid);
        let request = if merge {
            self.client.patch(&url)
        } else {
            self.client.put(&url)
        };

        let response = request.json(doc).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProfileStoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    fn document_url(&self, uid: &str) -> String {
        format!("{}/profiles/{uid}", self.base_url)
    }
}
