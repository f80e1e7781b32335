//! Dataset fetching.
//!
//! Defines the `DatasetSource` trait, the fetch strategy the mldata loader
//! is built on, and the HTTP implementation used outside of tests. Tests
//! hand the loader a `mock::MockMldataSource` instead.

pub mod matfile;
pub mod mldata;
pub mod mock;

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::types::TestkitError;

pub use matfile::{MatrixFile, StoredMatrix};
pub use mldata::{mldata_filename, ColumnRef, FetchOptions, MldataBunch, MldataLoader};
pub use mock::{fake_mldata, MockDataset, MockMldataSource};

/// Abstraction over where dataset payloads come from.
///
/// A failed request with an HTTP-like status is reported as
/// `TestkitError::HttpStatus` so callers can tell a missing dataset (404)
/// from other failures.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Fetch the raw payload stored at `url`.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TestkitError>;
}

/// Fetches payloads over HTTP.
pub struct HttpSource {
    http: Client,
}

impl HttpSource {
    pub fn new(timeout_secs: u64) -> Result<Self, TestkitError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent("estimator-testkit/0.1.0")
            .build()?;
        Ok(Self { http })
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, TestkitError> {
        debug!(url, "Fetching dataset payload");
        let resp = self.http.get(url).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TestkitError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
                message: body,
            });
        }

        let bytes = resp.bytes().await?;
        debug!(url, len = bytes.len(), "Dataset payload received");
        Ok(bytes.to_vec())
    }
}
