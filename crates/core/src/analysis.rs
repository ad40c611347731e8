//! Analysis backend client.
//!
//! The analysis service runs the semantic-conflict detection out of band
//! and exposes one record per `(owner, repository, pull_number)` key. The
//! fetch is a single one-shot request with no retry or cancellation; a
//! failed or empty result degrades to the absence view state instead of
//! erroring the whole view.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use tracing::{debug, info, instrument};

use crate::errors::AnalysisError;
use crate::models::AnalysisRecord;

/// Capability interface over the analysis backend.
///
/// Constructor-injected wherever a fetch is needed so tests can
/// substitute a canned backend.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Fetch the analysis record for one pull request.
    async fn get_analysis_output(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
    ) -> Result<AnalysisRecord, AnalysisError>;
}

/// HTTP client for the analysis backend.
#[derive(Clone)]
pub struct AnalysisClient {
    http: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl AnalysisClient {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("mergelens/0.1"));
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("failed to build reqwest client");
        info!(api_url = %api_url, "created AnalysisClient");
        Self {
            http,
            api_url,
            token,
        }
    }

    fn check_status(
        status: reqwest::StatusCode,
        body: String,
        owner: &str,
        repo: &str,
        pull_number: u64,
    ) -> Result<String, AnalysisError> {
        if status.is_success() {
            Ok(body)
        } else if status == reqwest::StatusCode::NOT_FOUND {
            Err(AnalysisError::NotFound {
                owner: owner.to_string(),
                repo: repo.to_string(),
                pull_number,
            })
        } else {
            Err(AnalysisError::ApiError {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    #[instrument(skip(self))]
    async fn get_analysis_output(
        &self,
        owner: &str,
        repo: &str,
        pull_number: u64,
    ) -> Result<AnalysisRecord, AnalysisError> {
        let url = format!("{}/codeReview", self.api_url);
        let mut req = self.http.get(&url).query(&[
            ("owner", owner),
            ("repo", repo),
            ("pull_number", &pull_number.to_string()),
        ]);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        let body = Self::check_status(status, body, owner, repo, pull_number)?;

        let record: AnalysisRecord =
            serde_json::from_str(&body).map_err(|e| AnalysisError::ParseError(e.to_string()))?;
        debug!(
            conflicts = record.conflicts.len(),
            modified_files = record.modified_lines.len(),
            "fetched analysis record"
        );
        Ok(record)
    }
}
