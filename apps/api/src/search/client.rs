use async_trait::async_trait;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    Client, StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::models::job::JobPosting;
use crate::search::query::JobSearchFilter;

const SEARCH_PATH: &str = "/jobs/search";
const REQUEST_TIMEOUT_SECS: u64 = 60;
const CONNECTIVITY_TEST_MAX_AGE_DAYS: u32 = 30;
const BODY_PREVIEW_CHARS: usize = 1200;

/// Anything that can answer a job search. Carried in `AppState` as `Arc<dyn JobSource>`.
#[async_trait]
pub trait JobSource: Send + Sync {
    async fn search(
        &self,
        api_key: &str,
        filter: &JobSearchFilter,
    ) -> Result<Vec<JobPosting>, AppError>;

    /// Sends the smallest valid query to check the key and the endpoint.
    async fn test_connection(&self, api_key: &str) -> ConnectionReport {
        let result = self
            .search(api_key, &JobSearchFilter::minimal(CONNECTIVITY_TEST_MAX_AGE_DAYS))
            .await;
        ConnectionReport::from_result(result.map(|_| ()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectionReport {
    pub success: bool,
    pub message: String,
}

impl ConnectionReport {
    fn from_result(result: Result<(), AppError>) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                message: "API connection successful".to_string(),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
            },
        }
    }
}

/// The search endpoint has answered both as a bare array and wrapped in `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SearchResponse {
    List(Vec<JobPosting>),
    Wrapped {
        #[serde(default)]
        data: Vec<JobPosting>,
    },
}

/// TheirStack job-search client. One request per search, no retries.
#[derive(Clone)]
pub struct TheirStackClient {
    client: Client,
    base_url: String,
}

impl TheirStackClient {
    pub fn new(base_url: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(concat!("jobmatch/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, base_url })
    }

    fn headers(api_key: &str) -> Result<HeaderMap, AppError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| AppError::Validation("API key contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

impl TheirStackClient {
    /// Posts `filter` to the search endpoint and returns the status with the raw body.
    async fn post_search(
        &self,
        api_key: &str,
        filter: &JobSearchFilter,
    ) -> Result<(StatusCode, String), AppError> {
        let url = format!("{}{SEARCH_PATH}", self.base_url);
        debug!(
            "Sending search query: {}",
            serde_json::to_string(filter).unwrap_or_default()
        );

        let response = self
            .client
            .post(&url)
            .headers(Self::headers(api_key)?)
            .json(filter)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;
        Ok((status, body))
    }
}

fn require_success(status: StatusCode, body: String) -> Result<String, AppError> {
    if status.is_success() {
        return Ok(body);
    }
    warn!("Search API responded {}: {}", status, preview(&body));
    Err(AppError::SearchApi {
        status: status.as_u16(),
        body,
    })
}

#[async_trait]
impl JobSource for TheirStackClient {
    async fn search(
        &self,
        api_key: &str,
        filter: &JobSearchFilter,
    ) -> Result<Vec<JobPosting>, AppError> {
        let (status, body) = self.post_search(api_key, filter).await?;
        let body = require_success(status, body)?;

        let jobs = parse_search_body(&body).map_err(|e| AppError::SearchApi {
            status: status.as_u16(),
            body: format!("unexpected response body ({e}): {}", preview(&body)),
        })?;

        info!("Search returned {} jobs", jobs.len());
        Ok(jobs)
    }

    /// Success is decided on the status alone; the body is not parsed.
    async fn test_connection(&self, api_key: &str) -> ConnectionReport {
        let filter = JobSearchFilter::minimal(CONNECTIVITY_TEST_MAX_AGE_DAYS);
        let result = self
            .post_search(api_key, &filter)
            .await
            .and_then(|(status, body)| require_success(status, body).map(|_| ()));
        ConnectionReport::from_result(result)
    }
}

fn parse_search_body(body: &str) -> Result<Vec<JobPosting>, serde_json::Error> {
    let response: SearchResponse = serde_json::from_str(body.trim_start_matches('\u{FEFF}'))?;
    Ok(match response {
        SearchResponse::List(jobs) => jobs,
        SearchResponse::Wrapped { data } => data,
    })
}

fn preview(body: &str) -> String {
    if body.chars().count() > BODY_PREVIEW_CHARS {
        let mut truncated: String = body.chars().take(BODY_PREVIEW_CHARS).collect();
        truncated.push('…');
        truncated
    } else {
        body.to_string()
    }
}
