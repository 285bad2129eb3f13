//! HTTP client for the salary API.
//!
//! Three endpoints are consumed:
//! - `GET {base}` for the full dataset
//! - `GET {base}/{year}` for one year's records
//! - `POST {base}/chat` for the assistant

use crate::models::SalaryRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors returned by [`SalaryClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request to {url} timed out after {seconds}s")]
    Timeout { url: String, seconds: u64 },

    #[error("Cannot connect to salary API at {url}. Is the server running?")]
    Connect { url: String },

    #[error("Failed to send request to {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Salary API error {status} from {url}: {body}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to create HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

/// Request body of the chat endpoint.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// Response body of the chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub response: String,
}

/// Connection settings for the salary API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/salaries".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Client for the salary API.
#[derive(Debug, Clone)]
pub struct SalaryClient {
    http_client: reqwest::Client,
    base_url: String,
    timeout_seconds: u64,
}

impl SalaryClient {
    /// Create a client; a trailing `/` on the base URL is ignored.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("salarydash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ClientError::Build)?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_seconds: config.timeout_seconds,
        })
    }

    /// The base URL requests are made against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the full dataset.
    pub async fn fetch_all(&self) -> Result<Vec<SalaryRecord>, ClientError> {
        let url = self.base_url.clone();
        self.get_records(url).await
    }

    /// Fetch the records of a single work year.
    pub async fn fetch_year(&self, year: i32) -> Result<Vec<SalaryRecord>, ClientError> {
        let url = format!("{}/{}", self.base_url, year);
        self.get_records(url).await
    }

    /// Send one message to the assistant endpoint.
    pub async fn ask(&self, message: &str) -> Result<ChatReply, ClientError> {
        let url = format!("{}/chat", self.base_url);
        debug!("POST {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&ChatRequest { message })
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let response = Self::check_status(&url, response).await?;

        response
            .json::<ChatReply>()
            .await
            .map_err(|source| ClientError::Decode { url, source })
    }

    async fn get_records(&self, url: String) -> Result<Vec<SalaryRecord>, ClientError> {
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let response = Self::check_status(&url, response).await?;

        let records = response
            .json::<Vec<SalaryRecord>>()
            .await
            .map_err(|source| ClientError::Decode {
                url: url.clone(),
                source,
            })?;

        debug!("Received {} records from {}", records.len(), url);
        Ok(records)
    }

    async fn check_status(
        url: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ClientError> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            url: url.to_string(),
            status,
            body,
        })
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
                seconds: self.timeout_seconds,
            }
        } else if e.is_connect() {
            ClientError::Connect {
                url: url.to_string(),
            }
        } else {
            ClientError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fixture_body() -> serde_json::Value {
        serde_json::from_str(include_str!("../../fixtures/salaries.json")).unwrap()
    }

    fn client_for(server: &MockServer) -> SalaryClient {
        SalaryClient::new(ClientConfig {
            base_url: format!("{}/api/salaries/", server.uri()),
            timeout_seconds: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_all() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/salaries"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixture_body()))
            .expect(1)
            .mount(&server)
            .await;

        let records = tokio_test::assert_ok!(client_for(&server).fetch_all().await);
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].job_title, "ML Engineer");
    }

    #[tokio::test]
    async fn test_fetch_year_uses_year_path() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/salaries/2024"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let records = client_for(&server).fetch_year(2024).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_ask_posts_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/salaries/chat"))
            .and(body_json(json!({ "message": "Which year paid best?" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "2024" })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client_for(&server).ask("Which year paid best?").await.unwrap();
        assert_eq!(reply.response, "2024");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_all().await.unwrap_err();
        match err {
            ClientError::Status { status, body, .. } => {
                assert_eq!(status.as_u16(), 503);
                assert_eq!(body, "maintenance");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_all().await.unwrap_err();
        assert!(matches!(err, ClientError::Decode { .. }));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SalaryClient::new(ClientConfig {
            base_url: "http://example.test/api/salaries//".to_string(),
            timeout_seconds: 1,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://example.test/api/salaries");
    }
}
