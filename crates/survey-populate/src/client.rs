//! Formbricks API client.
//!
//! Users and surveys go through the key-authenticated management API at the
//! base URL; responses go through the public client API under `/client`.

use crate::args::PlatformConfig;
use crate::error::{PlatformError, SeedError};
use crate::payload::{MemberPayload, ResponsePayload, SurveyPayload};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use std::time::Duration;

/// Timeout of a single API call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout of the connectivity probe.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Operations the seeder needs from the platform.
#[async_trait]
pub trait SurveyPlatform: Send + Sync {
    /// Base URL, for log and error messages.
    fn base_url(&self) -> &str;

    /// Whether the platform answers at all.
    async fn probe(&self) -> bool;

    /// Create a member; returns the remote id when the platform reports one.
    async fn create_member(&self, member: &MemberPayload) -> Result<Option<String>, PlatformError>;

    /// Create a survey; returns the remote id when the platform reports one.
    async fn create_survey(&self, survey: &SurveyPayload) -> Result<Option<String>, PlatformError>;

    /// Submit one response to the survey with remote id `survey_id`.
    async fn submit_response(
        &self,
        survey_id: &str,
        response: &ResponsePayload,
    ) -> Result<(), PlatformError>;
}

/// [`SurveyPlatform`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpPlatform {
    management_base: String,
    client_base: String,
    api_key: String,
    environment_id: String,
    client: Client,
}

impl HttpPlatform {
    pub fn new(config: &PlatformConfig) -> Result<Self, SeedError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(!config.verify_tls)
            .build()
            .map_err(|e| SeedError::Client(e.to_string()))?;

        let base = config.url.trim_end_matches('/');
        Ok(Self {
            management_base: base.to_string(),
            client_base: format!("{base}/client"),
            api_key: config.api_key.clone(),
            environment_id: config.environment_id.clone(),
            client,
        })
    }

    fn management_post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        let url = format!("{}/{}", self.management_base, path);
        tracing::debug!("POST {}", url);
        self.client
            .post(url)
            .header("x-api-key", &self.api_key)
            .json(body)
    }

    fn client_post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> RequestBuilder {
        let url = format!("{}/{}", self.client_base, path);
        tracing::debug!("POST {}", url);
        self.client.post(url).json(body)
    }
}

/// Send a request and fail on non-success status, keeping the body for diagnostics.
async fn send(request: RequestBuilder) -> Result<String, PlatformError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_success() {
        Ok(body)
    } else {
        Err(PlatformError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Pull the created resource's id out of a creation reply.
///
/// Accepts both `{"id": ...}` and the `{"data": {"id": ...}}` envelope.
pub fn remote_id(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("id")
        .or_else(|| value.get("data").and_then(|d| d.get("id")))
        .and_then(|id| id.as_str())
        .map(str::to_string)
}

#[async_trait]
impl SurveyPlatform for HttpPlatform {
    fn base_url(&self) -> &str {
        &self.management_base
    }

    async fn probe(&self) -> bool {
        match self
            .client
            .get(&self.management_base)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => {
                tracing::debug!("Probe {} -> {}", self.management_base, response.status());
                response.status().as_u16() < 500
            }
            Err(e) => {
                tracing::debug!("Probe {} failed: {}", self.management_base, e);
                false
            }
        }
    }

    async fn create_member(&self, member: &MemberPayload) -> Result<Option<String>, PlatformError> {
        let path = format!("environments/{}/members", self.environment_id);
        let body = send(self.management_post(&path, member)).await?;
        Ok(remote_id(&body))
    }

    async fn create_survey(&self, survey: &SurveyPayload) -> Result<Option<String>, PlatformError> {
        let path = format!("environments/{}/surveys", self.environment_id);
        let body = send(self.management_post(&path, survey)).await?;
        Ok(remote_id(&body))
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        response: &ResponsePayload,
    ) -> Result<(), PlatformError> {
        let path = format!("{}/displays/{}/responses", self.environment_id, survey_id);
        send(self.client_post(&path, response)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> PlatformConfig {
        PlatformConfig {
            url: url.to_string(),
            api_key: "key".to_string(),
            environment_id: "env".to_string(),
            verify_tls: false,
        }
    }

    #[test]
    fn test_api_bases() {
        let platform = HttpPlatform::new(&config("https://localhost:3000/")).unwrap();
        assert_eq!(platform.base_url(), "https://localhost:3000");
        assert_eq!(platform.client_base, "https://localhost:3000/client");
    }

    #[test]
    fn test_remote_id_shapes() {
        assert_eq!(remote_id(r#"{"id":"abc"}"#), Some("abc".to_string()));
        assert_eq!(remote_id(r#"{"data":{"id":"xyz"}}"#), Some("xyz".to_string()));
        assert_eq!(remote_id(r#"{"ok":true}"#), None);
        assert_eq!(remote_id(r#"{"id":42}"#), None);
        assert_eq!(remote_id(""), None);
    }

    #[tokio::test]
    async fn test_probe_unreachable() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let platform = HttpPlatform::new(&config(&format!("http://127.0.0.1:{port}"))).unwrap();
        assert!(!platform.probe().await);
    }
}
