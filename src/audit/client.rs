//! HTTP client for the OSS Index component report API

use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;

use super::ComponentIndex;
use crate::config::OssauditConfig;
use crate::errors::AuditError;
use crate::models::ComponentReport;

const USER_AGENT: &str = concat!("ossaudit/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Serialize)]
struct ComponentReportRequest<'a> {
    coordinates: &'a [String],
}

/// Client for `POST /api/v3/component-report`
#[derive(Debug, Clone)]
pub struct OssIndexClient {
    client: reqwest::Client,
    url: String,
    credentials: Option<(String, String)>,
}

impl OssIndexClient {
    /// Create a client for `url`, authenticating when credentials are given
    pub fn new(
        url: impl Into<String>,
        credentials: Option<(String, String)>,
    ) -> Result<Self, AuditError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AuditError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
            credentials,
        })
    }

    /// Create a client from the loaded configuration
    pub fn from_config(config: &OssauditConfig) -> Result<Self, AuditError> {
        let credentials = config
            .credentials()
            .map(|(user, token)| (user.to_string(), token.to_string()));
        Self::new(config.api_url.clone(), credentials)
    }
}

#[async_trait]
impl ComponentIndex for OssIndexClient {
    async fn component_reports(
        &self,
        coordinates: &[String],
    ) -> Result<Vec<ComponentReport>, AuditError> {
        debug!(
            "Requesting {} component reports from {}",
            coordinates.len(),
            self.url
        );

        let mut request = self
            .client
            .post(&self.url)
            .json(&ComponentReportRequest { coordinates });
        if let Some((user, token)) = &self.credentials {
            request = request.basic_auth(user, Some(token));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AuditError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match body.trim() {
                "" => status.canonical_reason().unwrap_or("unknown error").to_string(),
                text => text.to_string(),
            };
            return Err(AuditError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Vec<ComponentReport>>()
            .await
            .map_err(|e| AuditError::InvalidResponse(e.to_string()))
    }
}
