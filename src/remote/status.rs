use super::http::RemoteEndpoint;
use super::types::{StatusRequest, StatusResponse};
use crate::error::NetworkError;
use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

/// Source of the presentation status code for this device's user
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Current status code, or `None` when the service knows no session
    async fn poll(&self) -> Result<Option<i64>, NetworkError>;
}

pub struct HttpStatusClient {
    endpoint: RemoteEndpoint,
    username: String,
}

impl HttpStatusClient {
    pub fn new(endpoint: RemoteEndpoint, username: impl Into<String>) -> Self {
        Self {
            endpoint,
            username: username.into(),
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn poll(&self) -> Result<Option<i64>, NetworkError> {
        let request = self.endpoint.post().json(&StatusRequest {
            username: &self.username,
        });
        let response = self.endpoint.send(request).await?;

        // Unknown users come back as 404 with `data: null`
        if response.status() == StatusCode::NOT_FOUND {
            debug!("Status service has no session for {}", self.username);
            return Ok(None);
        }

        let response = self.endpoint.ensure_success(response)?;
        let body: StatusResponse = self.endpoint.decode(response).await?;

        Ok(body.data.and_then(|data| data.status))
    }
}
