use crate::error::{NetworkError, PodiumError, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::trace;

/// Build the HTTP client shared by every remote boundary
pub fn build_http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(5)))
        .build()
        .map_err(|e| PodiumError::system(format!("Failed to build HTTP client: {}", e)))
}

/// One remote URL plus the client and timeout used to reach it
#[derive(Clone, Debug)]
pub struct RemoteEndpoint {
    name: &'static str,
    url: String,
    http: Client,
    timeout: Duration,
}

impl RemoteEndpoint {
    pub fn new(name: &'static str, url: impl Into<String>, http: Client, timeout: Duration) -> Self {
        Self {
            name,
            url: url.into(),
            http,
            timeout,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn post(&self) -> RequestBuilder {
        self.post_to(&self.url)
    }

    pub fn post_to(&self, url: &str) -> RequestBuilder {
        self.http.post(url).timeout(self.timeout)
    }

    /// Send a request, returning the response regardless of status
    pub async fn send(&self, request: RequestBuilder) -> std::result::Result<Response, NetworkError> {
        trace!("Sending request to {} ({})", self.name, self.url);
        request.send().await.map_err(|e| self.network_error(e))
    }

    /// POST `body` as JSON and decode a JSON reply; any non-2xx status is an error
    pub async fn post_json<B, R>(&self, body: &B) -> std::result::Result<R, NetworkError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.send(self.post().json(body)).await?;
        self.decode(self.ensure_success(response)?).await
    }

    pub fn ensure_success(&self, response: Response) -> std::result::Result<Response, NetworkError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(self.status_error(status))
        }
    }

    pub async fn decode<R: DeserializeOwned>(
        &self,
        response: Response,
    ) -> std::result::Result<R, NetworkError> {
        response.json::<R>().await.map_err(|e| NetworkError::Decode {
            endpoint: self.name.to_string(),
            details: e.to_string(),
        })
    }

    pub fn status_error(&self, status: StatusCode) -> NetworkError {
        NetworkError::Status {
            endpoint: self.name.to_string(),
            status: status.as_u16(),
        }
    }

    pub fn network_error(&self, error: reqwest::Error) -> NetworkError {
        NetworkError::from_reqwest(self.name, error, self.timeout)
    }
}
