use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PodiumError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Actuation error: {0}")]
    Actuation(#[from] ActuationError),

    #[error("System error: {message}")]
    System { message: String },
}

/// Failed or timed-out call to one of the remote services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Request to {endpoint} failed: {details}")]
    Request { endpoint: String, details: String },

    #[error("Request to {endpoint} timed out after {timeout:?}")]
    Timeout { endpoint: String, timeout: Duration },

    #[error("Request to {endpoint} returned HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("Response from {endpoint} could not be decoded: {details}")]
    Decode { endpoint: String, details: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CaptureError {
    #[error("Camera frame unavailable: {details}")]
    Unavailable { details: String },

    #[error("Latest camera frame is stale ({age_ms} ms old)")]
    Stale { age_ms: u64 },

    #[error("Camera produced an empty frame")]
    Empty,

    #[error("Failed to persist frame to {path}: {details}")]
    Persist { path: String, details: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ActuationError {
    #[error("Failed to export output line {line}: {details}")]
    Export { line: u32, details: String },

    #[error("Failed to write output line {line}: {details}")]
    Write { line: u32, details: String },
}

impl PodiumError {
    pub fn system<S: Into<String>>(message: S) -> Self {
        Self::System {
            message: message.into(),
        }
    }

    /// Errors the device loop absorbs per cycle instead of stopping.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            PodiumError::Network(_) | PodiumError::Capture(_) | PodiumError::Actuation(_)
        )
    }
}

impl NetworkError {
    pub fn endpoint(&self) -> &str {
        match self {
            NetworkError::Request { endpoint, .. }
            | NetworkError::Timeout { endpoint, .. }
            | NetworkError::Status { endpoint, .. }
            | NetworkError::Decode { endpoint, .. } => endpoint,
        }
    }

    pub(crate) fn from_reqwest(endpoint: &str, error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            return NetworkError::Timeout {
                endpoint: endpoint.to_string(),
                timeout,
            };
        }
        if error.is_decode() {
            return NetworkError::Decode {
                endpoint: endpoint.to_string(),
                details: error.to_string(),
            };
        }
        if let Some(status) = error.status() {
            return NetworkError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            };
        }
        NetworkError::Request {
            endpoint: endpoint.to_string(),
            details: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PodiumError>;
