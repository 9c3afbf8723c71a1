use super::http::RemoteEndpoint;
use super::types::ReportPayload;
use crate::error::NetworkError;
use crate::feedback::ReportRecord;
use async_trait::async_trait;

/// Report ingestion boundary. One submission per Recording cycle; the
/// caller owns retries.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn submit(&self, report: &ReportRecord) -> Result<(), NetworkError>;
}

pub struct HttpReportClient {
    endpoint: RemoteEndpoint,
    username: String,
}

impl HttpReportClient {
    pub fn new(endpoint: RemoteEndpoint, username: impl Into<String>) -> Self {
        Self {
            endpoint,
            username: username.into(),
        }
    }

    pub fn payload<'a>(&'a self, report: &'a ReportRecord) -> ReportPayload<'a> {
        ReportPayload {
            username: &self.username,
            timestamp: report.timestamp.timestamp(),
            image_url: &report.image_url,
            eye_contact: report.eye_contact_score,
            emotion: &report.dominant_emotion,
            gesture: report.gesture_label.as_deref(),
        }
    }
}

#[async_trait]
impl ReportSink for HttpReportClient {
    async fn submit(&self, report: &ReportRecord) -> Result<(), NetworkError> {
        let request = self.endpoint.post().json(&self.payload(report));
        let response = self.endpoint.send(request).await?;
        self.endpoint.ensure_success(response)?;
        Ok(())
    }
}
