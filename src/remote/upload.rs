use super::http::RemoteEndpoint;
use super::types::UploadResponse;
use crate::error::NetworkError;
use async_trait::async_trait;
use std::path::Path;
use tracing::debug;
use uuid::Uuid;

/// Uploads a captured frame and returns a publicly resolvable URL for it
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, local_path: &Path) -> Result<String, NetworkError>;
}

/// Object-storage uploader using the media upload API
/// (`POST {endpoint}/b/{bucket}/o?uploadType=media&name={object}`)
pub struct HttpImageUploader {
    endpoint: RemoteEndpoint,
    bucket: String,
    public_base_url: String,
    bearer_token: Option<String>,
    prefix: String,
}

impl HttpImageUploader {
    pub fn new(
        endpoint: RemoteEndpoint,
        bucket: impl Into<String>,
        public_base_url: impl Into<String>,
        bearer_token: Option<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            endpoint,
            bucket: bucket.into(),
            public_base_url: public_base_url.into(),
            bearer_token,
            prefix: prefix.into(),
        }
    }

    /// Fresh object name under the per-user prefix
    pub fn object_name(&self) -> String {
        format!("{}/{}.jpg", self.prefix, Uuid::new_v4())
    }

    pub fn public_url(&self, object: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            self.bucket,
            object
        )
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/b/{}/o",
            self.endpoint.url().trim_end_matches('/'),
            self.bucket
        )
    }
}

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, local_path: &Path) -> Result<String, NetworkError> {
        let bytes = tokio::fs::read(local_path)
            .await
            .map_err(|e| NetworkError::Request {
                endpoint: self.endpoint.name().to_string(),
                details: format!("cannot read {}: {}", local_path.display(), e),
            })?;

        let object = self.object_name();
        let mut request = self
            .endpoint
            .post_to(&self.upload_url())
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = self.endpoint.send(request).await?;
        let response = self.endpoint.ensure_success(response)?;

        // The storage API echoes the stored object; fall back to our name
        let stored: UploadResponse = self.endpoint.decode(response).await.unwrap_or_default();
        let object = stored.name.unwrap_or(object);
        let url = self.public_url(&object);

        debug!(
            "Uploaded {} as {} (media link: {:?})",
            local_path.display(),
            url,
            stored.media_link
        );
        Ok(url)
    }
}
