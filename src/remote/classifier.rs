use super::http::RemoteEndpoint;
use super::types::{
    ClassifierRequest, EmotionScores, EyeContactResponse, FaceDetection, GestureResponse,
};
use crate::error::NetworkError;
use async_trait::async_trait;

/// Where the classifier services should run inference. Read once at
/// startup and copied into every client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InferenceMode {
    #[default]
    Cpu,
    Gpu,
}

impl InferenceMode {
    pub fn from_flag(use_gpu: bool) -> Self {
        if use_gpu {
            InferenceMode::Gpu
        } else {
            InferenceMode::Cpu
        }
    }

    pub fn is_gpu(&self) -> bool {
        matches!(self, InferenceMode::Gpu)
    }
}

#[async_trait]
pub trait ExpressionClassifier: Send + Sync {
    /// Emotion scores of the first detected face, `None` when no face was found
    async fn classify(&self, image_url: &str) -> Result<Option<EmotionScores>, NetworkError>;
}

#[async_trait]
pub trait EyeContactClassifier: Send + Sync {
    /// Eye-contact score in [0, 1]
    async fn classify(&self, image_url: &str) -> Result<f64, NetworkError>;
}

#[async_trait]
pub trait GestureClassifier: Send + Sync {
    async fn classify(&self, image_url: &str) -> Result<String, NetworkError>;
}

pub struct HttpExpressionClassifier {
    endpoint: RemoteEndpoint,
    mode: InferenceMode,
    api_key: Option<String>,
}

impl HttpExpressionClassifier {
    pub fn new(endpoint: RemoteEndpoint, mode: InferenceMode, api_key: Option<String>) -> Self {
        Self {
            endpoint,
            mode,
            api_key,
        }
    }
}

#[async_trait]
impl ExpressionClassifier for HttpExpressionClassifier {
    async fn classify(&self, image_url: &str) -> Result<Option<EmotionScores>, NetworkError> {
        let mut request = self
            .endpoint
            .post()
            .query(&[("returnFaceAttributes", "emotion")])
            .json(&ClassifierRequest {
                image_path: image_url,
                is_gpu: self.mode.is_gpu(),
            });
        if let Some(key) = &self.api_key {
            request = request.header("Ocp-Apim-Subscription-Key", key);
        }

        let response = self.endpoint.send(request).await?;
        let response = self.endpoint.ensure_success(response)?;
        let faces: Vec<FaceDetection> = self.endpoint.decode(response).await?;

        Ok(faces.into_iter().next().and_then(FaceDetection::into_emotions))
    }
}

pub struct HttpEyeContactClassifier {
    endpoint: RemoteEndpoint,
    mode: InferenceMode,
}

impl HttpEyeContactClassifier {
    pub fn new(endpoint: RemoteEndpoint, mode: InferenceMode) -> Self {
        Self { endpoint, mode }
    }
}

#[async_trait]
impl EyeContactClassifier for HttpEyeContactClassifier {
    async fn classify(&self, image_url: &str) -> Result<f64, NetworkError> {
        let body: EyeContactResponse = self
            .endpoint
            .post_json(&ClassifierRequest {
                image_path: image_url,
                is_gpu: self.mode.is_gpu(),
            })
            .await?;

        if !body.score.is_finite() || !(0.0..=1.0).contains(&body.score) {
            return Err(NetworkError::Decode {
                endpoint: self.endpoint.name().to_string(),
                details: format!("eye-contact score {} outside [0, 1]", body.score),
            });
        }

        Ok(body.score)
    }
}

pub struct HttpGestureClassifier {
    endpoint: RemoteEndpoint,
    mode: InferenceMode,
}

impl HttpGestureClassifier {
    pub fn new(endpoint: RemoteEndpoint, mode: InferenceMode) -> Self {
        Self { endpoint, mode }
    }
}

#[async_trait]
impl GestureClassifier for HttpGestureClassifier {
    async fn classify(&self, image_url: &str) -> Result<String, NetworkError> {
        let body: GestureResponse = self
            .endpoint
            .post_json(&ClassifierRequest {
                image_path: image_url,
                is_gpu: self.mode.is_gpu(),
            })
            .await?;

        Ok(body.gesture)
    }
}
