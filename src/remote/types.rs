//! Wire payloads exchanged with the remote services

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Emotion label to confidence score
pub type EmotionScores = BTreeMap<String, f64>;

#[derive(Debug, Serialize)]
pub struct StatusRequest<'a> {
    pub username: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub data: Option<StatusData>,
}

#[derive(Debug, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub status: Option<i64>,
}

/// Body shared by the three classifier endpoints
#[derive(Debug, Serialize)]
pub struct ClassifierRequest<'a> {
    pub image_path: &'a str,
    pub is_gpu: bool,
}

/// One detected face. Services either nest the emotion map under
/// `faceAttributes` or return it at the top level.
#[derive(Debug, Deserialize)]
pub struct FaceDetection {
    #[serde(rename = "faceAttributes", default)]
    pub face_attributes: Option<FaceAttributes>,
    #[serde(default)]
    pub emotion: Option<EmotionScores>,
}

#[derive(Debug, Deserialize)]
pub struct FaceAttributes {
    #[serde(default)]
    pub emotion: Option<EmotionScores>,
}

impl FaceDetection {
    pub fn into_emotions(self) -> Option<EmotionScores> {
        self.face_attributes
            .and_then(|attributes| attributes.emotion)
            .or(self.emotion)
    }
}

#[derive(Debug, Deserialize)]
pub struct EyeContactResponse {
    pub score: f64,
}

#[derive(Debug, Deserialize)]
pub struct GestureResponse {
    pub gesture: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ReportPayload<'a> {
    pub username: &'a str,
    /// Unix seconds
    pub timestamp: i64,
    pub image_url: &'a str,
    pub eye_contact: Option<f64>,
    pub emotion: &'a str,
    pub gesture: Option<&'a str>,
}

#[derive(Debug, Deserialize, Default)]
pub struct UploadResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "mediaLink", default)]
    pub media_link: Option<String>,
}
