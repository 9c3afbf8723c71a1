//! Thin request/response boundaries to the external services

mod classifier;
mod http;
mod report;
mod status;
pub mod types;
mod upload;

pub use classifier::{
    ExpressionClassifier, EyeContactClassifier, GestureClassifier, HttpExpressionClassifier,
    HttpEyeContactClassifier, HttpGestureClassifier, InferenceMode,
};
pub use http::{build_http_client, RemoteEndpoint};
pub use report::{HttpReportClient, ReportSink};
pub use status::{HttpStatusClient, StatusSource};
pub use types::EmotionScores;
pub use upload::{HttpImageUploader, ImageUploader};
