use super::device_loop::{Collaborators, DeviceLoop, LoopSettings};
use crate::actuator::{ActuatorPanel, ChannelBindings, MockOutputLines, OutputLines, SysfsOutputLines};
use crate::camera::CaptureSourceBuilder;
use crate::config::{OutputBackend, PodiumConfig};
use crate::error::Result;
use crate::feedback::ClassificationAggregator;
use crate::remote::{
    build_http_client, HttpExpressionClassifier, HttpEyeContactClassifier, HttpGestureClassifier,
    HttpImageUploader, HttpReportClient, HttpStatusClient, InferenceMode, RemoteEndpoint,
};
use std::sync::Arc;
use tracing::{error, info};

impl DeviceLoop {
    /// Wire up the HTTP collaborators, camera source and indicator panel
    /// described by `config`.
    pub fn from_config(config: &PodiumConfig) -> Result<Self> {
        info!("Initializing device loop for user {}", config.device.username);

        let call_timeout = config.timing.call_timeout();
        let http = build_http_client(call_timeout)?;
        let endpoint =
            |name, url: &str| RemoteEndpoint::new(name, url, http.clone(), call_timeout);

        let mode = InferenceMode::from_flag(config.device.use_gpu);
        info!("Classifier inference mode: {:?}", mode);

        let endpoints = &config.endpoints;
        let username = config.device.username.clone();

        let collaborators = Collaborators {
            status: Arc::new(HttpStatusClient::new(
                endpoint("status", &endpoints.status_url),
                username.clone(),
            )),
            camera: CaptureSourceBuilder::new()
                .config(config.camera.clone())
                .http_client(http.clone())
                .build()?,
            uploader: Arc::new(HttpImageUploader::new(
                endpoint("upload", &config.upload.endpoint),
                config.upload.bucket.clone(),
                config.upload.public_base_url.clone(),
                config.upload.bearer_token.clone(),
                username.clone(),
            )),
            expression: Arc::new(HttpExpressionClassifier::new(
                endpoint("expression", &endpoints.expression_url),
                mode,
                endpoints.expression_api_key.clone(),
            )),
            eye_contact: Arc::new(HttpEyeContactClassifier::new(
                endpoint("eye_contact", &endpoints.eye_contact_url),
                mode,
            )),
            gesture: Arc::new(HttpGestureClassifier::new(
                endpoint("gesture", &endpoints.gesture_url),
                mode,
            )),
            reports: Arc::new(HttpReportClient::new(
                endpoint("report", &endpoints.report_url),
                username,
            )),
        };

        let lines: Arc<dyn OutputLines> = match config.actuator.backend {
            OutputBackend::Sysfs => {
                info!("Driving indicators through {}", config.actuator.gpio_root);
                Arc::new(SysfsOutputLines::new(&config.actuator.gpio_root))
            }
            OutputBackend::Mock => {
                info!("Using in-memory indicator lines");
                Arc::new(MockOutputLines::new())
            }
        };

        let panel = ActuatorPanel::new(
            ChannelBindings::from_config(&config.actuator.channels),
            lines,
        );
        if let Err(e) = panel.initialize() {
            error!("Failed to prepare indicator lines: {}", e);
        }

        let aggregator = ClassificationAggregator::new(&config.classification);

        info!("Device loop initialized");
        Ok(Self::new(
            collaborators,
            panel,
            aggregator,
            LoopSettings::from_config(config),
        ))
    }
}
