use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::Result;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PodiumConfig {
    pub device: DeviceConfig,
    pub endpoints: EndpointConfig,
    pub upload: UploadConfig,
    pub camera: CameraConfig,
    pub timing: TimingConfig,
    pub retry: RetryConfig,
    pub classification: ClassificationConfig,
    pub actuator: ActuatorConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DeviceConfig {
    /// Account the status service and report ingestion key on
    #[serde(default = "default_username")]
    pub username: String,

    /// Whether the classifier services should run inference on GPU
    #[serde(default)]
    pub use_gpu: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EndpointConfig {
    #[serde(default = "default_status_url")]
    pub status_url: String,

    #[serde(default = "default_report_url")]
    pub report_url: String,

    #[serde(default = "default_expression_url")]
    pub expression_url: String,

    /// Subscription key sent with facial-expression requests
    #[serde(default)]
    pub expression_api_key: Option<String>,

    #[serde(default = "default_eye_contact_url")]
    pub eye_contact_url: String,

    #[serde(default = "default_gesture_url")]
    pub gesture_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    /// Object upload endpoint (media upload API root)
    #[serde(default = "default_upload_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_upload_bucket")]
    pub bucket: String,

    /// Root of the publicly resolvable object URLs
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    #[serde(default)]
    pub bearer_token: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CameraConfig {
    /// Where the most recent frame comes from
    #[serde(default = "default_camera_source")]
    pub source: CameraSourceConfig,

    /// Fixed local path each capture overwrites
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CameraSourceConfig {
    /// JPEG file continuously overwritten by the camera process
    File { path: String, max_age_ms: u64 },
    /// Snapshot endpoint returning a JPEG body
    Http { url: String },
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TimingConfig {
    /// Delay after a Standby, Reporting or Disconnected cycle
    #[serde(default = "default_idle_interval_ms")]
    pub idle_interval_ms: u64,

    /// Minimum spacing between the starts of consecutive Recording cycles
    #[serde(default = "default_recording_min_interval_ms")]
    pub recording_min_interval_ms: u64,

    /// Upper bound for every remote call
    #[serde(default = "default_call_timeout_ms")]
    pub call_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RetryConfig {
    /// Total attempts for status polls and report submissions
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClassificationConfig {
    /// Summed bad-expression score above which the expression is flagged
    #[serde(default = "default_bad_expression_threshold")]
    pub bad_expression_threshold: f64,

    /// Eye-contact score below which eye contact is flagged
    #[serde(default = "default_eye_contact_threshold")]
    pub eye_contact_threshold: f64,

    #[serde(default = "default_good_expressions")]
    pub good_expressions: Vec<String>,

    #[serde(default = "default_bad_expressions")]
    pub bad_expressions: Vec<String>,

    #[serde(default = "default_bad_gestures")]
    pub bad_gestures: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActuatorConfig {
    #[serde(default = "default_output_backend")]
    pub backend: OutputBackend,

    /// Root of the sysfs GPIO class directory
    #[serde(default = "default_gpio_root")]
    pub gpio_root: String,

    #[serde(default = "default_channels")]
    pub channels: ChannelLines,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputBackend {
    Sysfs,
    Mock,
}

/// Output lines bound to each indicator.
///
/// Values are kernel GPIO numbers as used by `{gpio_root}/gpioN`, not
/// physical header pin numbers.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ChannelLines {
    pub white: Vec<u32>,
    pub red: Vec<u32>,
    pub yellow: Vec<u32>,
    pub green: Vec<u32>,
    pub blue: Vec<u32>,
}

impl PodiumConfig {
    /// Load configuration from default sources (file + environment variables)
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from_file("podium.toml")
    }

    /// Load configuration from a specific file path
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> std::result::Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy();
        debug!("Loading configuration from: {}", path_str);

        let channels = default_channels();

        let settings = Config::builder()
            .set_default("device.username", default_username())?
            .set_default("device.use_gpu", false)?
            .set_default("endpoints.status_url", default_status_url())?
            .set_default("endpoints.report_url", default_report_url())?
            .set_default("endpoints.expression_url", default_expression_url())?
            .set_default("endpoints.eye_contact_url", default_eye_contact_url())?
            .set_default("endpoints.gesture_url", default_gesture_url())?
            .set_default("upload.endpoint", default_upload_endpoint())?
            .set_default("upload.bucket", default_upload_bucket())?
            .set_default("upload.public_base_url", default_public_base_url())?
            .set_default("camera.source.kind", "file")?
            .set_default("camera.source.path", default_frame_path())?
            .set_default("camera.source.max_age_ms", default_frame_max_age_ms() as i64)?
            .set_default("camera.snapshot_path", default_snapshot_path())?
            .set_default("timing.idle_interval_ms", default_idle_interval_ms() as i64)?
            .set_default(
                "timing.recording_min_interval_ms",
                default_recording_min_interval_ms() as i64,
            )?
            .set_default("timing.call_timeout_ms", default_call_timeout_ms() as i64)?
            .set_default("retry.max_attempts", default_max_attempts())?
            .set_default("retry.backoff_ms", default_backoff_ms() as i64)?
            .set_default(
                "classification.bad_expression_threshold",
                default_bad_expression_threshold(),
            )?
            .set_default(
                "classification.eye_contact_threshold",
                default_eye_contact_threshold(),
            )?
            .set_default("classification.good_expressions", default_good_expressions())?
            .set_default("classification.bad_expressions", default_bad_expressions())?
            .set_default("classification.bad_gestures", default_bad_gestures())?
            .set_default("actuator.backend", "sysfs")?
            .set_default("actuator.gpio_root", default_gpio_root())?
            .set_default("actuator.channels.white", channels.white)?
            .set_default("actuator.channels.red", channels.red)?
            .set_default("actuator.channels.yellow", channels.yellow)?
            .set_default("actuator.channels.green", channels.green)?
            .set_default("actuator.channels.blue", channels.blue)?
            // Add configuration file (optional)
            .add_source(File::with_name(&path_str).required(false))
            // Add environment variables, e.g. PODIUM_DEVICE__USERNAME
            .add_source(Environment::with_prefix("PODIUM").separator("__"))
            .build()?;

        let config: PodiumConfig = settings.try_deserialize()?;

        info!("Configuration loaded successfully");
        debug!("Final configuration: {:#?}", config);

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.device.username.trim().is_empty() {
            return Err(ConfigError::Message(
                "Device username must not be empty".to_string(),
            ));
        }

        let urls = [
            ("endpoints.status_url", &self.endpoints.status_url),
            ("endpoints.report_url", &self.endpoints.report_url),
            ("endpoints.expression_url", &self.endpoints.expression_url),
            ("endpoints.eye_contact_url", &self.endpoints.eye_contact_url),
            ("endpoints.gesture_url", &self.endpoints.gesture_url),
            ("upload.endpoint", &self.upload.endpoint),
            ("upload.public_base_url", &self.upload.public_base_url),
        ];
        for (key, value) in urls {
            if value.trim().is_empty() {
                return Err(ConfigError::Message(format!("{} must not be empty", key)));
            }
        }

        if self.timing.idle_interval_ms == 0 {
            return Err(ConfigError::Message(
                "Idle interval must be greater than 0".to_string(),
            ));
        }

        if self.timing.call_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "Call timeout must be greater than 0".to_string(),
            ));
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Message(
                "Retry max_attempts must be at least 1".to_string(),
            ));
        }

        let thresholds = [
            (
                "bad_expression_threshold",
                self.classification.bad_expression_threshold,
            ),
            (
                "eye_contact_threshold",
                self.classification.eye_contact_threshold,
            ),
        ];
        for (key, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Message(format!(
                    "Classification {} must be within [0, 1], got {}",
                    key, value
                )));
            }
        }

        let lines = &self.actuator.channels;
        for (name, bound) in [
            ("white", &lines.white),
            ("red", &lines.red),
            ("yellow", &lines.yellow),
            ("green", &lines.green),
            ("blue", &lines.blue),
        ] {
            if bound.is_empty() {
                return Err(ConfigError::Message(format!(
                    "Indicator {} must be bound to at least one output line",
                    name
                )));
            }
        }

        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl TimingConfig {
    pub fn idle_interval(&self) -> Duration {
        Duration::from_millis(self.idle_interval_ms)
    }

    pub fn recording_min_interval(&self) -> Duration {
        Duration::from_millis(self.recording_min_interval_ms)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }
}

impl Default for PodiumConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig {
                username: default_username(),
                use_gpu: false,
            },
            endpoints: EndpointConfig {
                status_url: default_status_url(),
                report_url: default_report_url(),
                expression_url: default_expression_url(),
                expression_api_key: None,
                eye_contact_url: default_eye_contact_url(),
                gesture_url: default_gesture_url(),
            },
            upload: UploadConfig {
                endpoint: default_upload_endpoint(),
                bucket: default_upload_bucket(),
                public_base_url: default_public_base_url(),
                bearer_token: None,
            },
            camera: CameraConfig {
                source: default_camera_source(),
                snapshot_path: default_snapshot_path(),
            },
            timing: TimingConfig {
                idle_interval_ms: default_idle_interval_ms(),
                recording_min_interval_ms: default_recording_min_interval_ms(),
                call_timeout_ms: default_call_timeout_ms(),
            },
            retry: RetryConfig {
                max_attempts: default_max_attempts(),
                backoff_ms: default_backoff_ms(),
            },
            classification: ClassificationConfig {
                bad_expression_threshold: default_bad_expression_threshold(),
                eye_contact_threshold: default_eye_contact_threshold(),
                good_expressions: default_good_expressions(),
                bad_expressions: default_bad_expressions(),
                bad_gestures: default_bad_gestures(),
            },
            actuator: ActuatorConfig {
                backend: default_output_backend(),
                gpio_root: default_gpio_root(),
                channels: default_channels(),
            },
        }
    }
}

// Default value functions
fn default_username() -> String {
    "jetbot".to_string()
}

fn default_status_url() -> String {
    "https://us-central1-jet-presentation.cloudfunctions.net/services/getStatus".to_string()
}
fn default_report_url() -> String {
    "https://us-central1-jet-presentation.cloudfunctions.net/services/updateReportData"
        .to_string()
}
fn default_expression_url() -> String {
    "https://jet-face.cognitiveservices.azure.com/face/v1.0/detect".to_string()
}
fn default_eye_contact_url() -> String {
    "http://jet-presentation.koreacentral.cloudapp.azure.com:5000/get-eye-contact".to_string()
}
fn default_gesture_url() -> String {
    "http://jet-presentation.koreacentral.cloudapp.azure.com:5000/get-gesture".to_string()
}

fn default_upload_endpoint() -> String {
    "https://storage.googleapis.com/upload/storage/v1".to_string()
}
fn default_upload_bucket() -> String {
    "jet-presentation.appspot.com".to_string()
}
fn default_public_base_url() -> String {
    "https://storage.googleapis.com".to_string()
}

fn default_frame_path() -> String {
    "/dev/shm/podium/latest.jpg".to_string()
}
fn default_frame_max_age_ms() -> u64 {
    2000
}
fn default_camera_source() -> CameraSourceConfig {
    CameraSourceConfig::File {
        path: default_frame_path(),
        max_age_ms: default_frame_max_age_ms(),
    }
}
fn default_snapshot_path() -> String {
    "user_image.jpg".to_string()
}

fn default_idle_interval_ms() -> u64 {
    3000
}
fn default_recording_min_interval_ms() -> u64 {
    500
}
fn default_call_timeout_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    2
}
fn default_backoff_ms() -> u64 {
    250
}

fn default_bad_expression_threshold() -> f64 {
    0.5
}
fn default_eye_contact_threshold() -> f64 {
    0.7
}
fn default_good_expressions() -> Vec<String> {
    ["happiness", "neutral", "surprise"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_bad_expressions() -> Vec<String> {
    ["anger", "contempt", "disgust", "fear", "sadness"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_bad_gestures() -> Vec<String> {
    [
        "point",
        "clasp_hands",
        "hold",
        "cross_arms",
        "hide_two_arms",
        "hide_one_arm",
        "stand_improperly",
        "rotate_head",
        "touch_body",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_output_backend() -> OutputBackend {
    OutputBackend::Sysfs
}
fn default_gpio_root() -> String {
    "/sys/class/gpio".to_string()
}
/// Jetson Nano J41 header pins 22/24, 26, 29, 16/18 and 36/38
fn default_channels() -> ChannelLines {
    ChannelLines {
        white: vec![13, 19],
        red: vec![20],
        yellow: vec![149],
        green: vec![232, 15],
        blue: vec![51, 77],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = PodiumConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.device.username, "jetbot");
        assert_eq!(config.timing.idle_interval(), Duration::from_secs(3));
        assert_eq!(config.classification.bad_expressions.len(), 5);
        assert_eq!(config.classification.bad_gestures.len(), 9);
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[device]
username = "speaker"
use_gpu = true

[timing]
recording_min_interval_ms = 250

[camera.source]
kind = "http"
url = "http://127.0.0.1:9000/snapshot.jpg"
"#
        )
        .unwrap();

        let config = PodiumConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.device.username, "speaker");
        assert!(config.device.use_gpu);
        assert_eq!(config.timing.recording_min_interval_ms, 250);
        assert_eq!(config.timing.idle_interval_ms, 3000);
        assert_eq!(
            config.camera.source,
            CameraSourceConfig::Http {
                url: "http://127.0.0.1:9000/snapshot.jpg".to_string()
            }
        );
        assert_eq!(config.actuator.channels, default_channels());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = PodiumConfig::load_from_file(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.camera.source, default_camera_source());
        assert_eq!(config.actuator.backend, OutputBackend::Sysfs);
    }

    #[test]
    fn test_config_validation() {
        let mut config = PodiumConfig::default();

        config.classification.eye_contact_threshold = 1.5;
        assert!(config.validate().is_err());
        config.classification.eye_contact_threshold = 0.7;

        config.actuator.channels.green.clear();
        assert!(config.validate().is_err());
        config.actuator.channels.green = vec![16];

        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());
        config.retry.max_attempts = 1;

        config.endpoints.status_url = " ".to_string();
        assert!(config.validate().is_err());
        config.endpoints.status_url = default_status_url();

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_channels_use_kernel_gpio_numbers() {
        let channels = PodiumConfig::default().actuator.channels;
        assert_eq!(channels.white, vec![13, 19]);
        assert_eq!(channels.red, vec![20]);
        assert_eq!(channels.yellow, vec![149]);
        assert_eq!(channels.green, vec![232, 15]);
        assert_eq!(channels.blue, vec![51, 77]);
    }

    #[test]
    fn test_toml_rendering() {
        let rendered = PodiumConfig::default().to_toml().unwrap();
        assert!(rendered.contains("[timing]"));
        assert!(rendered.contains("kind = \"file\""));
    }
}
