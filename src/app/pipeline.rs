use super::device_loop::{with_timeout, DeviceLoop};
use super::types::RecordingOutcome;
use crate::camera::{capture_snapshot, CaptureRecord};
use crate::error::{CaptureError, NetworkError};
use crate::feedback::{is_known_gesture, ClassificationResult, ReportRecord};
use chrono::Utc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

impl DeviceLoop {
    /// Capture, upload, classify and report one frame.
    ///
    /// Without an uploaded image nothing can be classified: the decision is
    /// built from an empty result (all feedback bad) and no report is sent.
    pub(super) async fn run_recording(&mut self) -> RecordingOutcome {
        let (capture, image_url) = match self.capture_and_upload().await {
            Some(captured) => captured,
            None => {
                let classification = ClassificationResult::empty();
                let decision = self.aggregator.decide(&classification);
                return RecordingOutcome {
                    capture: None,
                    classification,
                    decision,
                    report: None,
                    report_submitted: false,
                };
            }
        };

        let classification = self.classify(&image_url).await;
        let decision = self.aggregator.decide(&classification);
        debug!("Feedback decision {:?}", decision);

        let report = self.aggregator.report(Utc::now(), image_url, &classification);
        let report_submitted = self.submit_report(&report).await;

        RecordingOutcome {
            capture: Some(capture),
            classification,
            decision,
            report: Some(report),
            report_submitted,
        }
    }

    async fn capture_and_upload(&mut self) -> Option<(CaptureRecord, String)> {
        let call_timeout = self.settings.call_timeout;
        let camera = self.collaborators.camera.as_ref();

        let captured = match timeout(
            call_timeout,
            capture_snapshot(camera, &self.settings.snapshot_path),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(CaptureError::Unavailable {
                details: format!("{} timed out after {:?}", camera.name(), call_timeout),
            }),
        };

        let record = match captured {
            Ok(record) => record,
            Err(e) => {
                warn!("Snapshot capture failed: {}", e);
                self.stats.capture_failures += 1;
                return None;
            }
        };

        let uploaded = with_timeout(
            "upload",
            call_timeout,
            self.collaborators.uploader.upload(&record.local_path),
        )
        .await;

        match uploaded {
            Ok(url) => {
                debug!("Frame {} uploaded to {}", record.frame_id, url);
                Some((record.with_remote_url(url.clone()), url))
            }
            Err(e) => {
                warn!("Snapshot upload failed: {}", e);
                self.stats.upload_failures += 1;
                None
            }
        }
    }

    /// Query the three classifiers concurrently. Each failure only blanks
    /// its own field of the result.
    async fn classify(&mut self, image_url: &str) -> ClassificationResult {
        let call_timeout = self.settings.call_timeout;
        let collaborators = &self.collaborators;

        let (expression, eye_contact, gesture) = tokio::join!(
            with_timeout(
                "expression",
                call_timeout,
                collaborators.expression.classify(image_url)
            ),
            with_timeout(
                "eye_contact",
                call_timeout,
                collaborators.eye_contact.classify(image_url)
            ),
            with_timeout(
                "gesture",
                call_timeout,
                collaborators.gesture.classify(image_url)
            ),
        );

        let expression = self.settle("expression", expression).flatten();
        let eye_contact_score = self.settle("eye contact", eye_contact);
        let gesture_label = self.settle("gesture", gesture);

        if let Some(label) = gesture_label.as_deref() {
            if !is_known_gesture(label) {
                warn!("Gesture classifier returned unknown label {}", label);
            }
        }

        ClassificationResult::new(expression, eye_contact_score, gesture_label)
    }

    fn settle<T>(&mut self, name: &str, result: Result<T, NetworkError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} classification failed: {}", name, e);
                self.stats.classifier_failures += 1;
                None
            }
        }
    }

    async fn submit_report(&mut self, report: &ReportRecord) -> bool {
        let call_timeout = self.settings.call_timeout;
        let reports = &self.collaborators.reports;

        let submitted = self
            .settings
            .retry
            .run("report submission", || {
                with_timeout("report", call_timeout, reports.submit(report))
            })
            .await;

        match submitted {
            Ok(()) => {
                info!(
                    "Report submitted: emotion={} eye_contact={:?} gesture={:?}",
                    report.dominant_emotion, report.eye_contact_score, report.gesture_label
                );
                self.stats.reports_submitted += 1;
                true
            }
            Err(e) => {
                error!("Report submission failed, dropping record: {}", e);
                self.stats.report_failures += 1;
                false
            }
        }
    }
}
