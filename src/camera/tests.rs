use super::*;
use crate::config::{CameraConfig, CameraSourceConfig};
use crate::error::{CaptureError, PodiumError};
use crate::frame::FrameSlot;
use std::time::Duration;

fn jpeg_bytes() -> Vec<u8> {
    vec![0xFF, 0xD8, 0x00, 0x11, 0xFF, 0xD9]
}

#[tokio::test]
async fn test_frame_slot_without_frame_is_unavailable() {
    let slot = FrameSlot::new();
    let result = slot.latest_frame().await;
    assert!(matches!(result, Err(CaptureError::Unavailable { .. })));
}

#[tokio::test]
async fn test_frame_slot_empty_frame() {
    let slot = FrameSlot::new();
    slot.publish_bytes(Vec::new()).await;
    assert_eq!(slot.latest_frame().await.unwrap_err(), CaptureError::Empty);
}

#[tokio::test]
async fn test_capture_snapshot_overwrites_fixed_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("captures").join("user_image.jpg");
    let slot = FrameSlot::new();

    slot.publish_bytes(vec![0xFF, 0xD8, 0x01]).await;
    let first = capture_snapshot(&slot, &path).await.unwrap();
    assert_eq!(first.local_path, path);
    assert!(first.remote_url.is_none());

    slot.publish_bytes(jpeg_bytes()).await;
    let second = capture_snapshot(&slot, &path).await.unwrap();
    assert!(second.frame_id > first.frame_id);

    let stored = std::fs::read(&path).unwrap();
    assert_eq!(stored, jpeg_bytes());

    // No staging file left behind
    let entries: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .collect();
    assert_eq!(entries.len(), 1);

    let uploaded = second.with_remote_url("https://cdn.example/u.jpg".to_string());
    assert_eq!(uploaded.remote_url.as_deref(), Some("https://cdn.example/u.jpg"));
}

#[tokio::test]
async fn test_capture_snapshot_propagates_camera_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_image.jpg");
    let slot = FrameSlot::new();

    let result = capture_snapshot(&slot, &path).await;
    assert!(matches!(result, Err(CaptureError::Unavailable { .. })));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_snapshot_file_source_reads_latest() {
    let dir = tempfile::tempdir().unwrap();
    let frame_path = dir.path().join("latest.jpg");
    std::fs::write(&frame_path, jpeg_bytes()).unwrap();

    let source = SnapshotFileSource::new(&frame_path, Duration::from_secs(60));
    let frame = source.latest_frame().await.unwrap();
    assert!(frame.is_jpeg());
    assert_eq!(frame.id, 1);

    std::fs::write(&frame_path, vec![0xFF, 0xD8]).unwrap();
    let frame = source.latest_frame().await.unwrap();
    assert_eq!(frame.id, 2);
    assert_eq!(frame.data.len(), 2);
}

#[tokio::test]
async fn test_snapshot_file_source_missing_and_empty() {
    let dir = tempfile::tempdir().unwrap();
    let frame_path = dir.path().join("latest.jpg");
    let source = SnapshotFileSource::new(&frame_path, Duration::ZERO);

    assert!(matches!(
        source.latest_frame().await,
        Err(CaptureError::Unavailable { .. })
    ));

    std::fs::write(&frame_path, Vec::<u8>::new()).unwrap();
    assert_eq!(source.latest_frame().await.unwrap_err(), CaptureError::Empty);
}

#[tokio::test]
async fn test_snapshot_file_source_rejects_stale_frame() {
    let dir = tempfile::tempdir().unwrap();
    let frame_path = dir.path().join("latest.jpg");
    std::fs::write(&frame_path, jpeg_bytes()).unwrap();
    tokio::time::sleep(Duration::from_millis(30)).await;

    let source = SnapshotFileSource::new(&frame_path, Duration::from_millis(5));
    match source.latest_frame().await {
        Err(CaptureError::Stale { age_ms }) => assert!(age_ms >= 25),
        other => panic!("Expected stale frame, got {:?}", other),
    }

    // Without an age limit the same file is accepted and numbered from 1
    let unbounded = SnapshotFileSource::new(&frame_path, Duration::ZERO);
    let frame = unbounded.latest_frame().await.unwrap();
    assert_eq!(frame.id, 1);
    assert!(frame.is_older_than(Duration::from_millis(5)));
}

#[test]
fn test_builder_validation() {
    let result = CaptureSourceBuilder::new().build();
    match result {
        Err(PodiumError::System { message }) => {
            assert!(message.contains("Camera configuration must be specified"))
        }
        _ => panic!("Expected system error for missing configuration"),
    }

    let http_without_client = CaptureSourceBuilder::new()
        .config(CameraConfig {
            source: CameraSourceConfig::Http {
                url: "http://127.0.0.1:1/snapshot.jpg".to_string(),
            },
            snapshot_path: "user_image.jpg".to_string(),
        })
        .build();
    assert!(http_without_client.is_err());
}

#[test]
fn test_builder_file_source() {
    let source = CaptureSourceBuilder::new()
        .config(CameraConfig {
            source: CameraSourceConfig::File {
                path: "/tmp/podium-latest.jpg".to_string(),
                max_age_ms: 1000,
            },
            snapshot_path: "user_image.jpg".to_string(),
        })
        .build()
        .unwrap();
    assert_eq!(source.name(), "snapshot_file");
}
