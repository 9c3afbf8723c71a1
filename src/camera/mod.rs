mod builder;
mod capture;
mod file;
mod http;
mod source;
#[cfg(test)]
mod tests;

pub use builder::CaptureSourceBuilder;
pub use capture::{capture_snapshot, CaptureRecord};
pub use file::SnapshotFileSource;
pub use http::HttpSnapshotSource;
pub use source::CaptureSource;
