#![deny(
    unsafe_code,
    missing_debug_implementations,
    missing_copy_implementations,
    elided_lifetimes_in_paths,
    rust_2018_idioms,
    clippy::fallible_impl_from,
    clippy::missing_const_for_fn
)]

//! Crops the largest detected face of every frame in a directory into a
//! fixed-size JPEG thumbnail.
//!
//! ```no_run
//! use facecrop::{open_detector, Backend, CaptureConfig, DetectorConfig, FaceCapture};
//!
//! # fn main() -> Result<(), facecrop::Error> {
//! let detector = open_detector(Backend::Seeta, &DetectorConfig::default())?;
//! let capture = FaceCapture::new(detector, &CaptureConfig::new("frames"));
//! let summary = capture.run()?;
//! println!("wrote {} thumbnail(s)", summary.thumbnails);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod config;
pub mod detector;
pub mod loader;
pub mod pipeline;
pub mod rect;
pub mod select;
pub mod thumbnail;

pub use config::{CaptureConfig, DetectorConfig, FrameNumbering, WriteMode};
pub use detector::{open_detector, Backend, FaceDetector, SeetaDetector};
#[cfg(feature = "mtcnn")]
pub use detector::MtcnnDetector;
pub use loader::{Frame, FrameLoader};
pub use pipeline::{CaptureSummary, FaceCapture, FrameReport};
pub use rect::FaceRect;
pub use select::{largest, prefix_maxima};
pub use thumbnail::{crop_and_resize, encode_jpeg, ThumbnailWriter};

/// Everything that can go wrong while capturing faces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load detector model from {}", .path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("detector backend `{0}` was not compiled in")]
    BackendUnavailable(String),
    #[error("unknown detector backend `{0}`, expected `seeta` or `mtcnn`")]
    UnknownBackend(String),
    #[error("failed to read input directory {}", .path.display())]
    InputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image Error: {0}")]
    Image(#[from] image::ImageError),
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[cfg(feature = "mtcnn")]
    #[error("Tensorflow Error: {0}")]
    TFError(#[from] tensorflow::Status),
}

impl Error {
    /// Whether this error comes from loading the detector model, the one
    /// failure that aborts a run before any frame is touched.
    pub const fn is_model_load(&self) -> bool {
        matches!(self, Self::ModelLoad { .. })
    }
}
