//! Face detector backends.
//!
//! Every backend is opened from a [`DetectorConfig`] and reports faces as
//! plain [`FaceRect`]s in its own order.

use std::{fmt, str::FromStr};

use image::DynamicImage;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{config::DetectorConfig, rect::FaceRect, Error};

#[cfg(feature = "mtcnn")]
mod mtcnn;
mod seeta;

#[cfg(feature = "mtcnn")]
pub use mtcnn::MtcnnDetector;
pub use seeta::SeetaDetector;

/// Something that finds faces in a frame.
pub trait FaceDetector: fmt::Debug {
    /// Detect Faces in an Image
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceRect>, Error>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceRect>, Error> {
        (**self).detect(image)
    }
}

impl<D: FaceDetector + ?Sized> FaceDetector for &D {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceRect>, Error> {
        (**self).detect(image)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Backend {
    /// SeetaFace cascade through `rustface`
    Seeta,
    /// TensorFlow MTCNN graph, needs the `mtcnn` feature
    Mtcnn,
}

impl Default for Backend {
    fn default() -> Self { Self::Seeta }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeta => f.write_str("seeta"),
            Self::Mtcnn => f.write_str("mtcnn"),
        }
    }
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "seeta" => Ok(Self::Seeta),
            "mtcnn" => Ok(Self::Mtcnn),
            _ => Err(Error::UnknownBackend(s.to_owned())),
        }
    }
}

/// Opens the detector for `backend`, loading its model from
/// `config.model_path`.
pub fn open_detector(
    backend: Backend,
    config: &DetectorConfig,
) -> Result<Box<dyn FaceDetector>, Error> {
    match backend {
        Backend::Seeta => Ok(Box::new(SeetaDetector::open(config)?)),
        #[cfg(feature = "mtcnn")]
        Backend::Mtcnn => Ok(Box::new(MtcnnDetector::open(config)?)),
        #[cfg(not(feature = "mtcnn"))]
        Backend::Mtcnn => Err(Error::BackendUnavailable(backend.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_names() {
        assert_eq!("seeta".parse::<Backend>().unwrap(), Backend::Seeta);
        assert_eq!("MTCNN".parse::<Backend>().unwrap(), Backend::Mtcnn);
        assert!(matches!(
            "haar".parse::<Backend>(),
            Err(Error::UnknownBackend(name)) if name == "haar"
        ));
    }

    #[test]
    fn missing_model_is_a_model_load_error() {
        let config = DetectorConfig::new("no/such/dir/model.bin");
        let err = open_detector(Backend::Seeta, &config).unwrap_err();
        assert!(err.is_model_load());
    }

    #[cfg(not(feature = "mtcnn"))]
    #[test]
    fn mtcnn_needs_its_feature() {
        let err = open_detector(Backend::Mtcnn, &DetectorConfig::default())
            .unwrap_err();
        assert!(matches!(err, Error::BackendUnavailable(_)));
    }
}
