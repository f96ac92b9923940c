use std::{fmt, fs, io, panic};

use image::{DynamicImage, GenericImageView};
use rustface::{ImageData, Model};

use super::FaceDetector;
use crate::{config::DetectorConfig, rect::FaceRect, Error};

/// Horizontal and vertical stride of the sliding window, in pixels.
const SLIDE_WINDOW_STEP: u32 = 4;

/// Face detector backed by the SeetaFace funnel-structured cascade.
///
/// The model is read once when opened; every call to
/// [`FaceDetector::detect`] runs a fresh detector over a clone of it.
pub struct SeetaDetector {
    model: Model,
    min_size: u32,
    pyramid_scale: f32,
    score_threshold: f64,
}

impl fmt::Debug for SeetaDetector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeetaDetector")
            .field("min_size", &self.min_size)
            .field("pyramid_scale", &self.pyramid_scale)
            .field("score_threshold", &self.score_threshold)
            .finish_non_exhaustive()
    }
}

impl SeetaDetector {
    pub fn open(config: &DetectorConfig) -> Result<Self, Error> {
        config.validate()?;
        let path = &config.model_path;
        let model_load = |source| Error::ModelLoad {
            path: path.clone(),
            source,
        };
        let bytes = fs::read(path).map_err(model_load)?;
        let model = parse_model(&bytes).map_err(model_load)?;
        log::debug!("loaded SeetaFace model from {}", path.display());
        if config.min_neighbors > 0 {
            log::debug!(
                "min neighbors ({}) has no SeetaFace counterpart, ignoring",
                config.min_neighbors
            );
        }
        Ok(Self {
            model,
            min_size: config.min_size,
            // SeetaFace shrinks the image between pyramid levels instead of
            // growing the window.
            pyramid_scale: config.pyramid_scale(),
            score_threshold: config.score_threshold,
        })
    }
}

/// Parses a SeetaFace model.
///
/// `rustface` panics on malformed models instead of failing, so the
/// hierarchy count is checked up front and any panic left is reported as
/// `InvalidData`.
fn parse_model(bytes: &[u8]) -> io::Result<Model> {
    let hierarchies = match bytes.get(..4) {
        Some(&[a, b, c, d]) => i32::from_le_bytes([a, b, c, d]),
        _ => return Err(invalid_model("file is shorter than a model header")),
    };
    // each hierarchy takes at least one 4-byte field
    if hierarchies <= 0 || hierarchies as usize > bytes.len() / 4 {
        return Err(invalid_model(format!(
            "implausible hierarchy count {}",
            hierarchies
        )));
    }
    panic::catch_unwind(|| rustface::read_model(bytes))
        .unwrap_or_else(|_| Err(invalid_model("not a SeetaFace model")))
}

fn invalid_model(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.into())
}

impl FaceDetector for SeetaDetector {
    fn detect(&self, image: &DynamicImage) -> Result<Vec<FaceRect>, Error> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Ok(Vec::new());
        }
        let gray = image.to_luma8();

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_size);
        detector.set_score_thresh(self.score_threshold);
        detector.set_pyramid_scale_factor(self.pyramid_scale);
        detector.set_slide_window_step(SLIDE_WINDOW_STEP, SLIDE_WINDOW_STEP);

        let faces = detector.detect(&ImageData::new(gray.as_raw(), width, height));
        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRect::new(bbox.x(), bbox.y(), bbox.width(), bbox.height())
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn open_with_model(bytes: &[u8]) -> Result<SeetaDetector, Error> {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.bin");
        fs::write(&path, bytes).unwrap();
        SeetaDetector::open(&DetectorConfig::new(path))
    }

    #[test]
    fn garbage_header_is_a_model_load_error() {
        let err = open_with_model(&[0xFF; 8]).err().unwrap();
        assert!(err.is_model_load());
    }

    #[test]
    fn truncated_model_is_a_model_load_error() {
        assert!(open_with_model(&[]).err().unwrap().is_model_load());
        assert!(open_with_model(&[1, 0]).err().unwrap().is_model_load());
    }

    #[test]
    fn garbage_body_is_a_model_load_error() {
        let mut bytes = vec![1, 0, 0, 0];
        bytes.extend_from_slice(&[0xFF; 12]);
        let err = open_with_model(&bytes).err().unwrap();
        assert!(err.is_model_load());
    }

    #[test]
    fn cascade_xml_is_a_model_load_error() {
        let xml = b"<?xml version=\"1.0\"?>\n<opencv_storage>\n<cascade type_id=\"opencv-cascade-classifier\">\n</cascade>\n</opencv_storage>\n";
        let err = open_with_model(xml).err().unwrap();
        assert!(err.is_model_load());
    }
}
