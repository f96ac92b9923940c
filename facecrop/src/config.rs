use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where the detector model is looked up when none is given.
pub const DEFAULT_MODEL_PATH: &str = "model/seeta_fd_frontal_v1.0.bin";

/// Folder created under the input directory to hold thumbnails.
pub const OUTPUT_DIR_NAME: &str = "OUTPUT";

pub const DEFAULT_THUMBNAIL_SIZE: u32 = 128;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Pyramid shrink ratios SeetaFace accepts.
const MIN_PYRAMID_SCALE: f32 = 0.01;
const MAX_PYRAMID_SCALE: f32 = 0.99;

/// Parameters handed to a detector backend when it is opened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DetectorConfig {
    pub model_path: PathBuf,
    /// Growth between two pyramid levels, from about 1.0101 up to 100
    pub scale_factor: f32,
    /// Overlapping hits a candidate needs to be kept, where supported
    pub min_neighbors: u32,
    /// Smallest face side in pixels
    pub min_size: u32,
    pub score_threshold: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self { Self::new(DEFAULT_MODEL_PATH) }
}

impl DetectorConfig {
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            scale_factor: 1.1,
            min_neighbors: 2,
            min_size: 20,
            score_threshold: 2.0,
        }
    }

    /// Set the Current `scale_factor` arg
    pub const fn set_scale_factor(mut self, scale_factor: f32) -> Self {
        self.scale_factor = scale_factor;
        self
    }

    /// Set the Current `min_neighbors` arg
    pub const fn set_min_neighbors(mut self, min_neighbors: u32) -> Self {
        self.min_neighbors = min_neighbors;
        self
    }

    /// Set the Current `min_size` arg
    pub const fn set_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size;
        self
    }

    /// Set the Current `score_threshold` arg
    pub const fn set_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    /// Shrink ratio between two pyramid levels, the inverse of
    /// `scale_factor`.
    pub fn pyramid_scale(&self) -> f32 { 1.0 / self.scale_factor }

    /// Rejects values the backends would otherwise panic on.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.min_size < 20 {
            return Err(crate::Error::InvalidConfig(format!(
                "min size must be at least 20, got {}",
                self.min_size
            )));
        }
        let pyramid_scale = self.pyramid_scale();
        if !(MIN_PYRAMID_SCALE..=MAX_PYRAMID_SCALE).contains(&pyramid_scale) {
            return Err(crate::Error::InvalidConfig(format!(
                "scale factor must be between {:.4} and {}, got {}",
                1.0 / MAX_PYRAMID_SCALE,
                1.0 / MIN_PYRAMID_SCALE,
                self.scale_factor
            )));
        }
        if !(self.score_threshold > 0.0) {
            return Err(crate::Error::InvalidConfig(format!(
                "score threshold must be positive, got {}",
                self.score_threshold
            )));
        }
        Ok(())
    }
}

/// How a loaded frame is numbered in the output tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum FrameNumbering {
    /// Position among the frames that loaded; unreadable files shift later
    /// frames down.
    LoadOrder,
    /// The number in the frame's file name.
    FileName,
}

impl Default for FrameNumbering {
    fn default() -> Self { Self::LoadOrder }
}

/// Which thumbnails are written for a frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WriteMode {
    /// One file per detected face, `k.jpeg` holding the largest face among
    /// the first `k + 1`.
    EveryPrefix,
    /// A single file holding the largest face, named by its detector index.
    LargestOnly,
}

impl Default for WriteMode {
    fn default() -> Self { Self::EveryPrefix }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    pub input_dir: PathBuf,
    /// Defaults to `<input_dir>/OUTPUT`
    pub output_dir: Option<PathBuf>,
    pub numbering: FrameNumbering,
    pub mode: WriteMode,
    pub thumbnail_size: u32,
    pub jpeg_quality: u8,
}

impl CaptureConfig {
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: None,
            numbering: FrameNumbering::default(),
            mode: WriteMode::default(),
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the Current `output_dir` arg
    pub fn set_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(output_dir.into());
        self
    }

    /// Set the Current `numbering` arg
    pub const fn set_numbering(mut self, numbering: FrameNumbering) -> Self {
        self.numbering = numbering;
        self
    }

    /// Set the Current `mode` arg
    pub const fn set_mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the Current `thumbnail_size` arg
    pub const fn set_thumbnail_size(mut self, thumbnail_size: u32) -> Self {
        self.thumbnail_size = thumbnail_size;
        self
    }

    /// Set the Current `jpeg_quality` arg
    pub const fn set_jpeg_quality(mut self, jpeg_quality: u8) -> Self {
        self.jpeg_quality = jpeg_quality;
        self
    }

    pub fn validate(&self) -> Result<(), crate::Error> {
        check_thumbnail_size(self.thumbnail_size)
    }

    /// The directory the per-frame folders are created in.
    pub fn output_root(&self) -> PathBuf {
        match &self.output_dir {
            Some(dir) => dir.clone(),
            None => default_output_root(&self.input_dir),
        }
    }
}

pub(crate) fn check_thumbnail_size(size: u32) -> Result<(), crate::Error> {
    if size == 0 {
        return Err(crate::Error::InvalidConfig(
            "thumbnail size must be at least 1 pixel".to_owned(),
        ));
    }
    Ok(())
}

fn default_output_root(input_dir: &Path) -> PathBuf { input_dir.join(OUTPUT_DIR_NAME) }

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detector_defaults_match_cascade_parameters() {
        let config = DetectorConfig::default();
        assert_eq!(config.model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!((config.scale_factor - 1.1).abs() < f32::EPSILON);
        assert_eq!(config.min_neighbors, 2);
        assert_eq!(config.min_size, 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_parameters_backends_cannot_take() {
        assert!(DetectorConfig::default().set_min_size(19).validate().is_err());
        assert!(DetectorConfig::default().set_scale_factor(1.0).validate().is_err());
        assert!(DetectorConfig::default()
            .set_scale_factor(1.005)
            .validate()
            .is_err());
        assert!(DetectorConfig::default()
            .set_scale_factor(100.5)
            .validate()
            .is_err());
        assert!(DetectorConfig::default()
            .set_scale_factor(f32::NAN)
            .validate()
            .is_err());
        assert!(DetectorConfig::default()
            .set_score_threshold(0.0)
            .validate()
            .is_err());
    }

    #[test]
    fn accepts_the_edges_of_the_pyramid_range() {
        assert!(DetectorConfig::default()
            .set_scale_factor(1.011)
            .validate()
            .is_ok());
        assert!(DetectorConfig::default()
            .set_scale_factor(99.0)
            .validate()
            .is_ok());
    }

    const fn tuned_detector(config: DetectorConfig) -> DetectorConfig {
        config
            .set_scale_factor(1.2)
            .set_min_neighbors(3)
            .set_min_size(24)
            .set_score_threshold(1.5)
    }

    const fn tuned_capture(config: CaptureConfig) -> CaptureConfig {
        config
            .set_numbering(FrameNumbering::FileName)
            .set_mode(WriteMode::LargestOnly)
            .set_thumbnail_size(64)
            .set_jpeg_quality(80)
    }

    #[test]
    fn setters_chain_in_const_context() {
        let detector = tuned_detector(DetectorConfig::default());
        assert_eq!(detector.min_neighbors, 3);
        assert_eq!(detector.min_size, 24);
        assert!(detector.validate().is_ok());

        let capture = tuned_capture(CaptureConfig::new("frames"));
        assert_eq!(capture.numbering, FrameNumbering::FileName);
        assert_eq!(capture.mode, WriteMode::LargestOnly);
        assert_eq!(capture.thumbnail_size, 64);
        assert_eq!(capture.jpeg_quality, 80);
    }

    #[test]
    fn zero_sized_thumbnails_are_rejected() {
        assert!(CaptureConfig::new("frames").validate().is_ok());
        let err = CaptureConfig::new("frames")
            .set_thumbnail_size(0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, crate::Error::InvalidConfig(_)));
    }

    #[test]
    fn output_root_defaults_under_input() {
        let config = CaptureConfig::new("frames");
        assert_eq!(config.output_root(), Path::new("frames").join("OUTPUT"));

        let config = config.set_output_dir("elsewhere");
        assert_eq!(config.output_root(), PathBuf::from("elsewhere"));
    }
}
