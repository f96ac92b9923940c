use std::path::PathBuf;

use crate::{
    config::{check_thumbnail_size, CaptureConfig, WriteMode},
    detector::FaceDetector,
    loader::{Frame, FrameLoader},
    rect::FaceRect,
    select::{largest, prefix_maxima},
    thumbnail::ThumbnailWriter,
    Error,
};

/// What happened to one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub index: usize,
    /// Faces reported by the detector
    pub faces: usize,
    pub written: Vec<PathBuf>,
}

/// Totals for a whole run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    /// Frames that loaded and went through detection
    pub frames: usize,
    pub frames_with_faces: usize,
    pub thumbnails: usize,
}

/// Loads every frame of a directory, finds faces and writes the largest
/// face of each frame as a thumbnail.
#[derive(Debug)]
pub struct FaceCapture<D> {
    detector: D,
    loader: FrameLoader,
    writer: ThumbnailWriter,
    mode: WriteMode,
}

impl<D: FaceDetector> FaceCapture<D> {
    pub fn new(detector: D, config: &CaptureConfig) -> Self {
        Self {
            detector,
            loader: FrameLoader::new(config.input_dir.clone(), config.numbering),
            writer: ThumbnailWriter::new(
                config.output_root(),
                config.thumbnail_size,
                config.jpeg_quality,
            ),
            mode: config.mode,
        }
    }

    pub fn writer(&self) -> &ThumbnailWriter { &self.writer }

    /// Processes all frames in order.
    pub fn run(&self) -> Result<CaptureSummary, Error> {
        check_thumbnail_size(self.writer.size())?;
        log::info!(
            "capturing faces from {} into {}",
            self.loader.dir().display(),
            self.writer.root().display()
        );
        let frames = self.loader.load()?;

        let mut summary = CaptureSummary::default();
        for frame in &frames {
            if frame.is_empty() {
                log::warn!("no captured frame at {}, skipping", frame.path().display());
                continue;
            }
            let report = self.process_frame(frame)?;
            summary.frames += 1;
            if report.faces > 0 {
                summary.frames_with_faces += 1;
            }
            summary.thumbnails += report.written.len();
        }

        log::info!(
            "{} frame(s), {} with faces, {} thumbnail(s) written",
            summary.frames,
            summary.frames_with_faces,
            summary.thumbnails
        );
        Ok(summary)
    }

    /// Detects faces in `frame` and writes its thumbnails.
    ///
    /// The frame folder is only created once the frame has a face.
    pub fn process_frame(&self, frame: &Frame) -> Result<FrameReport, Error> {
        let faces = self.detector.detect(frame.image())?;
        log::debug!("frame {}: {} face(s)", frame.index(), faces.len());

        let mut report = FrameReport {
            index: frame.index(),
            faces: faces.len(),
            written: Vec::new(),
        };
        match self.mode {
            WriteMode::EveryPrefix => {
                for (iteration, biggest) in prefix_maxima(&faces).enumerate() {
                    if iteration == 0 {
                        self.writer.create_frame_dir(frame.index())?;
                    }
                    self.write(frame, iteration, biggest, &mut report)?;
                }
            },
            WriteMode::LargestOnly => {
                if let Some((iteration, biggest)) = largest(&faces) {
                    self.writer.create_frame_dir(frame.index())?;
                    self.write(frame, iteration, biggest, &mut report)?;
                }
            },
        }
        Ok(report)
    }

    fn write(
        &self,
        frame: &Frame,
        iteration: usize,
        face: FaceRect,
        report: &mut FrameReport,
    ) -> Result<(), Error> {
        match self
            .writer
            .write_crop(frame.index(), iteration, frame.image(), face)?
        {
            Some(path) => {
                log::debug!("wrote {}", path.display());
                report.written.push(path);
            },
            None => log::warn!(
                "frame {}: face {:?} lies outside the image, nothing written",
                frame.index(),
                face
            ),
        }
        Ok(())
    }
}
