use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{DynamicImage, GenericImageView};

use crate::{config::FrameNumbering, Error};

/// Extension a file needs to count as a frame.
pub const FRAME_EXTENSION: &str = "jpeg";

/// A decoded input frame.
#[derive(Clone, Debug)]
pub struct Frame {
    index: usize,
    path: PathBuf,
    image: DynamicImage,
}

impl Frame {
    pub const fn new(index: usize, path: PathBuf, image: DynamicImage) -> Self {
        Self { index, path, image }
    }

    /// The number this frame's thumbnails are filed under.
    pub const fn index(&self) -> usize { self.index }

    pub fn path(&self) -> &Path { &self.path }

    pub const fn image(&self) -> &DynamicImage { &self.image }

    pub fn is_empty(&self) -> bool {
        let (width, height) = self.image.dimensions();
        width == 0 || height == 0
    }
}

/// Reads `0.jpeg`, `1.jpeg`, … from a directory.
///
/// The number of frames tried is the number of `.jpeg` files present, so a
/// directory holding `0.jpeg` and `5.jpeg` only ever tries `0.jpeg` and
/// `1.jpeg`.
#[derive(Clone, Debug)]
pub struct FrameLoader {
    dir: PathBuf,
    numbering: FrameNumbering,
}

impl FrameLoader {
    pub fn new(dir: impl Into<PathBuf>, numbering: FrameNumbering) -> Self {
        Self {
            dir: dir.into(),
            numbering,
        }
    }

    pub fn dir(&self) -> &Path { &self.dir }

    /// Counts the `.jpeg` files in the directory.
    pub fn count(&self) -> Result<usize, Error> {
        let input_dir = |source| Error::InputDir {
            path: self.dir.clone(),
            source,
        };
        let mut count = 0;
        for entry in fs::read_dir(&self.dir).map_err(input_dir)? {
            let path = entry.map_err(input_dir)?.path();
            if path.is_file()
                && path.extension().map_or(false, |ext| ext == FRAME_EXTENSION)
            {
                count += 1;
            }
        }
        Ok(count)
    }

    pub fn frame_path(&self, number: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", number, FRAME_EXTENSION))
    }

    /// Decodes every frame that can be read, in file-number order.
    ///
    /// Unreadable frames are logged and left out.
    pub fn load(&self) -> Result<Vec<Frame>, Error> {
        let count = self.count()?;
        log::debug!("{} candidate frame(s) in {}", count, self.dir.display());

        let mut frames = Vec::with_capacity(count);
        for number in 0..count {
            let path = self.frame_path(number);
            let image = match image::open(&path) {
                Ok(image) => image,
                Err(e) => {
                    log::warn!("skipping frame {}: {}", path.display(), e);
                    continue;
                },
            };
            let index = match self.numbering {
                FrameNumbering::LoadOrder => frames.len(),
                FrameNumbering::FileName => number,
            };
            frames.push(Frame::new(index, path, image));
        }
        Ok(frames)
    }
}
