use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{
    codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage,
    GenericImageView,
};

use crate::{rect::FaceRect, Error};

/// Crops `image` to `rect` and resizes the crop to `size` × `size` with
/// linear interpolation.
///
/// `rect` is clamped to the image first; `None` if it misses the image.
pub fn crop_and_resize(
    image: &DynamicImage,
    rect: FaceRect,
    size: u32,
) -> Option<DynamicImage> {
    let (width, height) = image.dimensions();
    let roi = rect.clamp_to(width, height)?;
    let crop = image.crop_imm(roi.x as u32, roi.y as u32, roi.width, roi.height);
    Some(crop.resize_exact(size, size, FilterType::Triangle))
}

/// Encodes `image` as an RGB baseline JPEG.
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>, Error> {
    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, quality);
    encoder.encode_image(&image.to_rgb8())?;
    Ok(buffer)
}

/// Files thumbnails under `<root>/<frame>/<iteration>.jpeg`.
#[derive(Clone, Debug)]
pub struct ThumbnailWriter {
    root: PathBuf,
    size: u32,
    quality: u8,
}

impl ThumbnailWriter {
    pub fn new(root: impl Into<PathBuf>, size: u32, quality: u8) -> Self {
        Self {
            root: root.into(),
            size,
            quality: quality.clamp(1, 100),
        }
    }

    pub fn root(&self) -> &Path { &self.root }

    pub const fn size(&self) -> u32 { self.size }

    pub fn frame_dir(&self, frame: usize) -> PathBuf {
        self.root.join(frame.to_string())
    }

    pub fn thumbnail_path(&self, frame: usize, iteration: usize) -> PathBuf {
        self.frame_dir(frame).join(format!("{}.jpeg", iteration))
    }

    /// Creates the folder for `frame` along with any missing parents.
    pub fn create_frame_dir(&self, frame: usize) -> Result<PathBuf, Error> {
        let dir = self.frame_dir(frame);
        fs::create_dir_all(&dir).map_err(|source| Error::Write {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Writes an already resized thumbnail, replacing any previous file.
    pub fn write(
        &self,
        frame: usize,
        iteration: usize,
        thumbnail: &DynamicImage,
    ) -> Result<PathBuf, Error> {
        let path = self.thumbnail_path(frame, iteration);
        let bytes = encode_jpeg(thumbnail, self.quality)?;
        fs::write(&path, bytes).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Crops `rect` out of `image`, resizes it and writes it.
    ///
    /// `Ok(None)` when `rect` lies entirely outside the image.
    pub fn write_crop(
        &self,
        frame: usize,
        iteration: usize,
        image: &DynamicImage,
        rect: FaceRect,
    ) -> Result<Option<PathBuf>, Error> {
        match crop_and_resize(image, rect, self.size) {
            Some(thumbnail) => self.write(frame, iteration, &thumbnail).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};

    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 3) as u8, (y * 5) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn thumbnails_are_square_at_requested_size() {
        let image = gradient(200, 150);
        let thumb = crop_and_resize(&image, FaceRect::new(10, 20, 40, 60), 128)
            .unwrap();
        assert_eq!(thumb.dimensions(), (128, 128));
    }

    #[test]
    fn off_frame_rects_are_clamped_or_dropped() {
        let image = gradient(100, 100);
        assert!(crop_and_resize(&image, FaceRect::new(-10, 90, 40, 40), 32).is_some());
        assert!(crop_and_resize(&image, FaceRect::new(100, 0, 40, 40), 32).is_none());
    }

    #[test]
    fn jpeg_encoding_is_deterministic() {
        let image = gradient(64, 64);
        let first = encode_jpeg(&image, 95).unwrap();
        assert_eq!(&first[..2], &[0xFF, 0xD8]);
        assert_eq!(first, encode_jpeg(&image, 95).unwrap());
    }

    #[test]
    fn paths_follow_frame_then_iteration() {
        let writer = ThumbnailWriter::new("out", 128, 95);
        assert_eq!(
            writer.thumbnail_path(3, 1),
            Path::new("out").join("3").join("1.jpeg")
        );
    }
}
