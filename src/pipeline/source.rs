// Animation source opening and frame iteration

use image::codecs::gif::GifDecoder;
use image::codecs::png::PngDecoder;
use image::codecs::webp::WebPDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat, ImageResult};
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub type FrameIter<'a> = Box<dyn Iterator<Item = ImageResult<DynamicImage>> + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Gif,
    Png,
    WebP,
    /// Any other format the decoder knows; played as a single frame.
    Still(ImageFormat),
}

impl SourceFormat {
    pub fn detect(data: &[u8]) -> Option<Self> {
        let format = image::guess_format(data).ok()?;
        Some(match format {
            ImageFormat::Gif => SourceFormat::Gif,
            ImageFormat::Png => SourceFormat::Png,
            ImageFormat::WebP => SourceFormat::WebP,
            other => SourceFormat::Still(other),
        })
    }
}

/// An animation file loaded into memory, ready to be walked frame by frame.
pub struct AnimationSource {
    path: PathBuf,
    format: SourceFormat,
    data: Vec<u8>,
}

impl AnimationSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_path_buf()));
        }

        let data = fs::read(path)?;
        let format = SourceFormat::detect(&data).ok_or_else(|| Error::Format {
            path: path.to_path_buf(),
            reason: "not a recognised image format".to_string(),
        })?;

        log::debug!("opened {} as {:?} ({} bytes)", path.display(), format, data.len());

        Ok(Self {
            path: path.to_path_buf(),
            format,
            data,
        })
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Frames in source order, composited onto the full canvas.
    ///
    /// Fails only if the container header cannot be read; errors on
    /// individual frames are yielded by the iterator.
    pub fn frames(&self) -> Result<FrameIter<'_>> {
        self.open_frames().map_err(|e| Error::Format {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }

    fn open_frames(&self) -> ImageResult<FrameIter<'_>> {
        let reader = Cursor::new(self.data.as_slice());

        match self.format {
            SourceFormat::Gif => {
                let decoder = GifDecoder::new(reader)?;
                Ok(animated(decoder.into_frames()))
            }
            SourceFormat::Png => {
                let decoder = PngDecoder::new(reader)?;
                if decoder.is_apng()? {
                    Ok(animated(decoder.apng()?.into_frames()))
                } else {
                    self.still(ImageFormat::Png)
                }
            }
            SourceFormat::WebP => {
                let decoder = WebPDecoder::new(reader)?;
                if decoder.has_animation() {
                    Ok(animated(decoder.into_frames()))
                } else {
                    self.still(ImageFormat::WebP)
                }
            }
            SourceFormat::Still(format) => self.still(format),
        }
    }

    fn still(&self, format: ImageFormat) -> ImageResult<FrameIter<'_>> {
        let image = image::load_from_memory_with_format(&self.data, format)?;
        Ok(Box::new(std::iter::once(Ok(image))))
    }
}

fn animated<'a>(frames: image::Frames<'a>) -> FrameIter<'a> {
    Box::new(frames.map(|frame| frame.map(|f| DynamicImage::ImageRgba8(f.into_buffer()))))
}
