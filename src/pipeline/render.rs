// Frame-to-text rendering and the decode-and-render pipeline

use image::{DynamicImage, RgbImage};
use rayon::prelude::*;
use std::fmt::{Display, Write};
use std::path::Path;

use super::downsample::downsample;
use super::source::AnimationSource;
use crate::error::{Error, Result};
use crate::model::{FrameBuffer, GlyphStyle, RenderedFrame, ResizeFilter, TargetSize};

pub const RESET: &str = "\x1b[0m";

/// A stream that fails this many times in a row is treated as exhausted.
pub const MAX_CONSECUTIVE_FAILURES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub target: TargetSize,
    pub glyph: GlyphStyle,
    pub filter: ResizeFilter,
}

impl RenderOptions {
    pub fn new(target: TargetSize) -> Self {
        Self {
            target,
            glyph: GlyphStyle::default(),
            filter: ResizeFilter::default(),
        }
    }

    pub fn with_glyph(mut self, glyph: GlyphStyle) -> Self {
        self.glyph = glyph;
        self
    }

    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }
}

/// Append one cell: background set to the pixel color, the glyph padded by
/// a space on each side, then a reset.
pub fn push_glyph_token(out: &mut String, [r, g, b]: [u8; 3], glyph: char) {
    let _ = write!(out, "\x1b[48;2;{r};{g};{b}m {glyph} {RESET}");
}

pub fn glyph_token(rgb: [u8; 3], glyph: GlyphStyle) -> String {
    let mut out = String::new();
    push_glyph_token(&mut out, rgb, glyph.glyph());
    out
}

/// Render an already downsampled grid, rows top to bottom, each ending in `\n`.
pub fn render_image(image: &RgbImage, glyph: GlyphStyle) -> RenderedFrame {
    let glyph = glyph.glyph();
    let (width, height) = image.dimensions();
    // "\x1b[48;2;255;255;255m" + " x " + "\x1b[0m" is at most 30 bytes
    let mut text = String::with_capacity((width as usize * 30 + 1) * height as usize);

    for row in image.rows() {
        for pixel in row {
            push_glyph_token(&mut text, pixel.0, glyph);
        }
        text.push('\n');
    }

    RenderedFrame::new(text, width, height)
}

pub fn render_frame(frame: &DynamicImage, options: &RenderOptions) -> RenderedFrame {
    let small = downsample(frame, options.target, options.filter);
    render_image(&small, options.glyph)
}

/// Render every frame the iterator yields, skipping the ones that fail.
///
/// Decoding stays sequential; downsampling and text generation run on the
/// rayon pool in batches so only a handful of full-size frames are alive at
/// once. Output keeps source order.
pub fn render_frames<I, E>(frames: I, options: &RenderOptions) -> Vec<RenderedFrame>
where
    I: IntoIterator<Item = std::result::Result<DynamicImage, E>>,
    E: Display,
{
    let batch_size = rayon::current_num_threads().max(1) * 2;
    let mut pending: Vec<DynamicImage> = Vec::with_capacity(batch_size);
    let mut rendered = Vec::new();
    let mut skipped = 0;
    let mut consecutive_failures = 0;

    for (index, frame) in frames.into_iter().enumerate() {
        match frame {
            Ok(image) => {
                consecutive_failures = 0;
                pending.push(image);
                if pending.len() == batch_size {
                    render_batch(&pending, options, &mut rendered);
                    pending.clear();
                }
            }
            Err(e) => {
                let err = Error::Decode {
                    index,
                    reason: e.to_string(),
                };
                log::warn!("skipping: {}", err);
                skipped += 1;
                consecutive_failures += 1;
                if consecutive_failures >= MAX_CONSECUTIVE_FAILURES {
                    log::warn!(
                        "giving up after {} consecutive frame failures",
                        consecutive_failures
                    );
                    break;
                }
            }
        }
    }
    render_batch(&pending, options, &mut rendered);

    log::info!("rendered {} frames, skipped {}", rendered.len(), skipped);
    rendered
}

fn render_batch(batch: &[DynamicImage], options: &RenderOptions, out: &mut Vec<RenderedFrame>) {
    let frames: Vec<RenderedFrame> = batch
        .par_iter()
        .map(|frame| render_frame(frame, options))
        .collect();
    out.extend(frames);
}

/// Decode the animation at `path` and pre-render every frame.
pub fn decode_and_render(path: &Path, options: &RenderOptions) -> Result<FrameBuffer> {
    let source = AnimationSource::open(path)?;
    let frames = render_frames(source.frames()?, options);

    let buffer = FrameBuffer::new(frames).ok_or_else(|| Error::EmptyBuffer(path.to_path_buf()))?;
    let (w, h) = buffer.dimensions();
    log::info!(
        "{} ({:?}): {} frames at {}x{} cells",
        path.display(),
        source.format(),
        buffer.len(),
        w,
        h
    );
    Ok(buffer)
}
