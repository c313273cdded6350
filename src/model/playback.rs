use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

use super::glyph::GlyphStyle;

/// Keyword that turns background music off. Matched case-insensitively.
pub const AUDIO_DISABLED: &str = "NONE";

pub const DEFAULT_VOLUME: f32 = 0.15;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AudioTrack {
    Disabled,
    File(PathBuf),
}

impl AudioTrack {
    pub fn parse(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case(AUDIO_DISABLED) {
            AudioTrack::Disabled
        } else {
            AudioTrack::File(PathBuf::from(arg))
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, AudioTrack::Disabled)
    }
}

/// Pause between frames. Zero means no pause at all.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameDelay(Duration);

impl FrameDelay {
    pub fn from_secs(secs: f64) -> Result<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(Error::Configuration(format!(
                "frame delay must be a non-negative number of seconds, got {secs}"
            )));
        }
        Duration::try_from_secs_f64(secs)
            .map(Self)
            .map_err(|e| Error::Configuration(format!("frame delay {secs}: {e}")))
    }

    #[inline]
    pub fn duration(&self) -> Duration {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

/// Bounding box, in cells, a frame is shrunk to fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::Configuration(format!(
                "target size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

/// Everything needed to render and play one animation. Built once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackConfig {
    pub source: PathBuf,
    pub audio: AudioTrack,
    pub delay: FrameDelay,
    pub target: TargetSize,
    pub glyph: GlyphStyle,
    pub filter: ResizeFilter,
    pub volume: f32,
    pub hide_cursor: bool,
}

/// Resampling filter used when shrinking frames. Bicubic (Catmull-Rom) by default.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeFilter {
    Nearest,
    Triangle,
    #[default]
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResizeFilter> for image::imageops::FilterType {
    fn from(filter: ResizeFilter) -> Self {
        use image::imageops::FilterType;
        match filter {
            ResizeFilter::Nearest => FilterType::Nearest,
            ResizeFilter::Triangle => FilterType::Triangle,
            ResizeFilter::CatmullRom => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}
