// Library exports for gif2term

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod playback;

pub use error::{Error, Result};
pub use model::{FrameBuffer, GlyphStyle, PlaybackConfig, RenderedFrame};
pub use pipeline::{RenderOptions, decode_and_render};
pub use playback::{Player, StopSignal};
