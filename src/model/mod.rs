pub mod frame;
pub mod glyph;
pub mod playback;

pub use frame::{FrameBuffer, RenderedFrame};
pub use glyph::GlyphStyle;
pub use playback::{AudioTrack, FrameDelay, PlaybackConfig, ResizeFilter, TargetSize};
