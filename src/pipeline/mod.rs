pub mod downsample;
pub mod render;
pub mod source;

pub use downsample::{downsample, fit_within};
pub use render::{RenderOptions, decode_and_render, glyph_token, render_frame, render_frames};
pub use source::{AnimationSource, SourceFormat};
