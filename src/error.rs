// Error taxonomy shared by the renderer and the playback loop

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported or unreadable animation {}: {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    #[error("failed to decode frame {index}: {reason}")]
    Decode { index: usize, reason: String },

    #[error("no frames could be decoded from {}", .0.display())]
    EmptyBuffer(PathBuf),

    #[error("failed to load audio {}: {reason}", path.display())]
    AudioLoad { path: PathBuf, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
