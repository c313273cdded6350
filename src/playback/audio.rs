// Background music that loops independently of the frame loop

use std::any::Any;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::AudioTrack;

/// Keeps a started track alive. Dropping it stops the music.
pub struct AudioGuard {
    inner: Option<Box<dyn Any>>,
}

impl AudioGuard {
    pub fn silent() -> Self {
        Self { inner: None }
    }

    pub fn new<T: 'static>(inner: T) -> Self {
        Self {
            inner: Some(Box::new(inner)),
        }
    }

    pub fn is_silent(&self) -> bool {
        self.inner.is_none()
    }
}

pub trait AudioBackend {
    /// Open the output device, load `path`, and start it on an endless loop
    /// at `volume` (0.0 to 1.0).
    fn play_looped(&mut self, path: &Path, volume: f32) -> Result<AudioGuard>;
}

/// Start the configured track, or nothing when music is disabled.
pub fn start_music(
    track: &AudioTrack,
    volume: f32,
    backend: &mut dyn AudioBackend,
) -> Result<AudioGuard> {
    let path = match track {
        AudioTrack::Disabled => return Ok(AudioGuard::silent()),
        AudioTrack::File(path) => path,
    };

    if !path.is_file() {
        return Err(load_error(path, "no such file"));
    }

    let volume = volume.clamp(0.0, 1.0);
    let guard = backend.play_looped(path, volume)?;
    log::info!("looping {} at volume {:.2}", path.display(), volume);
    Ok(guard)
}

pub(crate) fn load_error(path: &Path, reason: impl ToString) -> Error {
    Error::AudioLoad {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}

#[cfg(feature = "audio")]
pub use rodio_backend::RodioBackend;

#[cfg(feature = "audio")]
mod rodio_backend {
    use rodio::{Decoder, OutputStream, Sink, Source};
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use super::{AudioBackend, AudioGuard, load_error};
    use crate::error::Result;

    #[derive(Debug, Default)]
    pub struct RodioBackend;

    impl AudioBackend for RodioBackend {
        fn play_looped(&mut self, path: &Path, volume: f32) -> Result<AudioGuard> {
            let (stream, handle) = OutputStream::try_default().map_err(|e| load_error(path, e))?;
            let sink = Sink::try_new(&handle).map_err(|e| load_error(path, e))?;

            let file = File::open(path).map_err(|e| load_error(path, e))?;
            let source = Decoder::new(BufReader::new(file)).map_err(|e| load_error(path, e))?;

            sink.set_volume(volume);
            sink.append(source.repeat_infinite());
            sink.play();

            // The stream must outlive the sink or playback goes silent.
            Ok(AudioGuard::new((stream, sink)))
        }
    }
}

/// Stand-in used when the crate is built without the `audio` feature.
#[derive(Debug, Default)]
pub struct NoAudioBackend;

impl AudioBackend for NoAudioBackend {
    fn play_looped(&mut self, path: &Path, _volume: f32) -> Result<AudioGuard> {
        Err(load_error(
            path,
            "built without audio support (rebuild with the `audio` feature)",
        ))
    }
}

pub fn default_backend() -> Box<dyn AudioBackend> {
    #[cfg(feature = "audio")]
    {
        Box::new(RodioBackend)
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(NoAudioBackend)
    }
}
