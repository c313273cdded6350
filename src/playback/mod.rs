// Endless frame loop with background music

pub mod audio;
pub mod screen;
pub mod timer;

use crossterm::{cursor::Show, execute};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::Result;
use crate::model::{AudioTrack, FrameBuffer, FrameDelay};

pub use audio::{AudioBackend, AudioGuard, default_backend, start_music};
pub use screen::{Screen, TerminalScreen};
pub use timer::{Sleeper, ThreadSleeper};

/// Shared flag that ends playback at the next frame boundary.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raise `stop` on Ctrl+C so playback unwinds through `Screen::leave`.
///
/// A second Ctrl+C before the loop reaches a frame boundary exits at once,
/// restoring the cursor first.
pub fn stop_on_interrupt(stop: &StopSignal) -> std::result::Result<(), ctrlc::Error> {
    let stop = stop.clone();
    ctrlc::set_handler(move || {
        if stop.is_stopped() {
            let _ = execute!(io::stdout(), Show);
            std::process::exit(130);
        }
        stop.stop();
    })
}

pub struct Player<S: Screen, T: Sleeper> {
    screen: S,
    sleeper: T,
    audio: Box<dyn AudioBackend>,
    stop: StopSignal,
}

impl<S: Screen, T: Sleeper> Player<S, T> {
    pub fn new(screen: S, sleeper: T, audio: Box<dyn AudioBackend>) -> Self {
        Self {
            screen,
            sleeper,
            audio,
            stop: StopSignal::new(),
        }
    }

    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Start the music, then cycle through `buffer` until stopped.
    ///
    /// A music failure aborts before anything is drawn. Without a stop
    /// request this never returns `Ok`.
    pub fn run(
        &mut self,
        buffer: &FrameBuffer,
        delay: FrameDelay,
        track: &AudioTrack,
        volume: f32,
    ) -> Result<()> {
        let _music = start_music(track, volume, self.audio.as_mut())?;

        self.screen.enter()?;
        let result = self.play_frames(buffer, delay);
        let restored = self.screen.leave();

        result?;
        restored?;
        Ok(())
    }

    fn play_frames(&mut self, buffer: &FrameBuffer, delay: FrameDelay) -> Result<()> {
        loop {
            if self.stop.is_stopped() {
                return Ok(());
            }
            self.screen.clear()?;

            for frame in buffer {
                if self.stop.is_stopped() {
                    return Ok(());
                }
                self.screen.present(frame.as_str())?;
                self.screen.clear()?;
                if !delay.is_zero() {
                    self.sleeper.sleep(delay.duration());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::RenderedFrame;
    use crate::playback::screen::SharedOutput;
    use std::cell::RefCell;
    use std::io;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        MusicStarted(PathBuf, f32),
        Enter,
        Clear,
        Present(String),
        Sleep(Duration),
        Leave,
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    /// Records everything and raises the stop signal after `limit` frames.
    struct CaptureScreen {
        log: Log,
        stop: StopSignal,
        presented: usize,
        limit: usize,
    }

    impl Screen for CaptureScreen {
        fn clear(&mut self) -> io::Result<()> {
            self.log.borrow_mut().push(Event::Clear);
            Ok(())
        }

        fn present(&mut self, frame: &str) -> io::Result<()> {
            self.log.borrow_mut().push(Event::Present(frame.to_string()));
            self.presented += 1;
            if self.presented >= self.limit {
                self.stop.stop();
            }
            Ok(())
        }

        fn enter(&mut self) -> io::Result<()> {
            self.log.borrow_mut().push(Event::Enter);
            Ok(())
        }

        fn leave(&mut self) -> io::Result<()> {
            self.log.borrow_mut().push(Event::Leave);
            Ok(())
        }
    }

    struct FakeSleeper(Log);

    impl Sleeper for FakeSleeper {
        fn sleep(&mut self, duration: Duration) {
            self.0.borrow_mut().push(Event::Sleep(duration));
        }
    }

    struct FakeAudio {
        log: Log,
        fail: bool,
    }

    impl AudioBackend for FakeAudio {
        fn play_looped(&mut self, path: &Path, volume: f32) -> Result<AudioGuard> {
            if self.fail {
                return Err(audio::load_error(path, "no output device"));
            }
            self.log
                .borrow_mut()
                .push(Event::MusicStarted(path.to_path_buf(), volume));
            Ok(AudioGuard::new(()))
        }
    }

    fn buffer(tags: &[&str]) -> FrameBuffer {
        let frames = tags
            .iter()
            .map(|t| RenderedFrame::new(format!("{t}{t}\n{t}{t}\n"), 2, 2))
            .collect();
        FrameBuffer::new(frames).unwrap()
    }

    fn player(limit: usize, fail_audio: bool) -> (Player<CaptureScreen, FakeSleeper>, Log) {
        let log: Log = Rc::default();
        let stop = StopSignal::new();
        let screen = CaptureScreen {
            log: log.clone(),
            stop: stop.clone(),
            presented: 0,
            limit,
        };
        let audio = FakeAudio {
            log: log.clone(),
            fail: fail_audio,
        };
        let player =
            Player::new(screen, FakeSleeper(log.clone()), Box::new(audio)).with_stop_signal(stop);
        (player, log)
    }

    fn presented(log: &Log) -> Vec<String> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Present(f) => Some(f[..1].to_string()),
                _ => None,
            })
            .collect()
    }

    fn sleeps(log: &Log) -> Vec<Duration> {
        log.borrow()
            .iter()
            .filter_map(|e| match e {
                Event::Sleep(d) => Some(*d),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frames_cycle_in_order() {
        let (mut player, log) = player(7, false);
        let delay = FrameDelay::from_secs(0.1).unwrap();

        player
            .run(&buffer(&["a", "b", "c"]), delay, &AudioTrack::Disabled, 0.15)
            .unwrap();

        assert_eq!(presented(&log), vec!["a", "b", "c", "a", "b", "c", "a"]);
        let waits = sleeps(&log);
        assert_eq!(waits.len(), 7);
        assert!(waits.iter().all(|d| *d == Duration::from_secs_f64(0.1)));
    }

    #[test]
    fn test_each_frame_is_followed_by_clear_then_sleep() {
        let (mut player, log) = player(2, false);
        let delay = FrameDelay::from_secs(0.5).unwrap();

        player
            .run(&buffer(&["a", "b"]), delay, &AudioTrack::Disabled, 0.15)
            .unwrap();

        let half = Duration::from_millis(500);
        assert_eq!(
            *log.borrow(),
            vec![
                Event::Enter,
                Event::Clear,
                Event::Present("aa\naa\n".into()),
                Event::Clear,
                Event::Sleep(half),
                Event::Present("bb\nbb\n".into()),
                Event::Clear,
                Event::Sleep(half),
                Event::Leave,
            ]
        );
    }

    #[test]
    fn test_zero_delay_never_sleeps() {
        let (mut player, log) = player(10, false);

        player
            .run(
                &buffer(&["a", "b", "c"]),
                FrameDelay::default(),
                &AudioTrack::Disabled,
                0.15,
            )
            .unwrap();

        assert_eq!(presented(&log).len(), 10);
        assert!(sleeps(&log).is_empty());
    }

    #[test]
    fn test_music_starts_once_before_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("theme.mp3");
        std::fs::write(&song, b"ID3").unwrap();

        let (mut player, log) = player(4, false);
        player
            .run(
                &buffer(&["a", "b"]),
                FrameDelay::default(),
                &AudioTrack::File(song.clone()),
                0.15,
            )
            .unwrap();

        let events = log.borrow();
        assert_eq!(events[0], Event::MusicStarted(song, 0.15));
        let starts = events
            .iter()
            .filter(|e| matches!(e, Event::MusicStarted(..)))
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_music_failure_aborts_before_display() {
        let dir = tempfile::tempdir().unwrap();
        let song = dir.path().join("theme.mp3");
        std::fs::write(&song, b"ID3").unwrap();

        let (mut player, log) = player(4, true);
        let result = player.run(
            &buffer(&["a"]),
            FrameDelay::default(),
            &AudioTrack::File(song),
            0.15,
        );

        assert!(matches!(result, Err(Error::AudioLoad { .. })));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_stop_before_start_draws_nothing() {
        let (mut player, log) = player(1, false);
        player.stop_signal().stop();

        player
            .run(&buffer(&["a"]), FrameDelay::default(), &AudioTrack::Disabled, 0.15)
            .unwrap();

        assert!(presented(&log).is_empty());
        assert_eq!(*log.borrow(), vec![Event::Enter, Event::Leave]);
    }

    #[test]
    fn test_stop_signal_is_shared() {
        let stop = StopSignal::new();
        let other = stop.clone();
        assert!(!other.is_stopped());
        stop.stop();
        assert!(other.is_stopped());
    }

    /// Raises the stop signal the way the Ctrl+C handler does, mid-sleep.
    struct InterruptingSleeper {
        stop: StopSignal,
        after: usize,
        slept: usize,
    }

    impl Sleeper for InterruptingSleeper {
        fn sleep(&mut self, _duration: Duration) {
            self.slept += 1;
            if self.slept >= self.after {
                self.stop.stop();
            }
        }
    }

    #[test]
    fn test_interrupt_restores_cursor() {
        let out = SharedOutput::default();
        let stop = StopSignal::new();
        let sleeper = InterruptingSleeper {
            stop: stop.clone(),
            after: 4,
            slept: 0,
        };
        let mut player = Player::new(
            TerminalScreen::new(out.clone(), true),
            sleeper,
            audio::default_backend(),
        )
        .with_stop_signal(stop);

        player
            .run(
                &buffer(&["a", "b", "c"]),
                FrameDelay::from_secs(0.05).unwrap(),
                &AudioTrack::Disabled,
                0.15,
            )
            .unwrap();

        let text = out.contents();
        let hide = text.find("\x1b[?25l").unwrap();
        let show = text.rfind("\x1b[?25h").unwrap();
        assert!(hide < show);
        assert_eq!(text.matches("aa\naa\n").count(), 2);
        assert_eq!(text.matches("bb\nbb\n").count(), 1);
        assert_eq!(text.matches("cc\ncc\n").count(), 1);
        assert!(text.ends_with("\x1b[?25h"));
    }
}
