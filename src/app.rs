use anyhow::{Context, Result};

use crate::model::PlaybackConfig;
use crate::pipeline::{RenderOptions, decode_and_render};
use crate::playback::{
    Player, StopSignal, TerminalScreen, ThreadSleeper, default_backend, stop_on_interrupt,
};

pub struct App {
    pub config: PlaybackConfig,
    stop: StopSignal,
}

impl App {
    pub fn new(config: PlaybackConfig) -> Self {
        Self {
            config,
            stop: StopSignal::new(),
        }
    }

    /// Handle that ends playback at the next frame boundary.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new(self.config.target)
            .with_glyph(self.config.glyph)
            .with_filter(self.config.filter)
    }

    pub fn run(&mut self) -> Result<()> {
        stop_on_interrupt(&self.stop).context("failed to install the Ctrl+C handler")?;

        let mut screen = TerminalScreen::stdout(self.config.hide_cursor);
        screen.reset().context("failed to clear the terminal")?;
        screen.notice("Please, wait..")?;

        let buffer = decode_and_render(&self.config.source, &self.render_options())?;
        if self.stop.is_stopped() {
            return Ok(());
        }

        let mut player = Player::new(screen, ThreadSleeper, default_backend())
            .with_stop_signal(self.stop.clone());
        player.run(
            &buffer,
            self.config.delay,
            &self.config.audio,
            self.config.volume,
        )?;
        Ok(())
    }
}
