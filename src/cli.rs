use clap::{ArgAction, Parser};
use log::LevelFilter;
use std::path::PathBuf;

use crate::model::{FrameDelay, GlyphStyle, ResizeFilter};

#[derive(Parser, Debug)]
#[command(
    name = "gif2term",
    version,
    about = "Show a .gif file in the terminal",
    allow_negative_numbers = true
)]
pub struct Cli {
    #[arg(help = "Path to the GIF file", value_name = "GIF_PATH")]
    pub gif_path: PathBuf,

    #[arg(
        help = "Path to a music file, or NONE to play without music",
        value_name = "MUSIC"
    )]
    pub music: String,

    #[arg(
        help = "Delay between frames in seconds",
        value_name = "DELAY",
        value_parser = parse_delay
    )]
    pub delay: FrameDelay,

    #[arg(
        help = "Maximum width in cells",
        value_name = "WIDTH",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub width: u32,

    #[arg(
        help = "Maximum height in cells",
        value_name = "HEIGHT",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub height: u32,

    #[arg(help = "Character drawn in each cell", long, value_enum)]
    pub glyph: Option<GlyphStyle>,

    #[arg(help = "Music volume from 0.0 to 1.0", long, value_parser = parse_volume)]
    pub volume: Option<f32>,

    #[arg(help = "Resampling filter used when shrinking frames", long, value_enum)]
    pub filter: Option<ResizeFilter>,

    #[arg(help = "Settings file to read instead of the default", long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(help = "Leave the terminal cursor visible during playback", long)]
    pub keep_cursor: bool,

    #[arg(help = "More log output (repeatable)", short, long, action = ArgAction::Count)]
    pub verbose: u8,

    #[arg(help = "Only log errors", short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            _ => LevelFilter::Debug,
        }
    }
}

fn parse_delay(s: &str) -> Result<FrameDelay, String> {
    let secs: f64 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    FrameDelay::from_secs(secs).map_err(|e| e.to_string())
}

pub(crate) fn parse_volume(s: &str) -> Result<f32, String> {
    let volume: f32 = s.parse().map_err(|_| format!("`{s}` is not a number"))?;
    if !(0.0..=1.0).contains(&volume) {
        return Err(format!("volume must be between 0.0 and 1.0, got {volume}"));
    }
    Ok(volume)
}
