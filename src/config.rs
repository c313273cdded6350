use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::model::playback::DEFAULT_VOLUME;
use crate::model::{AudioTrack, GlyphStyle, PlaybackConfig, ResizeFilter, TargetSize};

/// Optional per-user defaults, read from `config.toml`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub glyph: GlyphStyle,
    pub volume: f32,
    pub filter: ResizeFilter,
    pub hide_cursor: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glyph: GlyphStyle::default(),
            volume: DEFAULT_VOLUME,
            filter: ResizeFilter::default(),
            hide_cursor: true,
        }
    }
}

impl Settings {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gif2term").join("config.toml"))
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    pub fn from_toml_str(s: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_toml_str(&content)
            .map_err(|e| Error::Configuration(format!("{}: {}", path.display(), e.message())))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read `explicit` if given, else the default file if it exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("reading settings from {}", path.display());
                Self::load_from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(Error::Configuration(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

/// Merge the command line over the settings file. Flags win.
pub fn build_config(cli: &Cli) -> Result<PlaybackConfig> {
    let settings = Settings::load(cli.config.as_deref())?;
    merge(cli, settings)
}

fn merge(cli: &Cli, settings: Settings) -> Result<PlaybackConfig> {
    Ok(PlaybackConfig {
        source: cli.gif_path.clone(),
        audio: AudioTrack::parse(&cli.music),
        delay: cli.delay,
        target: TargetSize::new(cli.width, cli.height)?,
        glyph: cli.glyph.unwrap_or(settings.glyph),
        filter: cli.filter.unwrap_or(settings.filter),
        volume: cli.volume.unwrap_or(settings.volume),
        hide_cursor: settings.hide_cursor && !cli.keep_cursor,
    })
}
