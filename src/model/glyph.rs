use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Character drawn inside every colored cell.
///
/// The cell background carries the pixel color, so the default is a plain
/// space; the other styles overlay a foreground glyph in the terminal's
/// default text color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GlyphStyle {
    #[default]
    Space,
    Block,
    Shade,
    Dot,
}

impl GlyphStyle {
    pub fn glyph(self) -> char {
        match self {
            GlyphStyle::Space => ' ',
            GlyphStyle::Block => '█',
            GlyphStyle::Shade => '░',
            GlyphStyle::Dot => '·',
        }
    }
}
