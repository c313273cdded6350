/// One animation frame rendered to printable terminal text.
///
/// `text` holds `height` rows, each terminated by `\n`, each row holding
/// `width` glyph tokens. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFrame {
    text: String,
    width: u32,
    height: u32,
}

impl RenderedFrame {
    pub(crate) fn new(text: String, width: u32, height: u32) -> Self {
        Self {
            text,
            width,
            height,
        }
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.text.lines()
    }
}

/// Pre-rendered frames of one animation, in source order.
///
/// Never empty, and every frame shares the same cell dimensions.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    frames: Vec<RenderedFrame>,
}

impl FrameBuffer {
    /// Returns `None` when there is nothing to play.
    pub fn new(frames: Vec<RenderedFrame>) -> Option<Self> {
        let first = frames.first()?;
        debug_assert!(
            frames
                .iter()
                .all(|f| f.width == first.width && f.height == first.height),
            "frames in one buffer must share dimensions"
        );
        Some(Self { frames })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    // A constructed buffer always holds at least one frame.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn get(&self, index: usize) -> Option<&RenderedFrame> {
        self.frames.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RenderedFrame> {
        self.frames.iter()
    }

    /// Cell dimensions shared by all frames.
    pub fn dimensions(&self) -> (u32, u32) {
        let first = &self.frames[0];
        (first.width, first.height)
    }
}

impl<'a> IntoIterator for &'a FrameBuffer {
    type Item = &'a RenderedFrame;
    type IntoIter = std::slice::Iter<'a, RenderedFrame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
