/// Pixel dimensions of a rendered card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

/// The 1.91:1 size link previews expect.
pub const CANVAS: Canvas = Canvas {
    width: 1200,
    height: 630,
};
