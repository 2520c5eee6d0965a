//! Editor geometry.

/// Axis-aligned rectangle in logical pixels, relative to the editor's
/// native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bounds {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl Bounds {
    /// Rectangle with the given origin and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Rectangle at the origin covering `width` x `height`.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Whether the rectangle covers no area.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    /// Background used when the config does not name one.
    pub const DEFAULT_BACKGROUND: Self = Self(26, 26, 31, 255);
}

impl Default for Rgba {
    fn default() -> Self {
        Self::DEFAULT_BACKGROUND
    }
}

/// Minimal drawing surface handed to [`EditorSurface::paint`](crate::EditorSurface::paint).
pub trait Canvas {
    /// Fill `bounds` with a solid colour.
    fn fill_rect(&mut self, bounds: Bounds, colour: Rgba);
}
