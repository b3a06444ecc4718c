// Core types shared by the loader, the renderer and the viewer.

use image::RgbaImage;
use serde::Deserialize;

#[derive(Clone, Debug, PartialEq)]
pub struct FrameBuffer {
    pub width: usize,      // bitmap width (pixels), not the displayed width
    pub height: usize,     // bitmap height (pixels)
    pub pixels: Vec<u32>,  // each entry is 0x00RRGGBB for minifb
}

impl FrameBuffer {
    /// A cleared (all-zero) bitmap.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

/// A position in bitmap coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// One configured hidden image: where to load it from and where to paint it.
/// Missing fields (or zero sizes) fall back to 0/0/natural width/natural height.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct HiddenImageSpec {
    pub src: String,
    #[serde(default)]
    pub left: Option<f32>,
    #[serde(default)]
    pub top: Option<f32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl HiddenImageSpec {
    pub fn new(src: impl Into<String>) -> Self {
        Self { src: src.into(), ..Self::default() }
    }

    /// Resolve the placement rectangle against the decoded image's natural size.
    pub fn placement(&self, natural_width: u32, natural_height: u32) -> Placement {
        Placement {
            left: self.left.unwrap_or(0.0),
            top: self.top.unwrap_or(0.0),
            width: self.width.filter(|w| *w > 0).unwrap_or(natural_width),
            height: self.height.filter(|h| *h > 0).unwrap_or(natural_height),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub left: f32,
    pub top: f32,
    pub width: u32,
    pub height: u32,
}

/// A hidden image that made it through loading, ready to paint.
/// `image` is already resampled to `placement.width x placement.height`.
#[derive(Clone, Debug)]
pub struct HiddenImage {
    pub index: usize, // position in the configured list = paint order
    pub placement: Placement,
    pub image: RgbaImage,
}
