// Software compositor: background + hidden images clipped to a circle.
// Visual: the background fills the window; inside the circle around the
// pointer, the hidden images show through.

use image::RgbaImage;

use crate::gamma::{pack, GammaLut};
use crate::types::{FrameBuffer, HiddenImage, Point};

/// Everything one frame depends on. The renderer holds no other state.
pub struct Scene<'a> {
    pub background: &'a RgbaImage,
    pub hidden: &'a [HiddenImage],
    pub pointer: Point,
    /// Clip radius already converted to bitmap pixels.
    pub radius: f32,
}

#[derive(Default)]
pub struct Renderer {
    lut: GammaLut,
}

impl Renderer {
    pub fn new() -> Self {
        Self { lut: GammaLut::new() }
    }

    /// Produce one frame into `fb`.
    pub fn render(&self, fb: &mut FrameBuffer, scene: &Scene<'_>) {
        /* 1) Clear the whole bitmap. */
        fb.pixels.fill(0);

        /* 2) Background scaled to the full bitmap. */
        self.paint_background(fb, scene.background);

        /* 3) Hidden images in configured order, each clipped on its own so
              nothing accumulates between them. */
        if scene.radius <= 0.0 {
            return; // empty circle: background only
        }
        for hidden in scene.hidden {
            self.paint_clipped(fb, hidden, scene.pointer, scene.radius);
        }
    }

    fn paint_background(&self, fb: &mut FrameBuffer, bg: &RgbaImage) {
        let (bw, bh) = (bg.width() as usize, bg.height() as usize);
        if bw == 0 || bh == 0 {
            return;
        }
        for y in 0..fb.height {
            let sy = if bh == fb.height { y } else { y * bh / fb.height };
            let row = y * fb.width;
            for x in 0..fb.width {
                let sx = if bw == fb.width { x } else { x * bw / fb.width };
                let px = bg.get_pixel(sx as u32, sy as u32);
                fb.pixels[row + x] = self.lut.over(fb.pixels[row + x], *px, 1.0);
            }
        }
    }

    fn paint_clipped(&self, fb: &mut FrameBuffer, hidden: &HiddenImage, center: Point, radius: f32) {
        // Float-to-int casts saturate, so far-off placements stay far off.
        let left = hidden.placement.left.round() as i64;
        let top = hidden.placement.top.round() as i64;
        let (iw, ih) = (hidden.image.width() as i64, hidden.image.height() as i64);

        // Only scan where the image rectangle and the circle's box overlap.
        let reach = radius + 1.0;
        let x0 = left.max((center.x - reach).floor() as i64).max(0);
        let y0 = top.max((center.y - reach).floor() as i64).max(0);
        let x1 = left.saturating_add(iw).min((center.x + reach).ceil() as i64).min(fb.width as i64);
        let y1 = top.saturating_add(ih).min((center.y + reach).ceil() as i64).min(fb.height as i64);

        for y in y0..y1 {
            let dy = y as f32 + 0.5 - center.y;
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - center.x;
                let dist = (dx * dx + dy * dy).sqrt();
                // 1px anti-aliased edge
                let coverage = (radius - dist + 0.5).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                let src = hidden.image.get_pixel((x - left) as u32, (y - top) as u32);
                let idx = y as usize * fb.width + x as usize;
                fb.pixels[idx] = self.lut.over(fb.pixels[idx], *src, coverage);
            }
        }
    }
}

/// Opaque packed colour, handy when building frames by hand.
pub fn rgb(r: u8, g: u8, b: u8) -> u32 {
    pack(r, g, b)
}
