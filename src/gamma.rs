// Lookup tables for gamma-correct compositing of hidden images over the frame.
// Visual: soft circle edges and translucent pixels mix without dark halos.

use image::Rgba;

pub struct GammaLut {
    // sRGB(0..255) -> linear (0..1) as f32
    srgb_to_linear: [f32; 256],
    // linear(0..1) -> sRGB(0..255) via 4096-step quantization
    // (index = (linear * 4095).round())
    linear_to_srgb: [u8; 4096],
}

impl GammaLut {
    /// Build both tables once; the renderer keeps them for its lifetime.
    pub fn new() -> Self {
        let mut s2l = [0.0f32; 256];
        for (v, slot) in s2l.iter_mut().enumerate() {
            let c = v as f32 / 255.0;
            *slot = if c <= 0.04045 { c / 12.92 } else { ((c + 0.055) / 1.055).powf(2.4) };
        }

        let mut l2s = [0u8; 4096];
        for (i, slot) in l2s.iter_mut().enumerate() {
            let l = (i as f32) / 4095.0;
            let s = if l <= 0.003_130_8 { 12.92 * l } else { 1.055 * l.powf(1.0 / 2.4) - 0.055 };
            *slot = (s * 255.0).round().clamp(0.0, 255.0) as u8;
        }

        Self { srgb_to_linear: s2l, linear_to_srgb: l2s }
    }

    #[inline]
    pub fn srgb_u8_to_linear(&self, v: u8) -> f32 {
        self.srgb_to_linear[v as usize]
    }

    #[inline]
    pub fn linear_to_srgb_u8(&self, l: f32) -> u8 {
        let idx = (l.clamp(0.0, 1.0) * 4095.0).round() as usize;
        self.linear_to_srgb[idx]
    }

    /// Source-over of `src` onto the packed 0x00RRGGBB pixel `dst`, with the
    /// source alpha further scaled by `coverage` (the clip's edge coverage).
    #[inline]
    pub fn over(&self, dst: u32, src: Rgba<u8>, coverage: f32) -> u32 {
        let a = (src[3] as f32 / 255.0) * coverage.clamp(0.0, 1.0);
        if a <= 0.0 {
            return dst;
        }
        if a >= 1.0 {
            return pack(src[0], src[1], src[2]);
        }

        let inv = 1.0 - a;
        let mix = |s: u8, d: u8| {
            let l = a * self.srgb_u8_to_linear(s) + inv * self.srgb_u8_to_linear(d);
            self.linear_to_srgb_u8(l)
        };
        let (dr, dg, db) = unpack(dst);
        pack(mix(src[0], dr), mix(src[1], dg), mix(src[2], db))
    }
}

impl Default for GammaLut {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
pub fn pack(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

#[inline]
pub fn unpack(px: u32) -> (u8, u8, u8) {
    (((px >> 16) & 0xFF) as u8, ((px >> 8) & 0xFF) as u8, (px & 0xFF) as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_round_trip_endpoints() {
        let lut = GammaLut::new();
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(0)), 0);
        assert_eq!(lut.linear_to_srgb_u8(lut.srgb_u8_to_linear(255)), 255);
    }

    #[test]
    fn test_over_opaque_replaces() {
        let lut = GammaLut::new();
        assert_eq!(lut.over(0x00_11_22_33, Rgba([0xAA, 0xBB, 0xCC, 255]), 1.0), 0x00_AA_BB_CC);
    }

    #[test]
    fn test_over_transparent_or_uncovered_keeps_dst() {
        let lut = GammaLut::new();
        assert_eq!(lut.over(0x00_11_22_33, Rgba([0xAA, 0xBB, 0xCC, 0]), 1.0), 0x00_11_22_33);
        assert_eq!(lut.over(0x00_11_22_33, Rgba([0xAA, 0xBB, 0xCC, 255]), 0.0), 0x00_11_22_33);
    }

    #[test]
    fn test_half_cover_lands_between() {
        let lut = GammaLut::new();
        let (r, _, _) = unpack(lut.over(0x00_00_00_00, Rgba([255, 0, 0, 255]), 0.5));
        // Linear-light midpoint of black and red is brighter than 127 in sRGB.
        assert!(r > 127 && r < 255, "r = {r}");
    }
}
