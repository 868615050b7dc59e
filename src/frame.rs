//! RGBA8 software surface with the blit/fill primitives the compositor draws with.
//!
//! **Why**: the widget owns its pixels. Decoded frames, text patches and the
//! composited output are all plain RGBA byte buffers, 4 bytes per pixel,
//! row-major, no padding.
//!
//! **Used by**: compositor (canvas + overlays), media streams (decoded
//! frames), text rasterizer (glyph patches), preview sampler (thumbnails).

/// Axis-aligned rectangle in surface coordinates.
///
/// `contains` is inclusive on all four edges, which matters for hit-testing
/// pointer coordinates that land exactly on a region border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Inclusive containment test on both bounds of both axes.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.w && py >= self.y && py <= self.y + self.h
    }
}

/// Owned RGBA8 pixel buffer.
#[derive(Debug, Clone)]
pub struct Surface {
    pixels: Vec<u8>,
    width: usize,
    height: usize,
}

impl Surface {
    /// Create an opaque black surface.
    pub fn new(width: usize, height: usize) -> Self {
        let mut pixels = vec![0u8; width * height * 4];
        for px in pixels.chunks_exact_mut(4) {
            px[3] = 255;
        }
        Self { pixels, width, height }
    }

    /// Wrap an existing RGBA buffer. Length must be `width * height * 4`.
    pub fn from_rgba(pixels: Vec<u8>, width: usize, height: usize) -> Self {
        debug_assert_eq!(pixels.len(), width * height * 4);
        Self { pixels, width, height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Flood the whole surface with one color (no blending).
    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    fn blend_px(&mut self, x: usize, y: usize, color: [u8; 4]) {
        let idx = (y * self.width + x) * 4;
        let src_a = color[3] as f32 / 255.0;
        if src_a <= 0.0 {
            return;
        }
        for c in 0..3 {
            let dst = self.pixels[idx + c] as f32;
            let src = color[c] as f32;
            self.pixels[idx + c] = (src * src_a + dst * (1.0 - src_a)) as u8;
        }
        let dst_a = self.pixels[idx + 3] as f32 / 255.0;
        self.pixels[idx + 3] = ((src_a + dst_a * (1.0 - src_a)) * 255.0) as u8;
    }

    /// Fill a rectangle, alpha-blending `color` over existing pixels.
    /// The rect is clipped to the surface.
    pub fn fill_rect(&mut self, rect: Rect, color: [u8; 4]) {
        let x0 = rect.x.max(0.0) as usize;
        let y0 = rect.y.max(0.0) as usize;
        let x1 = ((rect.x + rect.w).max(0.0) as usize).min(self.width);
        let y1 = ((rect.y + rect.h).max(0.0) as usize).min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend_px(x, y, color);
            }
        }
    }

    /// Fill a triangle given by three points, alpha-blended.
    /// Used for the transport glyphs (play, next/previous arrows).
    pub fn fill_triangle(&mut self, pts: [(f32, f32); 3], color: [u8; 4]) {
        let min_x = pts.iter().map(|p| p.0).fold(f32::MAX, f32::min).max(0.0) as usize;
        let max_x = pts.iter().map(|p| p.0).fold(f32::MIN, f32::max).ceil() as usize;
        let min_y = pts.iter().map(|p| p.1).fold(f32::MAX, f32::min).max(0.0) as usize;
        let max_y = pts.iter().map(|p| p.1).fold(f32::MIN, f32::max).ceil() as usize;

        let edge = |a: (f32, f32), b: (f32, f32), px: f32, py: f32| -> f32 {
            (b.0 - a.0) * (py - a.1) - (b.1 - a.1) * (px - a.0)
        };

        for y in min_y..max_y.min(self.height) {
            for x in min_x..max_x.min(self.width) {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let e0 = edge(pts[0], pts[1], px, py);
                let e1 = edge(pts[1], pts[2], px, py);
                let e2 = edge(pts[2], pts[0], px, py);
                // Accept either winding
                if (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0) {
                    self.blend_px(x, y, color);
                }
            }
        }
    }

    /// Copy `src` into `dst`, nearest-neighbor scaled, no blending.
    /// Decoded video frames land on the canvas through this.
    pub fn blit_scaled(&mut self, src: &Surface, dst: Rect) {
        if src.width == 0 || src.height == 0 || dst.w <= 0.0 || dst.h <= 0.0 {
            return;
        }
        let x0 = dst.x.max(0.0) as usize;
        let y0 = dst.y.max(0.0) as usize;
        let x1 = ((dst.x + dst.w) as usize).min(self.width);
        let y1 = ((dst.y + dst.h) as usize).min(self.height);
        for y in y0..y1 {
            let sy = (((y as f32 - dst.y) / dst.h) * src.height as f32) as usize;
            let sy = sy.min(src.height - 1);
            for x in x0..x1 {
                let sx = (((x as f32 - dst.x) / dst.w) * src.width as f32) as usize;
                let sx = sx.min(src.width - 1);
                let si = (sy * src.width + sx) * 4;
                let di = (y * self.width + x) * 4;
                self.pixels[di..di + 4].copy_from_slice(&src.pixels[si..si + 4]);
            }
        }
    }

    /// Alpha-blend `src` onto this surface at (x, y), clipped.
    /// Text patches composite through this.
    pub fn blit_alpha(&mut self, src: &Surface, x: i32, y: i32) {
        for sy in 0..src.height {
            let dy = y + sy as i32;
            if dy < 0 || dy as usize >= self.height {
                continue;
            }
            for sx in 0..src.width {
                let dx = x + sx as i32;
                if dx < 0 || dx as usize >= self.width {
                    continue;
                }
                let si = (sy * src.width + sx) * 4;
                let color = [
                    src.pixels[si],
                    src.pixels[si + 1],
                    src.pixels[si + 2],
                    src.pixels[si + 3],
                ];
                self.blend_px(dx as usize, dy as usize, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!(r.contains(10.0, 20.0));
        assert!(r.contains(40.0, 60.0));
        assert!(r.contains(25.0, 30.0));
        assert!(!r.contains(9.9, 30.0));
        assert!(!r.contains(40.1, 30.0));
    }

    #[test]
    fn test_new_surface_is_opaque_black() {
        let s = Surface::new(2, 2);
        for px in s.pixels().chunks_exact(4) {
            assert_eq!(px, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn test_fill_rect_opaque_overwrites() {
        let mut s = Surface::new(4, 4);
        s.fill_rect(Rect::new(1.0, 1.0, 2.0, 2.0), [255, 0, 0, 255]);
        let idx = (4 + 1) * 4;
        assert_eq!(&s.pixels()[idx..idx + 4], &[255, 0, 0, 255]);
        // Outside the rect untouched
        assert_eq!(&s.pixels()[0..4], &[0, 0, 0, 255]);
    }

    #[test]
    fn test_blit_scaled_fills_dst() {
        let mut src = Surface::new(2, 2);
        src.fill([10, 20, 30, 255]);
        let mut dst = Surface::new(8, 8);
        dst.blit_scaled(&src, Rect::new(0.0, 0.0, 8.0, 8.0));
        let idx = (7 * 8 + 7) * 4;
        assert_eq!(&dst.pixels()[idx..idx + 4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_blit_alpha_clips() {
        let mut src = Surface::new(4, 4);
        src.fill([255, 255, 255, 255]);
        let mut dst = Surface::new(2, 2);
        // Must not panic when src hangs off the edge
        dst.blit_alpha(&src, -2, -2);
        dst.blit_alpha(&src, 1, 1);
    }
}
