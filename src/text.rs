//! Text rasterization for caption and timecode overlays.
//!
//! Uses cosmic-text for shaping and glyph rendering. The FontSystem is
//! expensive to build, so one global instance is shared behind a mutex, as
//! is the swash cache.

use cosmic_text::{Attrs as TextAttrs, Buffer, Color, Family, FontSystem, Metrics, Shaping, SwashCache};
use std::sync::Mutex;

use crate::frame::Surface;

lazy_static::lazy_static! {
    static ref FONT_SYSTEM: Mutex<FontSystem> = Mutex::new(FontSystem::new());
    static ref SWASH_CACHE: Mutex<SwashCache> = Mutex::new(SwashCache::new());
}

/// Rasterize `text` in the system sans-serif at `font_size` px: white
/// glyphs over a fully transparent background, sized to the text.
/// Multi-line input (\n) is honored.
pub fn render_text(text: &str, font_size: f32) -> Surface {
    let mut font_system = FONT_SYSTEM.lock().unwrap();
    let mut swash_cache = SWASH_CACHE.lock().unwrap();

    let line_height = font_size * 1.2;
    let metrics = Metrics::new(font_size, line_height);
    let mut buffer = Buffer::new(&mut font_system, metrics);
    // Auto-width layout: generous bound, patch is trimmed to measured runs
    buffer.set_size(&mut font_system, Some(4096.0), None);
    buffer.set_text(
        &mut font_system,
        text,
        &TextAttrs::new().family(Family::SansSerif),
        Shaping::Advanced,
        None,
    );
    buffer.shape_until_scroll(&mut font_system, false);

    // Measure laid-out runs
    let mut text_w: f32 = 0.0;
    let mut text_h: f32 = 0.0;
    for run in buffer.layout_runs() {
        text_w = text_w.max(run.line_w);
        text_h = text_h.max(run.line_y + line_height);
    }

    let width = (text_w.ceil() as usize).max(1);
    let height = (text_h.ceil() as usize).max(1);

    let mut pixels = vec![0u8; width * height * 4];
    let text_color = Color::rgba(255, 255, 255, 255);

    buffer.draw(&mut font_system, &mut swash_cache, text_color, |x, y, w, h, color| {
        if color.a() == 0 {
            return;
        }
        for dy in 0..h as usize {
            for dx in 0..w as usize {
                let px = x + dx as i32;
                let py = y + dy as i32;
                if px < 0 || py < 0 || px as usize >= width || py as usize >= height {
                    continue;
                }
                let idx = (py as usize * width + px as usize) * 4;
                let src_a = color.a() as f32 / 255.0;
                let dst_a = pixels[idx + 3] as f32 / 255.0;
                let out_a = src_a + dst_a * (1.0 - src_a);
                if out_a > 0.0 {
                    let blend = |src: u8, dst: u8| -> u8 {
                        let s = src as f32 / 255.0;
                        let d = dst as f32 / 255.0;
                        (((s * src_a + d * dst_a * (1.0 - src_a)) / out_a) * 255.0) as u8
                    };
                    pixels[idx] = blend(color.r(), pixels[idx]);
                    pixels[idx + 1] = blend(color.g(), pixels[idx + 1]);
                    pixels[idx + 2] = blend(color.b(), pixels[idx + 2]);
                    pixels[idx + 3] = (out_a * 255.0) as u8;
                }
            }
        }
    });

    Surface::from_rgba(pixels, width, height)
}

/// Format seconds as `m:ss`, or `h:mm:ss` from one hour up.
/// Negative input is treated as zero.
pub fn format_timecode(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timecode_minutes() {
        assert_eq!(format_timecode(0.0), "0:00");
        assert_eq!(format_timecode(65.4), "1:05");
        assert_eq!(format_timecode(599.9), "9:59");
    }

    #[test]
    fn test_timecode_hours() {
        assert_eq!(format_timecode(3600.0), "1:00:00");
        assert_eq!(format_timecode(3661.0), "1:01:01");
    }

    #[test]
    fn test_timecode_negative_clamps() {
        assert_eq!(format_timecode(-5.0), "0:00");
    }

    #[test]
    fn test_render_text_nonempty_patch() {
        let patch = render_text("00:42", 12.0);
        assert!(patch.width() >= 1);
        assert!(patch.height() >= 1);
    }
}
