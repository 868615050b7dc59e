//! Threshold effect: BT.709 luma binarization.
//!
//! Luma is `0.2126*R + 0.7152*G + 0.0722*B` (ITU-R BT.709). Pixels with
//! luma >= 128 become pure white, the rest pure black. This is a
//! binarization, not a grayscale pass: the per-pixel decision uses luma,
//! never the channel average. Alpha is untouched.

const LUMA_CUTOFF: f32 = 128.0;

/// Apply the luma threshold in place over 4-byte RGBA groups.
pub fn apply(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let luma = 0.2126 * px[0] as f32 + 0.7152 * px[1] as f32 + 0.0722 * px[2] as f32;
        let v = if luma >= LUMA_CUTOFF { 255 } else { 0 };
        px[0] = v;
        px[1] = v;
        px[2] = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_is_binary() {
        let mut buf: Vec<u8> = (0u8..=255).cycle().take(1024).collect();
        apply(&mut buf);
        for px in buf.chunks_exact(4) {
            assert!(px[0] == 0 || px[0] == 255);
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_luma_not_mean() {
        // Pure green: mean is 85 (below cutoff) but BT.709 luma is ~182.
        let mut buf = vec![0, 255, 0, 255];
        apply(&mut buf);
        assert_eq!(&buf[0..3], &[255, 255, 255]);

        // Pure blue: luma ~18, goes black.
        let mut buf = vec![0, 0, 255, 255];
        apply(&mut buf);
        assert_eq!(&buf[0..3], &[0, 0, 0]);
    }

    #[test]
    fn test_alpha_preserved() {
        let mut buf = vec![200, 200, 200, 17];
        apply(&mut buf);
        assert_eq!(buf[3], 17);
    }
}
