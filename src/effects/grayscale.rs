//! Grayscale effect: each pixel's R,G,B replaced by their unweighted mean.
//!
//! The mean is integer division `(r + g + b) / 3`, truncating toward zero.
//! Alpha is untouched.

/// Apply grayscale in place over 4-byte RGBA groups.
pub fn apply(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        let mean = ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8;
        px[0] = mean;
        px[1] = mean;
        px[2] = mean;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channels_equal_after_apply() {
        let mut buf = vec![10, 200, 90, 255, 0, 0, 255, 128];
        apply(&mut buf);
        assert_eq!(&buf[0..4], &[100, 100, 100, 255]);
        // 255 / 3 truncates to 85
        assert_eq!(&buf[4..8], &[85, 85, 85, 128]);
    }

    #[test]
    fn test_idempotent() {
        let mut buf = vec![7, 130, 220, 255];
        apply(&mut buf);
        let once = buf.clone();
        apply(&mut buf);
        assert_eq!(buf, once);
    }
}
