//! Invert effect: each color channel replaced by `255 - channel`.
//!
//! Alpha is untouched. Applying twice restores the original buffer.

/// Apply inversion in place over 4-byte RGBA groups.
pub fn apply(buf: &mut [u8]) {
    for px in buf.chunks_exact_mut(4) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_involution() {
        let original: Vec<u8> = (0u8..=255).cycle().take(256).collect();
        let mut buf = original.clone();
        apply(&mut buf);
        assert_ne!(buf, original);
        apply(&mut buf);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_alpha_preserved() {
        let mut buf = vec![0, 128, 255, 42];
        apply(&mut buf);
        assert_eq!(buf, vec![255, 127, 0, 42]);
    }
}
