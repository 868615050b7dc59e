//! Per-pixel color-transform effects applied in place to the composited frame.
//!
//! Effects operate on a flat RGBA buffer, 4 bytes per pixel, and never touch
//! the alpha channel. A buffer whose length is not a multiple of 4 is a
//! caller contract violation; the trailing remainder is simply never visited.
//!
//! # Effect Types
//!
//! | Kind | Description |
//! |------|-------------|
//! | **None** | No-op, short-circuits before any buffer access |
//! | **Grayscale** | Unweighted mean of R,G,B, truncating division |
//! | **Invert** | 255 - c per channel |
//! | **Threshold** | BT.709 luma binarization to pure black/white |
//!
//! # Adding New Effects
//!
//! 1. Add a variant to `EffectKind`
//! 2. Create an implementation file with an `apply(&mut [u8])` function
//! 3. Add the module and the match arm in `apply()`

pub mod grayscale;
pub mod invert;
pub mod threshold;

use serde::{Deserialize, Serialize};

/// Selected visual effect, read once per tick by the compositor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectKind {
    /// Pass pixels through untouched
    #[default]
    None,
    /// Unweighted channel mean
    Grayscale,
    /// Channel inversion
    Invert,
    /// Luma binarization
    Threshold,
}

impl EffectKind {
    /// Human-readable name for the shell's effect menu.
    pub fn display_name(&self) -> &'static str {
        match self {
            EffectKind::None => "None",
            EffectKind::Grayscale => "Grayscale",
            EffectKind::Invert => "Invert",
            EffectKind::Threshold => "Threshold",
        }
    }

    /// All selectable kinds, in menu order.
    pub fn all() -> &'static [EffectKind] {
        &[
            EffectKind::None,
            EffectKind::Grayscale,
            EffectKind::Invert,
            EffectKind::Threshold,
        ]
    }

    /// Parse a CLI/menu name, case-insensitive.
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" => Some(EffectKind::None),
            "grayscale" | "greyscale" => Some(EffectKind::Grayscale),
            "invert" => Some(EffectKind::Invert),
            "threshold" => Some(EffectKind::Threshold),
            _ => None,
        }
    }
}

/// Apply `effect` to an RGBA buffer in place.
///
/// `None` returns before reading a single byte: the caller invokes this once
/// per tick over the full surface and the empty case must not cost a
/// read/write round trip over it.
pub fn apply(buf: &mut [u8], effect: EffectKind) {
    match effect {
        EffectKind::None => {}
        EffectKind::Grayscale => grayscale::apply(buf),
        EffectKind::Invert => invert::apply(buf),
        EffectKind::Threshold => threshold::apply(buf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_leaves_buffer_untouched() {
        let original: Vec<u8> = (0u8..=255).cycle().take(64).collect();
        let mut buf = original.clone();
        apply(&mut buf, EffectKind::None);
        assert_eq!(buf, original);
    }

    #[test]
    fn test_from_name_round_trips_display() {
        for kind in EffectKind::all() {
            assert_eq!(EffectKind::from_name(kind.display_name()), Some(*kind));
        }
        assert_eq!(EffectKind::from_name("sepia"), None);
    }
}
