//! Control-surface geometry: fixed region layout, hit-testing, scrub mapping.
//!
//! The layout is static per session (the surface size is fixed); regions are
//! hit-tested in a fixed priority order, never by area or z-order.

use crate::frame::Rect;

/// Logical surface size. The whole widget draws in this coordinate space;
/// the host shell scales the final texture however it likes.
pub const SURFACE_W: usize = 640;
pub const SURFACE_H: usize = 360;

/// Control bar strip along the bottom edge.
pub const BAR_RECT: Rect = Rect::new(0.0, 320.0, 640.0, 40.0);

/// Hover thumbnail size (16:9) and the opaque timecode strip at its bottom.
pub const THUMB_W: f32 = 96.0;
pub const THUMB_H: f32 = 54.0;
pub const THUMB_LABEL_H: f32 = 12.0;

/// Interactive control regions, in hit-test priority order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegionId {
    Previous,
    PlayPause,
    Next,
    Volume,
    ScrubBar,
}

/// A named rectangular hit region.
#[derive(Clone, Copy, Debug)]
pub struct Region {
    pub id: RegionId,
    pub rect: Rect,
}

/// Fixed control layout over the 640x360 surface.
#[derive(Clone, Debug)]
pub struct ControlLayout {
    regions: [Region; 5],
}

impl ControlLayout {
    pub fn new() -> Self {
        let regions = [
            Region { id: RegionId::Previous, rect: Rect::new(12.0, 328.0, 28.0, 24.0) },
            Region { id: RegionId::PlayPause, rect: Rect::new(48.0, 328.0, 28.0, 24.0) },
            Region { id: RegionId::Next, rect: Rect::new(84.0, 328.0, 28.0, 24.0) },
            Region { id: RegionId::Volume, rect: Rect::new(120.0, 328.0, 28.0, 24.0) },
            Region { id: RegionId::ScrubBar, rect: Rect::new(200.0, 334.0, 428.0, 12.0) },
        ];
        Self { regions }
    }

    /// Regions in priority order (Previous, PlayPause, Next, Volume, ScrubBar).
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn rect(&self, id: RegionId) -> Rect {
        self.regions
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.rect)
            .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
    }

    /// Resolve a pointer position to the first matching region in priority
    /// order. Overlaps are decided by that static priority alone.
    pub fn resolve_region(&self, px: f32, py: f32) -> Option<RegionId> {
        self.regions
            .iter()
            .find(|r| r.rect.contains(px, py))
            .map(|r| r.id)
    }

    /// Fraction along the scrub bar for a pointer x, clamped to [0, 1].
    ///
    /// Clamping happens here, before any multiplication by duration: one
    /// documented rule for every caller (seek and thumbnail preview alike).
    pub fn scrub_fraction(&self, px: f32) -> f32 {
        let scrub = self.rect(RegionId::ScrubBar);
        ((px - scrub.x) / scrub.w).clamp(0.0, 1.0)
    }

    /// Target time for a pointer x over the scrub bar. The result is always
    /// within [0, duration]; callers still refuse to seek when duration is
    /// unknown or zero.
    pub fn scrub_time(&self, px: f32, duration: f64) -> f64 {
        self.scrub_fraction(px) as f64 * duration
    }
}

impl Default for ControlLayout {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_inside_single_region() {
        let layout = ControlLayout::new();
        assert_eq!(layout.resolve_region(14.0, 330.0), Some(RegionId::Previous));
        assert_eq!(layout.resolve_region(50.0, 330.0), Some(RegionId::PlayPause));
        assert_eq!(layout.resolve_region(300.0, 340.0), Some(RegionId::ScrubBar));
        assert_eq!(layout.resolve_region(300.0, 100.0), None);
    }

    #[test]
    fn test_resolve_edge_is_inclusive() {
        let layout = ControlLayout::new();
        let prev = layout.rect(RegionId::Previous);
        assert_eq!(
            layout.resolve_region(prev.x + prev.w, prev.y + prev.h),
            Some(RegionId::Previous)
        );
    }

    #[test]
    fn test_overlap_resolved_by_priority() {
        // Synthetic overlapping layout: priority order must win, not area.
        let layout = ControlLayout {
            regions: [
                Region { id: RegionId::Previous, rect: Rect::new(0.0, 0.0, 10.0, 10.0) },
                Region { id: RegionId::PlayPause, rect: Rect::new(0.0, 0.0, 100.0, 100.0) },
                Region { id: RegionId::Next, rect: Rect::new(0.0, 0.0, 100.0, 100.0) },
                Region { id: RegionId::Volume, rect: Rect::new(200.0, 0.0, 10.0, 10.0) },
                Region { id: RegionId::ScrubBar, rect: Rect::new(300.0, 0.0, 10.0, 10.0) },
            ],
        };
        assert_eq!(layout.resolve_region(5.0, 5.0), Some(RegionId::Previous));
        assert_eq!(layout.resolve_region(50.0, 50.0), Some(RegionId::PlayPause));
    }

    #[test]
    fn test_scrub_fraction_clamps() {
        let layout = ControlLayout::new();
        let scrub = layout.rect(RegionId::ScrubBar);
        assert_eq!(layout.scrub_fraction(scrub.x - 50.0), 0.0);
        assert_eq!(layout.scrub_fraction(scrub.x + scrub.w + 50.0), 1.0);
        let mid = layout.scrub_fraction(scrub.x + scrub.w / 2.0);
        assert!((mid - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_scrub_time_within_duration() {
        let layout = ControlLayout::new();
        let t = layout.scrub_time(10_000.0, 120.0);
        assert_eq!(t, 120.0);
        let t = layout.scrub_time(-10_000.0, 120.0);
        assert_eq!(t, 0.0);
    }
}
