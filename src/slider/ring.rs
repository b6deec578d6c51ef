//! Ring-window arithmetic for infinite-looking tracks.
//!
//! A track of `len` real slides is rendered as `lead` clones, the originals,
//! then `trail` clones. Every physical position maps back onto the logical
//! ring, so wrapping never needs literal node duplication.

use serde::{Deserialize, Serialize};

/// Number of duplicate blocks appended for mobile free scrolling.
pub const MOBILE_CLONE_BLOCKS: usize = 3;

/// Which loop layout, if any, the track currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoopKind {
    /// Originals only
    None,
    /// One clone on each side for single-slide paging
    Desktop,
    /// Originals followed by [`MOBILE_CLONE_BLOCKS`] full copies
    Mobile,
}

/// A window of physical positions over a logical ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingWindow {
    len: usize,
    lead: usize,
    trail: usize,
}

impl RingWindow {
    /// Window for the given loop layout over `len` slides.
    pub fn new(kind: LoopKind, len: usize) -> Self {
        let (lead, trail) = match kind {
            LoopKind::None => (0, 0),
            LoopKind::Desktop => (1, 1),
            LoopKind::Mobile => (0, MOBILE_CLONE_BLOCKS * len),
        };
        Self { len, lead, trail }
    }

    /// Number of rendered elements, clones included.
    pub fn physical_len(&self) -> usize {
        self.lead + self.len + self.trail
    }

    /// Logical slide shown at physical position `p`.
    pub fn logical(&self, physical: usize) -> usize {
        if self.len == 0 {
            return 0;
        }
        (physical + self.len - self.lead % self.len) % self.len
    }

    /// Physical position of the original (non-clone) element for a logical slide.
    pub fn canonical(&self, logical: usize) -> usize {
        self.lead + logical
    }

    /// Whether the element at physical position `p` is a clone.
    pub fn is_clone(&self, physical: usize) -> bool {
        physical < self.lead || physical >= self.lead + self.len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_window_wraps_at_edges() {
        let window = RingWindow::new(LoopKind::Desktop, 4);
        assert_eq!(window.physical_len(), 6);
        assert_eq!(window.logical(0), 3);
        assert_eq!(window.logical(1), 0);
        assert_eq!(window.logical(4), 3);
        assert_eq!(window.logical(5), 0);
        assert!(window.is_clone(0));
        assert!(window.is_clone(5));
        assert!(!window.is_clone(1));
        assert_eq!(window.canonical(2), 3);
    }

    #[test]
    fn test_mobile_window_appends_three_blocks() {
        let window = RingWindow::new(LoopKind::Mobile, 3);
        assert_eq!(window.physical_len(), 12);
        assert_eq!((0..12).filter(|&p| window.is_clone(p)).count(), 9);
        assert_eq!(window.logical(7), 1);
        assert_eq!(window.canonical(2), 2);
        assert!(window.is_clone(3));
        assert!(!window.is_clone(2));
    }

    #[test]
    fn test_single_slide_desktop_loop() {
        let window = RingWindow::new(LoopKind::Desktop, 1);
        assert_eq!(window.physical_len(), 3);
        assert!((0..3).all(|p| window.logical(p) == 0));
    }

    #[test]
    fn test_plain_window_is_identity() {
        let window = RingWindow::new(LoopKind::None, 5);
        assert_eq!(window.physical_len(), 5);
        assert!((0..5).all(|p| window.logical(p) == p && !window.is_clone(p)));
    }
}
