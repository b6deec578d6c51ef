//! Hero banner slider: plain next/previous paging over a fixed slide list.

/// Which hero slide is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeroSlider {
    count: usize,
    current: usize,
}

impl HeroSlider {
    /// Returns `None` when there are no slides to page through.
    pub fn new(count: usize) -> Option<Self> {
        (count > 0).then_some(Self { count, current: 0 })
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.count;
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.count - 1) % self.count;
        self.current
    }

    pub fn current(&self) -> usize {
        self.current
    }

    /// Whether slide `index` carries the active class.
    pub fn is_active(&self, index: usize) -> bool {
        index == self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_slides() {
        assert!(HeroSlider::new(0).is_none());
    }

    #[test]
    fn test_paging_wraps_both_ways() {
        let mut hero = HeroSlider::new(3).unwrap();
        assert_eq!(hero.prev(), 2);
        assert_eq!(hero.next(), 0);
        assert_eq!(hero.next(), 1);
        assert_eq!((0..3).filter(|&i| hero.is_active(i)).count(), 1);
    }
}
