//! Portfolio slider controller.
//!
//! The controller owns the slider state and is driven entirely by
//! [`SliderEvent`]s. Each event returns the [`Effect`]s the host page has to
//! apply (re-render the track, move the active marker, translate or scroll).
//!
//! Two presentation modes exist:
//! - **Desktop**: one slide at a time, arrows page through a ring with one
//!   clone on each side. Landing on a clone is corrected without animation
//!   once the transition ends.
//! - **Mobile**: native horizontal scrolling over the originals plus three
//!   duplicate blocks. The active slide follows the scroll position, and the
//!   scroll is shifted by whole blocks when it nears either edge.

use crate::slider::ring::{LoopKind, RingWindow};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Block the mobile track is kept in; setup centres its first slide.
const MIDDLE_BLOCK: usize = 1;

/// Stable identity of a slide image, shared by all of its clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlideId(pub u32);

/// A real slide and its rendered width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub width: f64,
}

impl Slide {
    pub fn new(id: u32, width: f64) -> Self {
        Self {
            id: SlideId(id),
            width,
        }
    }
}

/// One rendered element of the track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackItem {
    pub source: SlideId,
    pub clone: bool,
}

/// Viewport and track sizes, re-measured on every resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackMetrics {
    /// Window inner width
    pub viewport_width: f64,
    /// Visible width of the scroll container
    pub track_width: f64,
}

impl TrackMetrics {
    pub fn new(viewport_width: f64, track_width: f64) -> Self {
        Self {
            viewport_width,
            track_width,
        }
    }
}

/// Presentation mode, derived from the viewport width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    Desktop,
    Mobile,
}

impl ViewMode {
    /// Mobile when `width <= breakpoint`, like `(max-width: 768px)`.
    pub fn for_width(width: f64, breakpoint: f64) -> Self {
        if width <= breakpoint {
            ViewMode::Mobile
        } else {
            ViewMode::Desktop
        }
    }
}

/// Slider tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderConfig {
    /// Widest viewport still treated as mobile
    pub mobile_breakpoint: f64,
    /// Horizontal gap between slides
    pub gap: f64,
    /// Duration of the desktop slide animation
    pub transition: Duration,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            gap: 0.0,
            transition: Duration::from_millis(500),
        }
    }
}

/// How a transform change should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transition {
    /// Jump immediately (used for invisible corrections)
    None,
    Animated(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

/// Input events the host forwards to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SliderEvent {
    ArrowLeft,
    ArrowRight,
    /// A rendered slide was tapped (physical index)
    SlideClicked { index: usize },
    /// The track scrolled
    #[serde(rename_all = "camelCase")]
    Scroll { scroll_left: f64 },
    /// The frame requested by [`Effect::RequestFrame`] is running
    AnimationFrame,
    /// The track's transform transition finished
    TransitionEnd,
    Resize { metrics: TrackMetrics },
}

/// Changes the host applies to the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Effect {
    /// Replace the track's children with these elements
    Render { items: Vec<TrackItem> },
    /// Mark the element at `index` active and every other one inactive
    MarkActive { index: usize },
    /// Set (or clear, when `offset` is `None`) the track's horizontal transform
    Translate {
        offset: Option<f64>,
        transition: Transition,
    },
    ScrollTo { left: f64, behavior: ScrollBehavior },
    /// Deliver an [`SliderEvent::AnimationFrame`] on the next frame
    RequestFrame,
    /// Hide the intro caption
    HideIntro,
}

/// State of one mounted portfolio slider.
#[derive(Debug, Clone)]
pub struct SliderController {
    slides: Vec<Slide>,
    config: SliderConfig,
    metrics: TrackMetrics,
    mode: ViewMode,
    looping: LoopKind,
    /// Active physical index
    current: usize,
    scroll_left: f64,
    pending_wrap: bool,
    pending_scroll_fix: Option<f64>,
}

impl SliderController {
    /// Mount a controller over the given slides.
    ///
    /// Returns `None` when there are no slides; the slider then stays inert.
    /// Call [`init`](Self::init) afterwards to set up the initial mode.
    pub fn mount(slides: Vec<Slide>, metrics: TrackMetrics, config: SliderConfig) -> Option<Self> {
        if slides.is_empty() {
            tracing::debug!("Portfolio slider has no slides, not mounting");
            return None;
        }

        Some(Self {
            mode: ViewMode::for_width(metrics.viewport_width, config.mobile_breakpoint),
            slides,
            config,
            metrics,
            looping: LoopKind::None,
            current: 0,
            scroll_left: 0.0,
            pending_wrap: false,
            pending_scroll_fix: None,
        })
    }

    /// Prepare the mode for the mounted viewport.
    pub fn init(&mut self) -> Vec<Effect> {
        self.resize(self.metrics)
    }

    /// Dispatch one event.
    pub fn handle(&mut self, event: SliderEvent) -> Vec<Effect> {
        match event {
            SliderEvent::ArrowLeft => {
                let mut effects = self.go_to(self.current as isize - 1);
                effects.push(Effect::HideIntro);
                effects
            }
            SliderEvent::ArrowRight => {
                let mut effects = self.go_to(self.current as isize + 1);
                effects.push(Effect::HideIntro);
                effects
            }
            SliderEvent::SlideClicked { index } => self.center_clicked(index),
            SliderEvent::Scroll { scroll_left } => self.on_scroll(scroll_left),
            SliderEvent::AnimationFrame => self.apply_scroll_fix(),
            SliderEvent::TransitionEnd => self.finish_transition(),
            SliderEvent::Resize { metrics } => self.resize(metrics),
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn loop_kind(&self) -> LoopKind {
        self.looping
    }

    /// Active physical index.
    pub fn active_index(&self) -> usize {
        self.current
    }

    /// Active slide on the logical ring.
    pub fn logical_index(&self) -> usize {
        self.window().logical(self.current)
    }

    /// Number of rendered elements, clones included.
    pub fn slide_count(&self) -> usize {
        self.window().physical_len()
    }

    pub fn is_active(&self, physical: usize) -> bool {
        physical == self.current
    }

    /// Whether a wrap correction is waiting for the transition to end.
    pub fn pending_wrap(&self) -> bool {
        self.pending_wrap
    }

    /// Elements currently rendered in the track.
    pub fn track_items(&self) -> Vec<TrackItem> {
        let window = self.window();
        (0..window.physical_len())
            .map(|p| TrackItem {
                source: self.slides[window.logical(p)].id,
                clone: window.is_clone(p),
            })
            .collect()
    }

    /// Move to `index`, wrapping around the rendered elements.
    pub fn go_to(&mut self, index: isize) -> Vec<Effect> {
        let len = self.slide_count() as isize;
        self.current = index.rem_euclid(len) as usize;

        let mut effects = vec![self.mark_active()];
        match self.mode {
            ViewMode::Desktop => {
                effects.push(Effect::Translate {
                    offset: Some(self.desktop_offset(self.current)),
                    transition: Transition::Animated(self.config.transition),
                });
                if self.looping == LoopKind::Desktop {
                    self.pending_wrap = true;
                }
            }
            ViewMode::Mobile => effects.push(Effect::ScrollTo {
                left: self.scroll_target(self.current),
                behavior: ScrollBehavior::Smooth,
            }),
        }
        effects
    }

    /// Add one clone on each side of the track. No-op unless the track is
    /// plain and the view is desktop.
    pub fn setup_desktop_loop(&mut self) -> Vec<Effect> {
        if self.looping != LoopKind::None || self.mode != ViewMode::Desktop {
            return Vec::new();
        }

        let logical = self.logical_index();
        self.looping = LoopKind::Desktop;
        self.current = self.window().canonical(logical);

        vec![
            self.render(),
            self.mark_active(),
            Effect::Translate {
                offset: Some(self.desktop_offset(self.current)),
                transition: Transition::None,
            },
        ]
    }

    /// Remove the desktop clones and clear the transform.
    pub fn teardown_desktop_loop(&mut self) -> Vec<Effect> {
        if self.looping != LoopKind::Desktop {
            return Vec::new();
        }

        let logical = self.logical_index();
        self.looping = LoopKind::None;
        self.current = logical;
        self.pending_wrap = false;

        vec![
            self.render(),
            self.mark_active(),
            Effect::Translate {
                offset: None,
                transition: Transition::None,
            },
        ]
    }

    /// Append three duplicate blocks and scroll to the first one. No-op unless
    /// the track is plain and the view is mobile.
    pub fn setup_mobile_loop(&mut self) -> Vec<Effect> {
        if self.looping != LoopKind::None || self.mode != ViewMode::Mobile {
            return Vec::new();
        }

        let logical = self.logical_index();
        self.looping = LoopKind::Mobile;
        self.current = self.window().canonical(logical) + MIDDLE_BLOCK * self.slides.len();

        let left = self.scroll_target(self.current);
        self.scroll_left = left;

        vec![
            self.render(),
            self.mark_active(),
            Effect::ScrollTo {
                left,
                behavior: ScrollBehavior::Instant,
            },
        ]
    }

    /// Remove exactly the duplicate blocks added by the mobile setup.
    pub fn teardown_mobile_loop(&mut self) -> Vec<Effect> {
        if self.looping != LoopKind::Mobile {
            return Vec::new();
        }

        let logical = self.logical_index();
        self.looping = LoopKind::None;
        self.current = logical;
        self.pending_scroll_fix = None;

        vec![self.render(), self.mark_active()]
    }

    /// Re-evaluate the mode for new metrics and resync the view.
    pub fn resize(&mut self, metrics: TrackMetrics) -> Vec<Effect> {
        let previous = self.mode;
        self.metrics = metrics;
        self.mode = ViewMode::for_width(metrics.viewport_width, self.config.mobile_breakpoint);
        if previous != self.mode {
            tracing::debug!(from = ?previous, to = ?self.mode, "Portfolio slider mode change");
        }

        let (mut effects, setup) = match self.mode {
            ViewMode::Mobile => (self.teardown_desktop_loop(), self.setup_mobile_loop()),
            ViewMode::Desktop => (self.teardown_mobile_loop(), self.setup_desktop_loop()),
        };

        // Setup already positions the track and marks the slide.
        if !setup.is_empty() {
            effects.extend(setup);
            return effects;
        }

        if self.mode == ViewMode::Desktop {
            effects.push(Effect::Translate {
                offset: Some(self.desktop_offset(self.current)),
                transition: Transition::None,
            });
        }
        effects.push(self.mark_active());
        effects
    }

    fn finish_transition(&mut self) -> Vec<Effect> {
        if !std::mem::take(&mut self.pending_wrap) || self.looping != LoopKind::Desktop {
            return Vec::new();
        }

        let last = self.slide_count() - 1;
        self.current = if self.current == 0 {
            last - 1
        } else if self.current == last {
            1
        } else {
            return Vec::new();
        };

        vec![
            self.mark_active(),
            Effect::Translate {
                offset: Some(self.desktop_offset(self.current)),
                transition: Transition::None,
            },
        ]
    }

    fn center_clicked(&mut self, index: usize) -> Vec<Effect> {
        if self.mode != ViewMode::Mobile || index >= self.slide_count() {
            return Vec::new();
        }

        // The active marker follows from the resulting scroll events.
        vec![
            Effect::ScrollTo {
                left: self.scroll_target(index),
                behavior: ScrollBehavior::Smooth,
            },
            Effect::HideIntro,
        ]
    }

    fn on_scroll(&mut self, scroll_left: f64) -> Vec<Effect> {
        if self.mode != ViewMode::Mobile {
            return Vec::new();
        }
        self.scroll_left = scroll_left;

        let mut effects = Vec::new();
        let closest = self.closest_to_center(scroll_left);
        if closest != self.current {
            self.current = closest;
            effects.push(self.mark_active());
        }

        if self.looping == LoopKind::Mobile {
            match self.edge_correction(scroll_left) {
                Some(target) => {
                    if self.pending_scroll_fix.replace(target).is_none() {
                        effects.push(Effect::RequestFrame);
                    }
                }
                None => self.pending_scroll_fix = None,
            }
        }
        effects
    }

    fn apply_scroll_fix(&mut self) -> Vec<Effect> {
        match self.pending_scroll_fix.take() {
            Some(left) if self.looping == LoopKind::Mobile => {
                self.scroll_left = left;
                vec![Effect::ScrollTo {
                    left,
                    behavior: ScrollBehavior::Instant,
                }]
            }
            _ => Vec::new(),
        }
    }

    fn closest_to_center(&self, scroll_left: f64) -> usize {
        let center = scroll_left + self.metrics.track_width / 2.0;
        let mut left = 0.0;
        let mut closest = 0;
        let mut best = f64::INFINITY;

        for p in 0..self.slide_count() {
            let width = self.width_at(p);
            let distance = (center - (left + width / 2.0)).abs();
            if distance < best {
                best = distance;
                closest = p;
            }
            left += width + self.config.gap;
        }
        closest
    }

    /// Scroll position that keeps the view in the middle block, if the
    /// current one is too close to either edge of the cloned region.
    fn edge_correction(&self, scroll_left: f64) -> Option<f64> {
        let block = self.block_width();
        if block <= 0.0 {
            return None;
        }

        let track = self.metrics.track_width;
        let upper = self.scroll_width() - block / 2.0 - track;
        if scroll_left >= block / 2.0 && scroll_left <= upper {
            return None;
        }

        let current_block = ((scroll_left + track / 2.0) / block).floor();
        let shift = (MIDDLE_BLOCK as f64 - current_block) * block;
        if shift == 0.0 {
            None
        } else {
            Some(scroll_left + shift)
        }
    }

    fn window(&self) -> RingWindow {
        RingWindow::new(self.looping, self.slides.len())
    }

    fn width_at(&self, physical: usize) -> f64 {
        self.slides[self.window().logical(physical)].width
    }

    fn left_of(&self, physical: usize) -> f64 {
        (0..physical)
            .map(|p| self.width_at(p) + self.config.gap)
            .sum()
    }

    fn scroll_width(&self) -> f64 {
        match self.slide_count() {
            0 => 0.0,
            n => self.left_of(n - 1) + self.width_at(n - 1),
        }
    }

    /// Width of one full set of slides, including the gap after each.
    fn block_width(&self) -> f64 {
        self.slides.iter().map(|s| s.width + self.config.gap).sum()
    }

    fn desktop_offset(&self, physical: usize) -> f64 {
        -self.left_of(physical) + (self.metrics.viewport_width - self.width_at(physical)) / 2.0
    }

    fn scroll_target(&self, physical: usize) -> f64 {
        self.left_of(physical) - (self.metrics.track_width - self.width_at(physical)) / 2.0
    }

    fn render(&self) -> Effect {
        Effect::Render {
            items: self.track_items(),
        }
    }

    fn mark_active(&self) -> Effect {
        Effect::MarkActive {
            index: self.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: TrackMetrics = TrackMetrics {
        viewport_width: 1200.0,
        track_width: 1200.0,
    };
    const MOBILE: TrackMetrics = TrackMetrics {
        viewport_width: 360.0,
        track_width: 360.0,
    };

    fn slides(n: u32) -> Vec<Slide> {
        (0..n).map(|i| Slide::new(i, 300.0)).collect()
    }

    fn mounted(n: u32, metrics: TrackMetrics) -> SliderController {
        let mut slider =
            SliderController::mount(slides(n), metrics, SliderConfig::default()).expect("slides");
        slider.init();
        slider
    }

    #[test]
    fn test_empty_slider_does_not_mount() {
        assert!(SliderController::mount(Vec::new(), DESKTOP, SliderConfig::default()).is_none());
    }

    #[test]
    fn test_breakpoint_is_inclusive() {
        assert_eq!(ViewMode::for_width(768.0, 768.0), ViewMode::Mobile);
        assert_eq!(ViewMode::for_width(769.0, 768.0), ViewMode::Desktop);
    }

    #[test]
    fn test_init_on_desktop_starts_on_first_real_slide() {
        let slider = mounted(4, DESKTOP);
        assert_eq!(slider.loop_kind(), LoopKind::Desktop);
        assert_eq!(slider.slide_count(), 6);
        assert_eq!(slider.active_index(), 1);
        assert_eq!(slider.logical_index(), 0);
    }

    #[test]
    fn test_desktop_centering_offset() {
        let mut slider = mounted(4, DESKTOP);
        let effects = slider.go_to(2);
        // left(2) = 600, (1200 - 300) / 2 = 450
        assert!(effects.contains(&Effect::Translate {
            offset: Some(-150.0),
            transition: Transition::Animated(Duration::from_millis(500)),
        }));
        assert!(slider.pending_wrap());
    }

    #[test]
    fn test_wrap_onto_clone_is_corrected_after_transition() {
        let mut slider = mounted(4, DESKTOP);

        slider.handle(SliderEvent::ArrowLeft);
        assert_eq!(slider.active_index(), 0);

        let effects = slider.handle(SliderEvent::TransitionEnd);
        assert_eq!(slider.active_index(), 4);
        assert_eq!(slider.logical_index(), 3);
        assert!(effects.iter().any(|e| matches!(
            e,
            Effect::Translate {
                transition: Transition::None,
                ..
            }
        )));
        assert!(!slider.pending_wrap());

        // No pending correction: nothing happens.
        assert!(slider.handle(SliderEvent::TransitionEnd).is_empty());
    }

    #[test]
    fn test_forward_wrap_lands_on_first_real_slide() {
        let mut slider = mounted(3, DESKTOP);
        slider.go_to(4);
        slider.handle(SliderEvent::TransitionEnd);
        assert_eq!(slider.active_index(), 1);
    }

    #[test]
    fn test_arrows_hide_intro() {
        let mut slider = mounted(3, DESKTOP);
        let effects = slider.handle(SliderEvent::ArrowRight);
        assert_eq!(effects.last(), Some(&Effect::HideIntro));
    }

    #[test]
    fn test_setup_is_idempotent() {
        let mut slider = mounted(3, DESKTOP);
        assert!(slider.setup_desktop_loop().is_empty());
        assert!(slider.setup_mobile_loop().is_empty());
        assert!(slider.teardown_mobile_loop().is_empty());
        assert_eq!(slider.slide_count(), 5);
    }

    #[test]
    fn test_mobile_setup_scrolls_to_middle_block() {
        let slider = mounted(3, MOBILE);
        assert_eq!(slider.loop_kind(), LoopKind::Mobile);
        assert_eq!(slider.slide_count(), 12);
        assert_eq!(slider.active_index(), 3);
        assert_eq!(slider.logical_index(), 0);
        assert_eq!(slider.track_items().iter().filter(|i| i.clone).count(), 9);
    }

    #[test]
    fn test_resize_to_desktop_positions_track_once() {
        let mut slider = mounted(3, MOBILE);
        let effects = slider.handle(SliderEvent::Resize { metrics: DESKTOP });

        let translates = effects
            .iter()
            .filter(|e| matches!(e, Effect::Translate { .. }))
            .count();
        let marks = effects
            .iter()
            .filter(|e| matches!(e, Effect::MarkActive { .. }))
            .count();
        assert_eq!(translates, 1);
        // One from removing the mobile blocks, one from adding the desktop clones.
        assert_eq!(marks, 2);
        assert!(matches!(
            effects.last(),
            Some(Effect::Translate {
                offset: Some(_),
                transition: Transition::None
            })
        ));
        assert!(effects.contains(&Effect::MarkActive {
            index: slider.active_index()
        }));
    }

    #[test]
    fn test_scroll_marks_closest_slide() {
        let mut slider = mounted(3, MOBILE);
        // Viewport centre 1380 lies inside physical slide 4 (1200..1500).
        let effects = slider.handle(SliderEvent::Scroll { scroll_left: 1200.0 });
        assert_eq!(effects, vec![Effect::MarkActive { index: 4 }]);
        assert_eq!(slider.logical_index(), 1);
    }

    #[test]
    fn test_scroll_near_edge_is_corrected_next_frame() {
        let mut slider = mounted(3, MOBILE);

        let effects = slider.handle(SliderEvent::Scroll { scroll_left: 100.0 });
        assert!(effects.contains(&Effect::RequestFrame));

        // A second scroll before the frame does not request another one.
        let effects = slider.handle(SliderEvent::Scroll { scroll_left: 90.0 });
        assert!(!effects.contains(&Effect::RequestFrame));

        let effects = slider.handle(SliderEvent::AnimationFrame);
        assert_eq!(
            effects,
            vec![Effect::ScrollTo {
                left: 990.0,
                behavior: ScrollBehavior::Instant,
            }]
        );
        assert!(slider.handle(SliderEvent::AnimationFrame).is_empty());
    }

    #[test]
    fn test_scroll_back_to_safe_range_cancels_correction() {
        let mut slider = mounted(3, MOBILE);
        slider.handle(SliderEvent::Scroll { scroll_left: 3000.0 });
        slider.handle(SliderEvent::Scroll { scroll_left: 1500.0 });
        assert!(slider.handle(SliderEvent::AnimationFrame).is_empty());
    }

    #[test]
    fn test_click_centres_slide_on_mobile_only() {
        let mut slider = mounted(3, MOBILE);
        let effects = slider.handle(SliderEvent::SlideClicked { index: 5 });
        assert_eq!(
            effects,
            vec![
                Effect::ScrollTo {
                    left: 1470.0,
                    behavior: ScrollBehavior::Smooth,
                },
                Effect::HideIntro,
            ]
        );

        let mut slider = mounted(3, DESKTOP);
        assert!(slider.handle(SliderEvent::SlideClicked { index: 1 }).is_empty());
    }

    #[test]
    fn test_scroll_is_ignored_on_desktop() {
        let mut slider = mounted(3, DESKTOP);
        assert!(slider.handle(SliderEvent::Scroll { scroll_left: 500.0 }).is_empty());
        assert_eq!(slider.active_index(), 1);
    }

    #[test]
    fn test_event_json_shape() {
        let event: SliderEvent =
            serde_json::from_str(r#"{"type":"scroll","scrollLeft":42.0}"#).unwrap();
        assert_eq!(event, SliderEvent::Scroll { scroll_left: 42.0 });

        let json = serde_json::to_value(Effect::MarkActive { index: 2 }).unwrap();
        assert_eq!(json["type"], "markActive");
        assert_eq!(json["index"], 2);
    }
}
