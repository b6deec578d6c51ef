//! Portfolio slider logic.
//!
//! The slider is host-independent: the page forwards DOM events as
//! [`SliderEvent`]s and applies the returned [`Effect`]s.

pub mod controller;
pub mod ring;

// Re-export commonly used types
pub use controller::{
    Effect, ScrollBehavior, Slide, SlideId, SliderConfig, SliderController, SliderEvent,
    TrackItem, TrackMetrics, Transition, ViewMode,
};
pub use ring::{LoopKind, RingWindow, MOBILE_CLONE_BLOCKS};
