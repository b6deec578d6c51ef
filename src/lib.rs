//! Showcase Site - backend and interaction logic for a small portfolio website.
//!
//! This library provides the contact form relay that runs on the server and
//! the host-independent state machines behind the page's interactive parts.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Showcase Site                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  page                                   server               │
//! │  ┌─────────────┐    POST /send-message  ┌─────────────┐     │
//! │  │ ContactForm │───────────────────────▶│ FormGateway │     │
//! │  └─────────────┘                        └─────────────┘     │
//! │  ┌─────────────┐                               │             │
//! │  │   Slider    │                               ▼             │
//! │  │ Controller  │                        ┌─────────────┐     │
//! │  └─────────────┘                        │   Mailer    │     │
//! │  ┌─────────────┐                        │   (SMTP)    │     │
//! │  │ Nav / Hero  │                        └─────────────┘     │
//! │  └─────────────┘                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use showcase_site::slider::{Slide, SliderConfig, SliderController, SliderEvent, TrackMetrics};
//!
//! let slides = (0..4).map(|i| Slide::new(i, 320.0)).collect();
//! let metrics = TrackMetrics::new(1280.0, 1280.0);
//! let mut slider = SliderController::mount(slides, metrics, SliderConfig::default())
//!     .expect("at least one slide");
//!
//! slider.init();
//! let effects = slider.handle(SliderEvent::ArrowRight);
//! assert!(!effects.is_empty());
//! ```

pub mod config;
pub mod contact;
pub mod site;
pub mod slider;

#[cfg(feature = "server")]
pub mod server;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigError, MailConfig};
pub use contact::{
    DeliveryError, Field, FieldError, FormGateway, FormStatus, GatewayOutcome, Mailer,
    OutgoingMail, Submission,
};
pub use site::{HeroSlider, NavToggle};
pub use slider::{Effect, SliderController, SliderEvent, ViewMode};

#[cfg(feature = "client")]
pub use contact::ContactForm;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
