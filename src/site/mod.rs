//! Small page widgets: the mobile menu toggle and the hero slider.

pub mod hero;
pub mod nav;

pub use hero::HeroSlider;
pub use nav::NavToggle;
