//! Walk the portfolio slider through a desktop session, a resize to mobile,
//! and some scrolling, printing the effects a page would apply.
//!
//! Run with: cargo run --example slider_demo

use showcase_site::slider::{
    Effect, Slide, SliderConfig, SliderController, SliderEvent, TrackMetrics,
};

fn show(label: &str, effects: &[Effect]) {
    println!("{label}");
    for effect in effects {
        match effect {
            Effect::Render { items } => {
                let clones = items.iter().filter(|i| i.clone).count();
                println!("  render {} elements ({} clones)", items.len(), clones);
            }
            other => println!("  {other:?}"),
        }
    }
}

fn main() {
    println!("Portfolio Slider Demo");
    println!("=====================");
    println!();

    let slides = (0..5)
        .map(|i| Slide::new(i, if i % 2 == 0 { 480.0 } else { 320.0 }))
        .collect();
    let config = SliderConfig {
        gap: 24.0,
        ..SliderConfig::default()
    };

    let Some(mut slider) = SliderController::mount(slides, TrackMetrics::new(1440.0, 1440.0), config)
    else {
        println!("No slides, nothing to do.");
        return;
    };

    show("init (desktop)", &slider.init());
    show("arrow left", &slider.handle(SliderEvent::ArrowLeft));
    show("transition end", &slider.handle(SliderEvent::TransitionEnd));

    let mobile = TrackMetrics::new(390.0, 390.0);
    show("resize to mobile", &slider.handle(SliderEvent::Resize { metrics: mobile }));
    show("scroll near start", &slider.handle(SliderEvent::Scroll { scroll_left: 120.0 }));
    show("animation frame", &slider.handle(SliderEvent::AnimationFrame));
    show("tap slide 7", &slider.handle(SliderEvent::SlideClicked { index: 7 }));

    println!();
    println!(
        "Active slide: physical {} / logical {} of {} rendered",
        slider.active_index(),
        slider.logical_index(),
        slider.slide_count()
    );
}
