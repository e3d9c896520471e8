//! pagefx - landing-page interaction layer for the web
//!
//! Drives the interactive behavior of a marketing landing page from
//! WebAssembly:
//! - Scroll-driven floating call-to-action bar (frame-coalesced, debounced)
//! - Reveal-on-scroll entrance animations via IntersectionObserver
//! - FAQ accordion, video cards, CTA buttons
//! - Cursor-parallax hero glow, lazy images, touch-device polish
//! - Konami-code easter egg
//!
//! The floating-bar visibility controller is a pure state machine
//! ([`floatbar::FloatBarController`]) that builds and tests natively; the DOM
//! wiring around it lives in [`page`] and only compiles for wasm32.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { PageFx } from 'pagefx';
//! await init();
//! const fx = new PageFx({ floatingBarId: 'floatingBar', thresholdPx: 300 });
//! // later, e.g. on SPA navigation:
//! fx.detach();
//! ```

// Core state machines (target-independent)
pub mod error;
pub mod floatbar;
pub mod input;
pub mod options;

// DOM wiring (wasm32)
pub mod page;

use wasm_bindgen::prelude::*;

// Re-export the main entry point
pub use page::PageFx;

pub use floatbar::{BarState, FloatBarConfig, FloatBarController, FloatBarMetrics, FrameOutcome};
pub use input::{DoubleTapGuard, KonamiTracker};
pub use options::PageFxOptions;

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
