//! Main PageFx struct - the entry point for the landing-page layer.
//!
//! This module provides the WASM-exported `PageFx` struct that handles:
//! - The scroll-driven floating call-to-action bar
//! - Reveal-on-scroll animations and lazy images (IntersectionObserver)
//! - FAQ accordion, CTA buttons, video cards, parallax glow
//! - Touch polish, accessibility attributes, the Konami easter egg
//!
//! Event handlers are registered when the instance is created and removed by
//! `detach()` - no manual JavaScript wiring required. Any missing DOM target
//! silently disables just the piece of wiring that wanted it.

mod events;
mod observe;
mod scroll;

use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlElement,
    IntersectionObserver, KeyboardEvent, MouseEvent,
};

#[cfg(target_arch = "wasm32")]
use crate::error::PagefxError;
use crate::floatbar::FloatBarController;
#[cfg(not(target_arch = "wasm32"))]
use crate::floatbar::FloatBarMetrics;
#[cfg(target_arch = "wasm32")]
use crate::input::DoubleTapGuard;
use crate::input::KonamiTracker;
use crate::options::PageFxOptions;

/// CSS class applied by the visibility controller and the reveal observer.
#[cfg(target_arch = "wasm32")]
pub(crate) const VISIBLE_CLASS: &str = "visible";

/// Selector for elements revealed on first intersection.
#[cfg(target_arch = "wasm32")]
pub(crate) const ANIMATED_SELECTOR: &str =
    ".animate-fade-up, .animate-slide-left, .animate-slide-right, .animate-scale-up";
/// IntersectionObserver threshold for reveal animations.
#[cfg(target_arch = "wasm32")]
pub(crate) const REVEAL_THRESHOLD: f64 = 0.1;
/// Bottom margin so elements reveal slightly before fully entering the viewport.
#[cfg(target_arch = "wasm32")]
pub(crate) const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

/// Press feedback duration on CTA buttons (ms).
#[cfg(target_arch = "wasm32")]
pub(crate) const CTA_PRESS_RESET_MS: i32 = 150;
/// Play-button pulse duration on video cards (ms).
#[cfg(target_arch = "wasm32")]
pub(crate) const PLAY_PULSE_RESET_MS: i32 = 300;
/// Delay before restoring a video card's animation after a restart (ms).
#[cfg(target_arch = "wasm32")]
pub(crate) const CARD_ANIMATION_RESTART_MS: i32 = 10;
/// Rainbow easter-egg duration (ms).
#[cfg(target_arch = "wasm32")]
pub(crate) const RAINBOW_DURATION_MS: i32 = 5000;

/// Horizontal parallax amplitude of the hero glow (px).
#[cfg(target_arch = "wasm32")]
pub(crate) const GLOW_RANGE_X_PX: f64 = 50.0;
/// Vertical parallax amplitude of the hero glow (px).
#[cfg(target_arch = "wasm32")]
pub(crate) const GLOW_RANGE_Y_PX: f64 = 30.0;

// Timing helper for scheduling decisions.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_ms() -> f64 {
    if let Some(window) = web_sys::window() {
        if let Some(perf) = window.performance() {
            return perf.now();
        }
    }
    js_sys::Date::now()
}

/// Collect the elements matching `selector`, skipping non-element nodes.
#[cfg(target_arch = "wasm32")]
pub(crate) fn elements_matching(document: &Document, selector: &str) -> Vec<Element> {
    let mut out = Vec::new();
    if let Ok(list) = document.query_selector_all(selector) {
        for i in 0..list.length() {
            if let Some(el) = list
                .item(i)
                .and_then(|node| node.dyn_into::<Element>().ok())
            {
                out.push(el);
            }
        }
    }
    out
}

/// Shared state that can be accessed by event handlers (wasm32 only)
#[cfg(target_arch = "wasm32")]
pub(crate) struct SharedState {
    pub(crate) options: PageFxOptions,
    pub(crate) controller: FloatBarController,
    /// Floating bar element. `None` disables the scroll pipeline.
    pub(crate) bar: Option<HtmlElement>,
    pub(crate) frame_handle: Option<i32>,
    pub(crate) frame_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) reveal_timer: Option<i32>,
    pub(crate) reveal_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) konami: KonamiTracker,
    pub(crate) rainbow_timer: Option<i32>,
    pub(crate) rainbow_closure: Option<Closure<dyn FnMut()>>,
    pub(crate) tap_guard: DoubleTapGuard,
}

/// Registered listeners, retained so `detach()` can remove them.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    mouse: Vec<(EventTarget, &'static str, Closure<dyn FnMut(MouseEvent)>)>,
    key: Vec<(EventTarget, &'static str, Closure<dyn FnMut(KeyboardEvent)>)>,
    generic: Vec<(EventTarget, &'static str, Closure<dyn FnMut(Event)>)>,
}

#[cfg(target_arch = "wasm32")]
impl ListenerRegistry {
    pub(crate) fn add_mouse(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(MouseEvent)>,
    ) {
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        self.mouse.push((target.clone(), kind, closure));
    }

    pub(crate) fn add_key(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(KeyboardEvent)>,
    ) {
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        self.key.push((target.clone(), kind, closure));
    }

    pub(crate) fn add_generic(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) {
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        self.generic.push((target.clone(), kind, closure));
    }

    /// Non-passive registration for listeners that call `preventDefault()`
    /// on touch events.
    pub(crate) fn add_generic_nonpassive(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(false);
        let _ = target.add_event_listener_with_callback_and_add_event_listener_options(
            kind,
            closure.as_ref().unchecked_ref(),
            &opts,
        );
        self.generic.push((target.clone(), kind, closure));
    }

    pub(crate) fn remove_all(&mut self) {
        for (target, kind, closure) in self.mouse.drain(..) {
            let _ =
                target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
        for (target, kind, closure) in self.key.drain(..) {
            let _ =
                target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
        for (target, kind, closure) in self.generic.drain(..) {
            let _ =
                target.remove_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        }
    }
}

/// The main landing-page handle exported to JavaScript
#[wasm_bindgen]
pub struct PageFx {
    #[cfg(target_arch = "wasm32")]
    state: Rc<RefCell<SharedState>>,
    #[cfg(target_arch = "wasm32")]
    listeners: ListenerRegistry,
    #[cfg(target_arch = "wasm32")]
    reveal_observer: Option<IntersectionObserver>,
    #[cfg(target_arch = "wasm32")]
    #[allow(dead_code)] // Kept to keep the observer callback alive
    reveal_observer_closure: Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>,
    #[cfg(target_arch = "wasm32")]
    lazy_observer: Option<IntersectionObserver>,
    #[cfg(target_arch = "wasm32")]
    #[allow(dead_code)]
    lazy_observer_closure: Option<Closure<dyn FnMut(js_sys::Array, IntersectionObserver)>>,
    #[cfg(target_arch = "wasm32")]
    attached: bool,

    // Non-wasm32 fields
    #[cfg(not(target_arch = "wasm32"))]
    controller: FloatBarController,
    #[cfg(not(target_arch = "wasm32"))]
    #[allow(dead_code)]
    konami: KonamiTracker,
    #[cfg(not(target_arch = "wasm32"))]
    options: PageFxOptions,
}

// ============================================================================
// WASM32 Implementation
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl PageFx {
    /// Attach the interaction layer to the current document.
    ///
    /// `options` is a plain JS object (see `PageFxOptions`); `undefined` or
    /// `{}` gives the stock behavior. Every listener this wires is removed
    /// again by [`Self::detach`].
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<PageFx, JsValue> {
        console_error_panic_hook::set_once();

        let options: PageFxOptions = if options.is_undefined() || options.is_null() {
            PageFxOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| PagefxError::Options(e.to_string()))?
        };

        let window = web_sys::window().ok_or(PagefxError::NoDocument)?;
        let document = window.document().ok_or(PagefxError::NoDocument)?;

        // Missing bar element: the scroll pipeline becomes a no-op rather
        // than an error.
        let bar = document
            .get_element_by_id(&options.floating_bar_id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok());
        let controller = FloatBarController::new(options.float_bar_config());

        let state = Rc::new(RefCell::new(SharedState {
            options,
            controller,
            bar,
            frame_handle: None,
            frame_closure: None,
            reveal_timer: None,
            reveal_closure: None,
            konami: KonamiTracker::new(),
            rainbow_timer: None,
            rainbow_closure: None,
            tap_guard: DoubleTapGuard::new(),
        }));

        let mut listeners = ListenerRegistry::default();
        Self::setup_scroll_pipeline(&state, &mut listeners, &window);
        Self::setup_faq(&state, &document, &mut listeners);
        Self::setup_cta_buttons(&state, &document, &mut listeners);
        Self::setup_video_cards(&state, &document, &mut listeners);
        Self::setup_parallax(&document, &window, &mut listeners);
        Self::setup_carousel(&document, &mut listeners);
        Self::setup_touch(&state, &document, &mut listeners);
        Self::setup_easter_egg(&state, &document, &mut listeners);
        Self::setup_page_load(&state, &document, &window, &mut listeners);

        let (reveal_observer, reveal_observer_closure) = Self::setup_reveal_observer(&document);
        let (lazy_observer, lazy_observer_closure) = Self::setup_lazy_images(&document);

        Ok(PageFx {
            state,
            listeners,
            reveal_observer,
            reveal_observer_closure,
            lazy_observer,
            lazy_observer_closure,
            attached: true,
        })
    }

    /// Remove every listener, cancel pending frame/timer work, and disconnect
    /// the observers. Idempotent.
    #[wasm_bindgen]
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;

        self.listeners.remove_all();
        if let Some(observer) = self.reveal_observer.take() {
            observer.disconnect();
        }
        self.reveal_observer_closure = None;
        if let Some(observer) = self.lazy_observer.take() {
            observer.disconnect();
        }
        self.lazy_observer_closure = None;

        let window = web_sys::window();
        let mut s = self.state.borrow_mut();
        if let Some(handle) = s.frame_handle.take() {
            if let Some(window) = window.as_ref() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
        if let Some(timer_id) = s.reveal_timer.take() {
            if let Some(window) = window.as_ref() {
                window.clear_timeout_with_handle(timer_id);
            }
        }
        if let Some(timer_id) = s.rainbow_timer.take() {
            if let Some(window) = window.as_ref() {
                window.clear_timeout_with_handle(timer_id);
            }
        }
        s.frame_closure = None;
        s.reveal_closure = None;
        s.rainbow_closure = None;
        s.controller.reset();
    }

    /// Whether the layer is currently attached.
    #[wasm_bindgen]
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Whether the floating bar currently carries the visible flag.
    #[wasm_bindgen]
    pub fn bar_visible(&self) -> bool {
        self.state.borrow().controller.is_shown()
    }

    /// Controller state name: `hidden`, `pending-reveal`, or `shown`.
    #[wasm_bindgen]
    pub fn bar_state(&self) -> String {
        self.state.borrow().controller.state().name().to_string()
    }

    /// Controller counters as a JS object.
    #[wasm_bindgen]
    pub fn scroll_metrics(&self) -> Result<JsValue, JsValue> {
        let metrics = self.state.borrow().controller.metrics();
        serde_wasm_bindgen::to_value(&metrics)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Controller counters as a JSON string.
    #[wasm_bindgen]
    pub fn scroll_metrics_json(&self) -> Result<String, JsValue> {
        let metrics = self.state.borrow().controller.metrics();
        serde_json::to_string(&metrics).map_err(|e| PagefxError::from(e).into())
    }
}

#[cfg(target_arch = "wasm32")]
impl PageFx {
    /// Toggle the bar's presentation flag. The CSS owns the actual
    /// opacity/position animation.
    pub(crate) fn set_bar_visible(state: &Rc<RefCell<SharedState>>, visible: bool) {
        let bar = state.borrow().bar.clone();
        let Some(bar) = bar else {
            return;
        };
        let class_list = bar.class_list();
        let _ = if visible {
            class_list.add_1(VISIBLE_CLASS)
        } else {
            class_list.remove_1(VISIBLE_CLASS)
        };
    }

    pub(crate) fn log_interaction(state: &Rc<RefCell<SharedState>>, message: &str) {
        if state.borrow().options.interaction_logging {
            web_sys::console::log_1(&JsValue::from_str(message));
        }
    }
}

// ============================================================================
// Non-WASM32 Implementation (for testing)
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
impl PageFx {
    /// Create a detached instance (non-wasm version for testing)
    #[must_use]
    pub fn new_native(options: PageFxOptions) -> Self {
        let controller = FloatBarController::new(options.float_bar_config());
        PageFx {
            controller,
            konami: KonamiTracker::new(),
            options,
        }
    }

    #[must_use]
    pub fn bar_visible(&self) -> bool {
        self.controller.is_shown()
    }

    #[must_use]
    pub fn bar_state(&self) -> &'static str {
        self.controller.state().name()
    }

    /// Direct access to the controller so tests can drive the sample stream.
    pub fn controller_mut(&mut self) -> &mut FloatBarController {
        &mut self.controller
    }

    #[must_use]
    pub fn scroll_metrics(&self) -> FloatBarMetrics {
        self.controller.metrics()
    }

    /// Controller counters as a JSON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn scroll_metrics_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(&self.controller.metrics())?)
    }

    #[must_use]
    pub fn options(&self) -> &PageFxOptions {
        &self.options
    }
}
