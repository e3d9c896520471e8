//! Click, keyboard, mouse, and touch glue for `PageFx`.
//!
//! Each `setup_*` here wires one independent landing-page behavior. All of
//! them degrade to a no-op when their DOM target is missing, and every
//! listener goes through the registry so `detach()` can unwind it.

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::{
    Document, ErrorEvent, Event, HtmlElement, HtmlImageElement, KeyboardEvent, MouseEvent,
    ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

#[cfg(target_arch = "wasm32")]
use super::{
    elements_matching, now_ms, ListenerRegistry, PageFx, SharedState, CARD_ANIMATION_RESTART_MS,
    CTA_PRESS_RESET_MS, GLOW_RANGE_X_PX, GLOW_RANGE_Y_PX, PLAY_PULSE_RESET_MS,
    RAINBOW_DURATION_MS,
};

#[cfg(target_arch = "wasm32")]
impl PageFx {
    /// FAQ accordion: opening one item closes the others.
    pub(crate) fn setup_faq(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        listeners: &mut ListenerRegistry,
    ) {
        let items = elements_matching(document, ".faq-item");
        for item in &items {
            let Ok(Some(question)) = item.query_selector(".faq-question") else {
                continue;
            };
            let _ = question.set_attribute(
                "aria-expanded",
                if item.class_list().contains("active") {
                    "true"
                } else {
                    "false"
                },
            );

            let state = state.clone();
            let item_ref = item.clone();
            let question_ref = question.clone();
            let siblings = items.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let was_active = item_ref.class_list().contains("active");
                for other in &siblings {
                    if other != &item_ref {
                        let _ = other.class_list().remove_1("active");
                    }
                }
                let _ = if was_active {
                    item_ref.class_list().remove_1("active")
                } else {
                    item_ref.class_list().add_1("active")
                };
                let _ = question_ref
                    .set_attribute("aria-expanded", if was_active { "false" } else { "true" });
                if let Some(text) = question_ref.text_content() {
                    Self::log_interaction(&state, &format!("FAQ toggled: {}", text.trim()));
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            listeners.add_mouse(question.as_ref(), "click", closure);
        }
    }

    /// CTA buttons: press feedback, smooth-scroll to pricing, ARIA labels.
    pub(crate) fn setup_cta_buttons(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        listeners: &mut ListenerRegistry,
    ) {
        let pricing_id = state.borrow().options.pricing_section_id.clone();
        for button in elements_matching(document, ".cta-btn") {
            let Ok(button) = button.dyn_into::<HtmlElement>() else {
                continue;
            };
            if button.get_attribute("aria-label").is_none() {
                if let Some(text) = button.text_content() {
                    let _ = button.set_attribute("aria-label", text.trim());
                }
            }

            let state = state.clone();
            let button_ref = button.clone();
            let pricing_id = pricing_id.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let _ = button_ref.style().set_property("transform", "scale(0.95)");
                Self::reset_style_later(&button_ref, "transform", CTA_PRESS_RESET_MS);
                Self::scroll_to_section(&pricing_id);
                if let Some(text) = button_ref.text_content() {
                    Self::log_interaction(&state, &format!("CTA button clicked: {}", text.trim()));
                }
            }) as Box<dyn FnMut(MouseEvent)>);
            listeners.add_mouse(button.as_ref(), "click", closure);
        }
    }

    /// Video cards: click/keyboard activation with pulse feedback, plus the
    /// keyboard-navigation attributes.
    pub(crate) fn setup_video_cards(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        listeners: &mut ListenerRegistry,
    ) {
        for card in elements_matching(document, ".video-card") {
            let Ok(card) = card.dyn_into::<HtmlElement>() else {
                continue;
            };
            let _ = card.set_attribute("tabindex", "0");
            let _ = card.set_attribute("role", "button");
            if let Ok(Some(title)) = card.query_selector(".video-title") {
                if let Some(text) = title.text_content() {
                    let _ = card.set_attribute("aria-label", text.trim());
                }
            }

            {
                let state = state.clone();
                let card_ref = card.clone();
                let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                    Self::activate_video_card(&state, &card_ref);
                }) as Box<dyn FnMut(MouseEvent)>);
                listeners.add_mouse(card.as_ref(), "click", closure);
            }

            {
                let state = state.clone();
                let card_ref = card.clone();
                let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
                    let key = event.key();
                    if key == "Enter" || key == " " {
                        event.prevent_default();
                        Self::activate_video_card(&state, &card_ref);
                    }
                }) as Box<dyn FnMut(KeyboardEvent)>);
                listeners.add_key(card.as_ref(), "keydown", closure);
            }
        }
    }

    fn activate_video_card(state: &Rc<RefCell<SharedState>>, card: &HtmlElement) {
        // Restart the card's pulse animation from the top.
        let _ = card.style().set_property("animation", "none");
        Self::reset_style_later(card, "animation", CARD_ANIMATION_RESTART_MS);

        if let Ok(Some(play)) = card.query_selector(".play-button") {
            if let Ok(play) = play.dyn_into::<HtmlElement>() {
                let _ = play
                    .style()
                    .set_property("transform", "translate(-50%, -50%) scale(1.2)");
                Self::reset_style_later(&play, "transform", PLAY_PULSE_RESET_MS);
            }
        }
        if let Ok(Some(title)) = card.query_selector(".video-title") {
            if let Some(text) = title.text_content() {
                Self::log_interaction(state, &format!("Video card clicked: {}", text.trim()));
            }
        }
    }

    /// Cursor-parallax hero glow.
    pub(crate) fn setup_parallax(
        document: &Document,
        window: &Window,
        listeners: &mut ListenerRegistry,
    ) {
        let Ok(Some(glow)) = document.query_selector(".hero-glow") else {
            return;
        };
        let Ok(glow) = glow.dyn_into::<HtmlElement>() else {
            return;
        };
        let window_ref = window.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let width = window_ref
                .inner_width()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let height = window_ref
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            if width <= 0.0 || height <= 0.0 {
                return;
            }
            let mouse_x = f64::from(event.client_x()) / width;
            let mouse_y = f64::from(event.client_y()) / height;
            let _ = glow.style().set_property(
                "transform",
                &format!(
                    "translateX(calc(-50% + {}px)) translateY({}px)",
                    mouse_x * GLOW_RANGE_X_PX,
                    mouse_y * GLOW_RANGE_Y_PX
                ),
            );
        }) as Box<dyn FnMut(MouseEvent)>);
        listeners.add_mouse(window.as_ref(), "mousemove", closure);
    }

    /// Pause the testimonial carousel while hovered.
    pub(crate) fn setup_carousel(document: &Document, listeners: &mut ListenerRegistry) {
        let Ok(Some(track)) = document.query_selector(".carousel-track") else {
            return;
        };
        let Ok(track) = track.dyn_into::<HtmlElement>() else {
            return;
        };

        {
            let track_ref = track.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let _ = track_ref
                    .style()
                    .set_property("animation-play-state", "paused");
            }) as Box<dyn FnMut(MouseEvent)>);
            listeners.add_mouse(track.as_ref(), "mouseenter", closure);
        }
        {
            let track_ref = track.clone();
            let closure = Closure::wrap(Box::new(move |_event: MouseEvent| {
                let _ = track_ref
                    .style()
                    .set_property("animation-play-state", "running");
            }) as Box<dyn FnMut(MouseEvent)>);
            listeners.add_mouse(track.as_ref(), "mouseleave", closure);
        }
    }

    /// Touch polish: the `touch-device` body class and double-tap zoom
    /// suppression.
    pub(crate) fn setup_touch(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        listeners: &mut ListenerRegistry,
    ) {
        if let Some(window) = web_sys::window() {
            let has_touch = js_sys::Reflect::has(window.as_ref(), &JsValue::from_str("ontouchstart"))
                .unwrap_or(false);
            if has_touch {
                if let Some(body) = document.body() {
                    let _ = body.class_list().add_1("touch-device");
                }
            }
        }

        let state = state.clone();
        let closure = Closure::wrap(Box::new(move |event: Event| {
            if state.borrow_mut().tap_guard.register_tap(now_ms()) {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add_generic_nonpassive(document.as_ref(), "touchend", closure);
    }

    /// Konami-code easter egg: a full match runs a rainbow hue-rotate on the
    /// body for a few seconds.
    pub(crate) fn setup_easter_egg(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        listeners: &mut ListenerRegistry,
    ) {
        if !state.borrow().options.easter_egg {
            return;
        }
        Self::inject_rainbow_keyframes(document);

        let state_clone = state.clone();
        let closure = Closure::wrap(Box::new(move |event: KeyboardEvent| {
            let matched = state_clone.borrow_mut().konami.press(&event.key());
            if matched {
                Self::start_rainbow(&state_clone);
            }
        }) as Box<dyn FnMut(KeyboardEvent)>);
        listeners.add_key(document.as_ref(), "keydown", closure);
    }

    fn inject_rainbow_keyframes(document: &Document) {
        // Once per document, even across attach/detach cycles.
        if let Ok(Some(_)) = document.query_selector("style[data-pagefx-rainbow]") {
            return;
        }
        let Ok(style) = document.create_element("style") else {
            return;
        };
        let _ = style.set_attribute("data-pagefx-rainbow", "");
        style.set_text_content(Some(
            "@keyframes pagefx-rainbow { 0% { filter: hue-rotate(0deg); } 100% { filter: hue-rotate(360deg); } }",
        ));
        if let Some(head) = document.head() {
            let _ = head.append_child(&style);
        }
    }

    fn start_rainbow(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(body) = window.document().and_then(|d| d.body()) else {
            return;
        };
        let _ = body
            .style()
            .set_property("animation", "pagefx-rainbow 2s linear infinite");

        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.rainbow_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.rainbow_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    state.borrow_mut().rainbow_timer = None;
                }
                if let Some(body) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.body())
                {
                    let _ = body.style().remove_property("animation");
                }
            }) as Box<dyn FnMut()>);
            s.rainbow_closure = Some(closure);
        }
        if let Some(callback) = s.rainbow_closure.as_ref() {
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                RAINBOW_DURATION_MS,
            ) {
                Ok(id) => s.rainbow_timer = Some(id),
                Err(_) => s.rainbow_timer = None,
            }
        }
    }

    /// Page-load polish: the `loaded` body class, eager marking of
    /// hero/sample images, and the page-error console logger.
    pub(crate) fn setup_page_load(
        state: &Rc<RefCell<SharedState>>,
        document: &Document,
        window: &Window,
        listeners: &mut ListenerRegistry,
    ) {
        let document_ref = document.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            if let Some(body) = document_ref.body() {
                let _ = body.class_list().add_1("loaded");
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.add_generic(window.as_ref(), "load", closure);

        Self::mark_critical_images(document, listeners);

        if state.borrow().options.interaction_logging {
            let closure = Closure::wrap(Box::new(move |event: Event| {
                if let Some(error) = event.dyn_ref::<ErrorEvent>() {
                    web_sys::console::error_1(&JsValue::from_str(&format!(
                        "Page error: {}",
                        error.message()
                    )));
                }
            }) as Box<dyn FnMut(Event)>);
            listeners.add_generic(window.as_ref(), "error", closure);
        }
    }

    /// Images already decoded get the `loaded` class now; the rest get a
    /// registry-tracked `load` listener so `detach()` unwinds them too.
    fn mark_critical_images(document: &Document, listeners: &mut ListenerRegistry) {
        for element in elements_matching(document, ".hero img, .samples img") {
            let Ok(img) = element.dyn_into::<HtmlImageElement>() else {
                continue;
            };
            if img.complete() {
                let _ = img.class_list().add_1("loaded");
            } else {
                let img_ref = img.clone();
                let closure = Closure::wrap(Box::new(move |_event: Event| {
                    let _ = img_ref.class_list().add_1("loaded");
                }) as Box<dyn FnMut(Event)>);
                listeners.add_generic(img.as_ref(), "load", closure);
            }
        }
    }

    /// Clear an inline style property after `delay_ms`, handing control back
    /// to the stylesheet. One-shot closures free themselves once invoked.
    fn reset_style_later(element: &HtmlElement, property: &'static str, delay_ms: i32) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let element = element.clone();
        let callback = Closure::once_into_js(move || {
            let _ = element.style().remove_property(property);
        });
        let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms,
        );
    }

    fn scroll_to_section(id: &str) {
        let Some(section) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        section.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
