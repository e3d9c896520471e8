//! Scroll pipeline for the floating bar.
//!
//! Maps the controller's two pending-operation slots onto the browser's
//! scheduling primitives: the frame slot onto `requestAnimationFrame` and the
//! reveal slot onto a cancel-and-replace `setTimeout`. When no
//! display-refresh primitive is available the recompute runs synchronously on
//! each scroll event (coalescing is lost, hides stay immediate).

#[cfg(target_arch = "wasm32")]
use std::cell::RefCell;
#[cfg(target_arch = "wasm32")]
use std::rc::Rc;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::closure::Closure;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;
#[cfg(target_arch = "wasm32")]
use web_sys::Event;

#[cfg(target_arch = "wasm32")]
use super::{now_ms, ListenerRegistry, PageFx, SharedState};
#[cfg(target_arch = "wasm32")]
use crate::floatbar::FrameOutcome;

#[cfg(target_arch = "wasm32")]
impl PageFx {
    /// Wire the scroll listener on the window. A page without the floating
    /// bar element skips the whole pipeline.
    pub(crate) fn setup_scroll_pipeline(
        state: &Rc<RefCell<SharedState>>,
        listeners: &mut ListenerRegistry,
        window: &web_sys::Window,
    ) {
        if state.borrow().bar.is_none() {
            return;
        }
        let state_clone = state.clone();
        let closure = Closure::wrap(Box::new(move |_event: Event| {
            Self::handle_scroll(&state_clone);
        }) as Box<dyn FnMut(Event)>);
        listeners.add_generic(window.as_ref(), "scroll", closure);
    }

    /// Raw scroll event. Samples arriving while a recompute is already
    /// pending coalesce into it.
    pub(crate) fn handle_scroll(state: &Rc<RefCell<SharedState>>) {
        let schedule = state.borrow_mut().controller.on_scroll();
        if schedule {
            Self::schedule_frame(state);
        }
    }

    fn schedule_frame(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            Self::run_frame(state);
            return;
        };
        {
            let mut s = state.borrow_mut();
            if s.frame_closure.is_none() {
                let weak_state = Rc::downgrade(state);
                let closure = Closure::wrap(Box::new(move || {
                    if let Some(state) = weak_state.upgrade() {
                        PageFx::run_frame(&state);
                    }
                }) as Box<dyn FnMut()>);
                s.frame_closure = Some(closure);
            }
            if let Some(callback) = s.frame_closure.as_ref() {
                if let Ok(handle) =
                    window.request_animation_frame(callback.as_ref().unchecked_ref())
                {
                    s.frame_handle = Some(handle);
                    return;
                }
            }
        }
        // Degraded path: recompute synchronously on this event.
        Self::run_frame(state);
    }

    /// Frame recompute: read the latest offset and apply the outcome.
    pub(crate) fn run_frame(state: &Rc<RefCell<SharedState>>) {
        let outcome = {
            let mut s = state.borrow_mut();
            s.frame_handle = None;
            s.controller.on_frame(Self::scroll_offset(), now_ms())
        };
        match outcome {
            FrameOutcome::None => {}
            FrameOutcome::Hide => Self::set_bar_visible(state, false),
            FrameOutcome::DisarmReveal => Self::cancel_reveal_timeout(state),
            FrameOutcome::ArmReveal => Self::schedule_reveal_timeout(state),
        }
    }

    /// Arm the reveal timer, cancelling a previously armed one.
    fn schedule_reveal_timeout(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if let Some(timer_id) = s.reveal_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
        if s.reveal_closure.is_none() {
            let weak_state = Rc::downgrade(state);
            let closure = Closure::wrap(Box::new(move || {
                if let Some(state) = weak_state.upgrade() {
                    PageFx::handle_reveal_elapsed(&state);
                }
            }) as Box<dyn FnMut()>);
            s.reveal_closure = Some(closure);
        }
        let delay_ms = Self::timeout_ms(s.controller.config().reveal_delay_ms);
        if let Some(callback) = s.reveal_closure.as_ref() {
            match window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms,
            ) {
                Ok(id) => s.reveal_timer = Some(id),
                Err(_) => s.reveal_timer = None,
            }
        }
    }

    pub(crate) fn cancel_reveal_timeout(state: &Rc<RefCell<SharedState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        if let Some(timer_id) = state.borrow_mut().reveal_timer.take() {
            window.clear_timeout_with_handle(timer_id);
        }
    }

    fn handle_reveal_elapsed(state: &Rc<RefCell<SharedState>>) {
        let (revealed, still_armed) = {
            let mut s = state.borrow_mut();
            s.reveal_timer = None;
            let revealed = s.controller.on_reveal_elapsed(Self::scroll_offset(), now_ms());
            (revealed, s.controller.reveal_deadline().is_some())
        };
        if revealed {
            Self::set_bar_visible(state, true);
            return;
        }
        // A timer that lands ahead of the controller's deadline (clock skew
        // between the timer source and `now_ms`) re-arms rather than
        // stranding the pending reveal.
        if still_armed {
            Self::schedule_reveal_timeout(state);
        }
    }

    /// Current vertical scroll offset in pixels.
    pub(crate) fn scroll_offset() -> f64 {
        web_sys::window()
            .and_then(|w| w.page_y_offset().ok())
            .unwrap_or(0.0)
            .max(0.0)
    }

    /// Millisecond delay clamped into `setTimeout` range. Rounded up, never
    /// down: a timer armed for less than `reveal_delay_ms` would fire before
    /// the controller's absolute deadline and be dropped as stale, leaving
    /// the reveal permanently pending.
    #[allow(clippy::cast_possible_truncation)]
    fn timeout_ms(ms: f64) -> i32 {
        if ms.is_finite() && ms > 0.0 {
            ms.ceil().min(f64::from(i32::MAX)) as i32
        } else {
            0
        }
    }
}
