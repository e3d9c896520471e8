//! Floating-bar visibility controller.
//!
//! Decides, from a stream of scroll-position samples, whether the persistent
//! call-to-action bar should carry its `visible` flag. The controller is a
//! pure state machine: it never touches the DOM and never schedules anything
//! itself. Instead it owns the two pending-operation slots (one coalesced
//! frame recompute, one delayed reveal) and tells the host what to do through
//! [`FrameOutcome`] values. The host in `page::scroll` maps those onto
//! `requestAnimationFrame` / `setTimeout`; the tests drive them with a manual
//! clock.
//!
//! Transition rules:
//! - Hides are never delayed: an offset at or below the threshold commits
//!   `Hidden` in the same recompute and disarms any pending reveal.
//! - Reveals are always delayed by the debounce window, and re-arming
//!   replaces the previous deadline (cancel-and-replace, never stacking).
//! - At most one visibility change happens per recompute.

use serde::Serialize;

/// Visibility state of the floating bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    /// Bar is hidden. Initial state.
    Hidden,
    /// Offset crossed the threshold; a delayed reveal is armed.
    PendingReveal,
    /// Bar carries the visible flag.
    Shown,
}

impl BarState {
    /// Stable lowercase name, used for JS-facing introspection.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hidden => "hidden",
            Self::PendingReveal => "pending-reveal",
            Self::Shown => "shown",
        }
    }
}

/// Tuning for the visibility controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatBarConfig {
    /// Offset (px) at or below which the bar is always hidden.
    pub threshold_px: f64,
    /// Debounce window (ms) between crossing the threshold and revealing.
    pub reveal_delay_ms: f64,
    /// Require the offset to be increasing relative to the last settled
    /// sample before a reveal is allowed (scroll-direction gate).
    pub require_increasing_offset: bool,
}

impl Default for FloatBarConfig {
    fn default() -> Self {
        Self {
            threshold_px: 300.0,
            reveal_delay_ms: 100.0,
            require_increasing_offset: false,
        }
    }
}

/// What the host must do after a frame recompute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Nothing to do.
    None,
    /// Remove the visible flag from the bar now.
    Hide,
    /// Cancel the pending reveal timer; the bar stays hidden.
    DisarmReveal,
    /// Schedule (or reschedule) the reveal timer for `reveal_delay_ms`.
    ArmReveal,
}

/// Counters for observing controller behavior from JS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FloatBarMetrics {
    /// Scroll samples delivered to the controller.
    pub samples: u64,
    /// Samples absorbed by an already-pending frame recompute.
    pub coalesced: u64,
    /// Frame recomputes executed.
    pub recomputes: u64,
    /// Delayed reveals armed or re-armed.
    pub reveals_armed: u64,
    /// Armed reveals cancelled before taking effect.
    pub reveals_cancelled: u64,
    /// Reveals that fired and showed the bar.
    pub reveals_fired: u64,
    /// Shown-to-hidden transitions.
    pub hides: u64,
}

/// The scroll visibility controller.
///
/// Invariant: `reveal_deadline` is `Some` exactly when `state` is
/// [`BarState::PendingReveal`], and at most one frame recompute is pending
/// at any instant.
#[derive(Debug, Clone)]
pub struct FloatBarController {
    config: FloatBarConfig,
    state: BarState,
    frame_pending: bool,
    reveal_deadline: Option<f64>,
    last_settled_offset: f64,
    metrics: FloatBarMetrics,
}

impl FloatBarController {
    #[must_use]
    pub fn new(config: FloatBarConfig) -> Self {
        Self {
            config,
            state: BarState::Hidden,
            frame_pending: false,
            reveal_deadline: None,
            last_settled_offset: 0.0,
            metrics: FloatBarMetrics::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> FloatBarConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> BarState {
        self.state
    }

    /// Whether the bar currently carries the visible flag.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.state == BarState::Shown
    }

    #[must_use]
    pub fn frame_pending(&self) -> bool {
        self.frame_pending
    }

    /// Absolute deadline (ms) of the armed reveal, if any.
    #[must_use]
    pub fn reveal_deadline(&self) -> Option<f64> {
        self.reveal_deadline
    }

    #[must_use]
    pub fn metrics(&self) -> FloatBarMetrics {
        self.metrics
    }

    /// Record a raw scroll event.
    ///
    /// Returns `true` when the host must schedule a frame recompute; while
    /// one is already pending, further samples coalesce into it and return
    /// `false`. Hosts without a display-refresh primitive may call
    /// [`Self::on_frame`] synchronously after every `true` (correct, but no
    /// coalescing).
    pub fn on_scroll(&mut self) -> bool {
        self.metrics.samples += 1;
        if self.frame_pending {
            self.metrics.coalesced += 1;
            return false;
        }
        self.frame_pending = true;
        true
    }

    /// Run the frame recompute with the latest offset.
    ///
    /// Clears the pending-frame slot and commits at most one transition.
    /// The offset read here becomes the settled sample the direction gate
    /// compares against; samples coalesced into a pending frame never settle.
    pub fn on_frame(&mut self, offset: f64, now_ms: f64) -> FrameOutcome {
        self.frame_pending = false;
        self.metrics.recomputes += 1;
        let offset = offset.max(0.0);
        let prev_offset = self.last_settled_offset;
        self.last_settled_offset = offset;

        if offset <= self.config.threshold_px {
            let had_reveal = self.reveal_deadline.take().is_some();
            if had_reveal {
                self.metrics.reveals_cancelled += 1;
            }
            let was_shown = self.state == BarState::Shown;
            self.state = BarState::Hidden;
            if was_shown {
                self.metrics.hides += 1;
                return FrameOutcome::Hide;
            }
            if had_reveal {
                return FrameOutcome::DisarmReveal;
            }
            return FrameOutcome::None;
        }

        match self.state {
            BarState::Shown => FrameOutcome::None,
            BarState::Hidden | BarState::PendingReveal => {
                if self.config.require_increasing_offset && offset <= prev_offset {
                    // Upward motion never reveals; it also disarms a reveal
                    // armed on the way down.
                    let had_reveal = self.reveal_deadline.take().is_some();
                    self.state = BarState::Hidden;
                    if had_reveal {
                        self.metrics.reveals_cancelled += 1;
                        return FrameOutcome::DisarmReveal;
                    }
                    return FrameOutcome::None;
                }
                self.state = BarState::PendingReveal;
                self.reveal_deadline = Some(now_ms + self.config.reveal_delay_ms);
                self.metrics.reveals_armed += 1;
                FrameOutcome::ArmReveal
            }
        }
    }

    /// The reveal timer fired.
    ///
    /// Returns `true` when the bar transitions to shown and the host must
    /// apply the visible flag. Stale callbacks (no armed reveal, or a
    /// deadline that was pushed forward since the timer was set) are ignored.
    /// An offset that dropped back to the threshold settles the controller
    /// hidden instead.
    pub fn on_reveal_elapsed(&mut self, offset: f64, now_ms: f64) -> bool {
        let Some(deadline) = self.reveal_deadline else {
            return false;
        };
        if now_ms < deadline {
            return false;
        }
        self.reveal_deadline = None;
        let offset = offset.max(0.0);
        if offset <= self.config.threshold_px {
            self.state = BarState::Hidden;
            self.last_settled_offset = offset;
            self.metrics.reveals_cancelled += 1;
            return false;
        }
        self.state = BarState::Shown;
        self.last_settled_offset = offset;
        self.metrics.reveals_fired += 1;
        true
    }

    /// Drop all pending work and return to the initial state.
    ///
    /// Metrics survive a reset; they describe the lifetime of the instance.
    pub fn reset(&mut self) {
        self.state = BarState::Hidden;
        self.frame_pending = false;
        self.reveal_deadline = None;
        self.last_settled_offset = 0.0;
    }
}
