//! Floating-bar visibility controller tests
//!
//! Drives the controller the way the browser wiring does — scroll samples,
//! frame recomputes, a cancellable reveal timer — but with a manual clock,
//! so every timing window is deterministic.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::float_cmp,
    clippy::panic
)]

use pagefx::{BarState, FloatBarConfig, FloatBarController, FrameOutcome};
use test_case::test_case;

/// Simulated host: mirrors what `page::scroll` does with each outcome.
struct Harness {
    controller: FloatBarController,
    now: f64,
    offset: f64,
    frame_scheduled: bool,
    reveal_fires_at: Option<f64>,
    visible_flag: bool,
}

impl Harness {
    fn new(config: FloatBarConfig) -> Self {
        Self {
            controller: FloatBarController::new(config),
            now: 0.0,
            offset: 0.0,
            frame_scheduled: false,
            reveal_fires_at: None,
            visible_flag: false,
        }
    }

    fn with_defaults() -> Self {
        Self::new(FloatBarConfig::default())
    }

    /// Deliver a raw scroll event at the given offset.
    fn scroll(&mut self, offset: f64) {
        self.offset = offset;
        if self.controller.on_scroll() {
            self.frame_scheduled = true;
        }
    }

    /// Run the scheduled frame recompute, if any.
    fn frame(&mut self) {
        if !self.frame_scheduled {
            return;
        }
        self.frame_scheduled = false;
        match self.controller.on_frame(self.offset, self.now) {
            FrameOutcome::None => {}
            FrameOutcome::Hide => self.visible_flag = false,
            FrameOutcome::DisarmReveal => self.reveal_fires_at = None,
            FrameOutcome::ArmReveal => {
                let delay = self.controller.config().reveal_delay_ms;
                self.reveal_fires_at = Some(self.now + delay);
            }
        }
    }

    /// Advance the clock, firing the reveal timer if its deadline passes.
    fn advance(&mut self, ms: f64) {
        let target = self.now + ms;
        if let Some(fires_at) = self.reveal_fires_at {
            if fires_at <= target {
                self.now = fires_at;
                self.reveal_fires_at = None;
                if self.controller.on_reveal_elapsed(self.offset, self.now) {
                    self.visible_flag = true;
                }
            }
        }
        self.now = target;
    }

    /// Scroll, recompute on the same tick, then advance.
    fn step(&mut self, offset: f64, ms_after: f64) {
        self.scroll(offset);
        self.frame();
        self.advance(ms_after);
    }

    fn state(&self) -> BarState {
        self.controller.state()
    }
}

// =============================================================================
// FINAL-STATE PROPERTIES
// =============================================================================

#[test_case(&[0.0]; "at top")]
#[test_case(&[500.0, 200.0]; "dip back below")]
#[test_case(&[350.0, 800.0, 299.0]; "ends just below threshold")]
#[test_case(&[300.0]; "exactly at threshold")]
fn test_sequences_ending_below_threshold_settle_hidden(offsets: &[f64]) {
    let mut h = Harness::with_defaults();
    for &offset in offsets {
        h.step(offset, 16.0);
    }
    h.advance(1000.0);
    assert_eq!(h.state(), BarState::Hidden);
    assert!(!h.visible_flag);
}

#[test_case(&[350.0]; "single sample")]
#[test_case(&[50.0, 400.0]; "cross once")]
#[test_case(&[500.0, 600.0, 700.0]; "keep scrolling down")]
#[test_case(&[301.0]; "just past threshold")]
fn test_sequences_ending_above_threshold_settle_shown(offsets: &[f64]) {
    let mut h = Harness::with_defaults();
    for &offset in offsets {
        h.step(offset, 16.0);
    }
    h.advance(200.0);
    assert_eq!(h.state(), BarState::Shown);
    assert!(h.visible_flag);
}

// =============================================================================
// DEBOUNCE WINDOW
// =============================================================================

#[test]
fn test_single_sample_pends_then_shows_after_delay() {
    let mut h = Harness::with_defaults();
    h.scroll(350.0);
    h.frame();
    assert_eq!(h.state(), BarState::PendingReveal);
    assert!(!h.visible_flag);

    h.advance(99.0);
    assert_eq!(h.state(), BarState::PendingReveal);

    h.advance(1.0);
    assert_eq!(h.state(), BarState::Shown);
    assert!(h.visible_flag);
}

#[test]
fn test_reveal_is_never_early() {
    let mut h = Harness::with_defaults();
    h.step(500.0, 50.0);
    assert_eq!(h.state(), BarState::PendingReveal);
    assert!(!h.visible_flag, "reveal fired inside the debounce window");
}

#[test]
fn test_burst_scenario_cancel_then_rearm() {
    // [0, 50, 500, 200, 600] inside one debounce window: the 200 cancels the
    // reveal armed by 500; the 600 arms a fresh one that has not yet elapsed.
    let mut h = Harness::with_defaults();
    for offset in [0.0, 50.0, 500.0, 200.0, 600.0] {
        h.step(offset, 10.0);
    }
    assert_eq!(h.state(), BarState::PendingReveal);
    assert!(!h.visible_flag);

    h.advance(100.0);
    assert_eq!(h.state(), BarState::Shown);
    assert!(h.visible_flag);
}

#[test]
fn test_rearm_restarts_the_window() {
    let mut h = Harness::with_defaults();
    h.step(400.0, 60.0);
    // Second above-threshold recompute replaces the deadline; the original
    // one (40ms away) must not fire.
    h.step(500.0, 60.0);
    assert_eq!(h.state(), BarState::PendingReveal);
    h.advance(40.0);
    assert_eq!(h.state(), BarState::Shown);
}

// =============================================================================
// HIDES ARE NEVER DELAYED
// =============================================================================

#[test]
fn test_hide_commits_in_the_same_recompute() {
    let mut h = Harness::with_defaults();
    h.step(500.0, 200.0);
    assert!(h.visible_flag);

    h.scroll(100.0);
    h.frame();
    assert_eq!(h.state(), BarState::Hidden);
    assert!(!h.visible_flag, "hide waited for a timer");
}

#[test]
fn test_below_threshold_disarms_pending_reveal() {
    let mut h = Harness::with_defaults();
    h.step(500.0, 10.0);
    assert_eq!(h.state(), BarState::PendingReveal);

    h.step(100.0, 0.0);
    assert_eq!(h.state(), BarState::Hidden);
    assert!(h.reveal_fires_at.is_none());

    // Nothing left to fire later.
    h.advance(1000.0);
    assert_eq!(h.state(), BarState::Hidden);
    assert!(!h.visible_flag);
}

#[test]
fn test_fractional_delay_reveals_with_whole_ms_timer() {
    // Browser timers take whole milliseconds, so a host must round the arm
    // duration up. Rounded down, the callback would land before the
    // controller's absolute deadline, be dropped as stale, and leave the
    // reveal pending forever.
    let mut c = FloatBarController::new(FloatBarConfig {
        reveal_delay_ms: 100.9,
        ..FloatBarConfig::default()
    });
    c.on_scroll();
    assert_eq!(c.on_frame(500.0, 0.0), FrameOutcome::ArmReveal);

    // A truncated timer fires early and must not consume the armed slot.
    assert!(!c.on_reveal_elapsed(500.0, 100.0));
    assert_eq!(c.state(), BarState::PendingReveal);
    assert!(c.reveal_deadline().is_some());

    // The rounded-up timer satisfies the deadline.
    let timer_ms = c.config().reveal_delay_ms.ceil();
    assert!(c.on_reveal_elapsed(500.0, timer_ms));
    assert_eq!(c.state(), BarState::Shown);
}

#[test]
fn test_reveal_firing_with_stale_low_offset_settles_hidden() {
    // The timer outlives a scroll back to the top whose frame never ran
    // (degenerate host). The firing reveal must not show the bar.
    let mut c = FloatBarController::new(FloatBarConfig::default());
    c.on_scroll();
    assert_eq!(c.on_frame(500.0, 0.0), FrameOutcome::ArmReveal);
    assert!(!c.on_reveal_elapsed(50.0, 100.0));
    assert_eq!(c.state(), BarState::Hidden);
}

// =============================================================================
// IDEMPOTENCE & COALESCING
// =============================================================================

#[test]
fn test_repeated_samples_settle_without_extra_transitions() {
    let mut h = Harness::with_defaults();
    for _ in 0..5 {
        h.step(600.0, 150.0);
    }
    assert_eq!(h.state(), BarState::Shown);
    let metrics = h.controller.metrics();
    assert_eq!(metrics.reveals_fired, 1);
    assert_eq!(metrics.reveals_armed, 1);

    for _ in 0..5 {
        h.step(10.0, 150.0);
    }
    assert_eq!(h.state(), BarState::Hidden);
    assert_eq!(h.controller.metrics().hides, 1);
}

#[test]
fn test_events_within_one_frame_interval_coalesce() {
    let mut h = Harness::with_defaults();
    for offset in [10.0, 20.0, 30.0, 40.0, 50.0] {
        h.scroll(offset);
    }
    h.frame();
    let metrics = h.controller.metrics();
    assert_eq!(metrics.samples, 5);
    assert_eq!(metrics.recomputes, 1);
    assert_eq!(metrics.coalesced, 4);
}

#[test]
fn test_coalesced_recompute_reads_the_latest_offset() {
    let mut h = Harness::with_defaults();
    h.scroll(600.0);
    h.scroll(100.0);
    h.frame();
    // Only the offset at recompute time counts; 600 was never settled.
    assert_eq!(h.state(), BarState::Hidden);
}

// =============================================================================
// DEGRADED MODE (no display-refresh primitive)
// =============================================================================

#[test]
fn test_synchronous_recompute_per_event_is_still_correct() {
    let mut c = FloatBarController::new(FloatBarConfig::default());
    let mut now = 0.0;
    for offset in [0.0, 50.0, 500.0, 200.0, 600.0] {
        assert!(c.on_scroll());
        c.on_frame(offset, now);
        now += 10.0;
    }
    assert_eq!(c.state(), BarState::PendingReveal);
    assert!(c.on_reveal_elapsed(600.0, now + 100.0));
    assert_eq!(c.state(), BarState::Shown);
    assert_eq!(c.metrics().coalesced, 0);
}

// =============================================================================
// DIRECTION GATE
// =============================================================================

fn gated() -> Harness {
    Harness::new(FloatBarConfig {
        require_increasing_offset: true,
        ..FloatBarConfig::default()
    })
}

#[test]
fn test_gate_allows_reveal_while_scrolling_down() {
    let mut h = gated();
    h.step(400.0, 16.0);
    h.step(500.0, 16.0);
    h.advance(100.0);
    assert_eq!(h.state(), BarState::Shown);
}

#[test]
fn test_gate_blocks_reveal_while_scrolling_up() {
    let mut h = gated();
    h.step(600.0, 16.0);
    assert_eq!(h.state(), BarState::PendingReveal);
    // Upward motion above the threshold disarms the pending reveal.
    h.step(450.0, 16.0);
    assert_eq!(h.state(), BarState::Hidden);
    h.advance(500.0);
    assert!(!h.visible_flag);
}

#[test]
fn test_gate_still_hides_immediately_below_threshold() {
    let mut h = gated();
    h.step(400.0, 16.0);
    h.step(500.0, 16.0);
    h.advance(100.0);
    assert!(h.visible_flag);

    h.step(250.0, 0.0);
    assert_eq!(h.state(), BarState::Hidden);
    assert!(!h.visible_flag);
}

#[test]
fn test_gate_rearms_after_direction_reverses_downward() {
    let mut h = gated();
    h.step(600.0, 16.0);
    h.step(450.0, 16.0);
    assert_eq!(h.state(), BarState::Hidden);
    h.step(520.0, 16.0);
    assert_eq!(h.state(), BarState::PendingReveal);
    h.advance(100.0);
    assert_eq!(h.state(), BarState::Shown);
}

// =============================================================================
// CONFIG
// =============================================================================

#[test]
fn test_custom_threshold_and_delay() {
    let mut h = Harness::new(FloatBarConfig {
        threshold_px: 100.0,
        reveal_delay_ms: 250.0,
        require_increasing_offset: false,
    });
    h.step(150.0, 200.0);
    assert_eq!(h.state(), BarState::PendingReveal);
    h.advance(50.0);
    assert_eq!(h.state(), BarState::Shown);

    h.step(100.0, 0.0);
    assert_eq!(h.state(), BarState::Hidden);
}

#[test]
fn test_negative_offsets_clamp_to_zero() {
    // Elastic overscroll on some platforms reports negative offsets.
    let mut h = Harness::with_defaults();
    h.step(-40.0, 16.0);
    assert_eq!(h.state(), BarState::Hidden);
}
