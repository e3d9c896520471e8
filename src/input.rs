//! Pure helpers for keyboard and touch glue: the Konami sequence matcher and
//! the double-tap zoom suppression window.

/// The classic sequence, as `KeyboardEvent.key` values.
pub const KONAMI_SEQUENCE: [&str; 10] = [
    "ArrowUp",
    "ArrowUp",
    "ArrowDown",
    "ArrowDown",
    "ArrowLeft",
    "ArrowRight",
    "ArrowLeft",
    "ArrowRight",
    "b",
    "a",
];

/// Sliding-window matcher over the last ten key presses.
#[derive(Debug, Clone, Default)]
pub struct KonamiTracker {
    recent: Vec<String>,
}

impl KonamiTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a key press; returns `true` when the window now holds the full
    /// sequence.
    pub fn press(&mut self, key: &str) -> bool {
        self.recent.push(key.to_string());
        let overflow = self.recent.len().saturating_sub(KONAMI_SEQUENCE.len());
        if overflow > 0 {
            self.recent.drain(..overflow);
        }
        self.recent.len() == KONAMI_SEQUENCE.len()
            && self
                .recent
                .iter()
                .map(String::as_str)
                .eq(KONAMI_SEQUENCE.iter().copied())
    }
}

/// Suppresses the iOS double-tap zoom: a second tap within the window gets
/// its default action cancelled.
#[derive(Debug, Clone, Copy, Default)]
pub struct DoubleTapGuard {
    last_tap_ms: Option<f64>,
}

impl DoubleTapGuard {
    /// Two taps closer together than this count as a double tap.
    pub const WINDOW_MS: f64 = 300.0;

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a tap at `now_ms`; returns `true` when the default action
    /// should be suppressed.
    pub fn register_tap(&mut self, now_ms: f64) -> bool {
        let suppress = self
            .last_tap_ms
            .is_some_and(|last| now_ms - last <= Self::WINDOW_MS);
        self.last_tap_ms = Some(now_ms);
        suppress
    }
}
