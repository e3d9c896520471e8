//! Attach-time configuration, deserialized from a plain JS object.
//!
//! Every field has a default, so `new PageFx({})` (or `undefined`) attaches
//! with the stock landing-page behavior.

use serde::{Deserialize, Serialize};

use crate::floatbar::FloatBarConfig;

/// Options for [`crate::PageFx`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageFxOptions {
    /// Element id of the floating call-to-action bar. When the element is
    /// absent the scroll pipeline is silently skipped.
    pub floating_bar_id: String,
    /// Scroll offset (px) at or below which the bar is always hidden.
    pub threshold_px: f64,
    /// Debounce window (ms) before the bar is revealed.
    pub reveal_delay_ms: f64,
    /// Gate reveals on downward scroll motion.
    pub require_increasing_offset: bool,
    /// Element id CTA buttons smooth-scroll to.
    pub pricing_section_id: String,
    /// Wire the Konami-code easter egg.
    pub easter_egg: bool,
    /// Log CTA/FAQ/video interactions to the console.
    pub interaction_logging: bool,
}

impl Default for PageFxOptions {
    fn default() -> Self {
        Self {
            floating_bar_id: "floatingBar".to_string(),
            threshold_px: 300.0,
            reveal_delay_ms: 100.0,
            require_increasing_offset: false,
            pricing_section_id: "pricing".to_string(),
            easter_egg: true,
            interaction_logging: true,
        }
    }
}

impl PageFxOptions {
    /// The controller tuning carried by these options.
    #[must_use]
    pub fn float_bar_config(&self) -> FloatBarConfig {
        FloatBarConfig {
            threshold_px: self.threshold_px,
            reveal_delay_ms: self.reveal_delay_ms,
            require_increasing_offset: self.require_increasing_offset,
        }
    }
}
