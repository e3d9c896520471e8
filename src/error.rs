//! Structured error types for pagefx.
//!
//! Almost nothing here is fatal: missing DOM targets disable the piece of
//! wiring that wanted them. The error type exists for the few operations that
//! can genuinely fail (option deserialization, metrics serialization) and for
//! surfacing those to JavaScript.

/// All errors that can occur while attaching or querying pagefx.
#[derive(Debug, thiserror::Error)]
pub enum PagefxError {
    /// The browser window or document was unavailable.
    #[error("No window/document available")]
    NoDocument,

    /// The options object could not be deserialized.
    #[error("Invalid options: {0}")]
    Options(String),

    /// Metrics serialization failure.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PagefxError>;

#[cfg(target_arch = "wasm32")]
impl From<PagefxError> for wasm_bindgen::JsValue {
    fn from(e: PagefxError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_failure() {
        assert_eq!(
            PagefxError::NoDocument.to_string(),
            "No window/document available"
        );
        assert_eq!(
            PagefxError::Options("missing field".to_string()).to_string(),
            "Invalid options: missing field"
        );
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(PagefxError::from(bad)
            .to_string()
            .starts_with("Serialization error:"));
    }
}
