use tracing::debug;

/// Returned whenever the language cannot be determined.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Best-guess ISO 639-3 code of the dominant language, or `"unknown"`.
///
/// Display only; nothing downstream branches on the result.
pub fn detect_language(text: &str) -> String {
    if text.trim().is_empty() {
        return UNKNOWN_LANGUAGE.to_string();
    }
    match whatlang::detect(text) {
        Some(info) if info.is_reliable() => info.lang().code().to_string(),
        Some(info) => {
            debug!(
                guess = info.lang().code(),
                confidence = info.confidence(),
                "Language detection not reliable"
            );
            UNKNOWN_LANGUAGE.to_string()
        }
        None => UNKNOWN_LANGUAGE.to_string(),
    }
}
