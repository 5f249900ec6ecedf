//! Natural language detection for choosing the OCR language.

use super::OcrOptions;

/// Detect the language of `text` as an ISO 639-2/T code (e.g. "eng", "slv").
pub fn detect_language(text: &str) -> Option<&'static str> {
    whatlang::detect(text).map(|info| info.lang().code())
}

/// Pick the OCR language for `text`, falling back to the default when the
/// detected language is missing or unsupported.
pub fn resolve_language(text: &str, options: &OcrOptions) -> String {
    match detect_language(text) {
        Some(code) if options.supported_languages.iter().any(|l| l == code) => {
            log::debug!("Detected language {}", code);
            code.to_string()
        }
        detected => {
            log::debug!(
                "Detected language {:?} unsupported, using {}",
                detected,
                options.default_language
            );
            options.default_language.clone()
        }
    }
}
