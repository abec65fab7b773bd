//! Source language detection.
//!
//! Wraps `whatlang` and maps its ISO 639-3 codes onto registry codes. Codes
//! with no registry counterpart are passed through unchanged so callers can
//! see what was detected before coercing to the default.

use tracing::debug;

/// Detect the language of `text`.
///
/// Returns `None` when the detector has nothing to go on (empty or
/// symbol-only input).
pub fn detect_language(text: &str) -> Option<&'static str> {
    let info = whatlang::detect(text)?;
    let iso3 = info.lang().code();
    let code = registry_code(iso3).unwrap_or(iso3);

    debug!(
        "Detected language {} (mapped to {}, confidence {:.2})",
        iso3,
        code,
        info.confidence()
    );

    Some(code)
}

fn registry_code(iso3: &str) -> Option<&'static str> {
    let code = match iso3 {
        "eng" => "en",
        "hin" => "hi",
        "tam" => "ta",
        "tel" => "te",
        "mal" => "ml",
        "kan" => "kn",
        "guj" => "gu",
        "mar" => "mr",
        "ben" => "bn",
        "pan" => "pa",
        "urd" => "ur",
        "nep" => "ne",
        "sin" => "si",
        "ori" => "or",
        "fra" => "fr",
        "deu" => "de",
        "spa" => "es",
        "ita" => "it",
        "por" => "pt",
        "nld" => "nl",
        "pol" => "pl",
        "rus" => "ru",
        "ukr" => "uk",
        "ron" => "ro",
        "ces" => "cs",
        "slk" => "sk",
        "slv" => "sl",
        "bul" => "bg",
        "hrv" => "hr",
        "srp" => "sr",
        "hun" => "hu",
        "swe" => "sv",
        "dan" => "da",
        "fin" => "fi",
        "nob" => "no",
        "tur" => "tr",
        "ell" => "el",
        "ara" => "ar",
        "pes" => "fa",
        "cmn" => "zh-cn",
        "jpn" => "ja",
        "kor" => "ko",
        "tha" => "th",
        "vie" => "vi",
        "ind" => "id",
        "afr" => "af",
        _ => return None,
    };
    Some(code)
}
