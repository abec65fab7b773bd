//! Language registry: Single source of truth for all supported languages.
//!
//! The registry is built once behind a `OnceLock` and is immutable afterwards.
//! Every code used for prompt construction or speech synthesis must be found
//! here.

use std::sync::OnceLock;

/// Configuration for a supported language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// Lowercase ISO-like code (e.g., "en", "zh-cn")
    pub code: &'static str,

    /// English display name used in prompts and on the translator page
    pub name: &'static str,

    /// Code form the speech backend expects (e.g., "zh-CN")
    pub speech_code: &'static str,

    /// Whether unsupported codes are coerced to this language (only one should be true)
    pub is_default: bool,
}

/// Global language registry singleton.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

/// Global registry instance (initialized lazily)
static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by its code.
    ///
    /// Lookup is exact: "zh-CN" is a speech code, not a registry code.
    pub fn get_by_code(&self, code: &str) -> Option<&LanguageConfig> {
        self.languages.iter().find(|lang| lang.code == code)
    }

    /// All languages in display order.
    pub fn list_all(&self) -> Vec<&LanguageConfig> {
        self.languages.iter().collect()
    }

    /// Get the default language configuration.
    ///
    /// # Panics
    /// Panics if zero or several default languages are defined (this
    /// indicates a configuration error).
    pub fn default_language(&self) -> &LanguageConfig {
        let defaults: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_default)
            .collect();

        match defaults.len() {
            0 => panic!("No default language found in registry"),
            1 => defaults[0],
            _ => panic!("Multiple default languages found in registry"),
        }
    }

    /// Check if a language code is supported.
    pub fn is_supported(&self, code: &str) -> bool {
        self.get_by_code(code).is_some()
    }
}

fn language(code: &'static str, name: &'static str) -> LanguageConfig {
    LanguageConfig {
        code,
        name,
        speech_code: code,
        is_default: false,
    }
}

/// Default language configurations.
fn default_languages() -> Vec<LanguageConfig> {
    let mut languages = vec![
        LanguageConfig {
            code: "en",
            name: "English",
            speech_code: "en",
            is_default: true,
        },
        language("hi", "Hindi"),
        language("ta", "Tamil"),
        language("te", "Telugu"),
        language("ml", "Malayalam"),
        language("kn", "Kannada"),
        language("gu", "Gujarati"),
        language("mr", "Marathi"),
        language("bn", "Bengali"),
        language("pa", "Punjabi"),
        language("ur", "Urdu"),
        language("ne", "Nepali"),
        language("si", "Sinhala"),
        language("or", "Odia"),
        language("as", "Assamese"),
        language("fr", "French"),
        language("de", "German"),
        language("es", "Spanish"),
        language("it", "Italian"),
        language("pt", "Portuguese"),
        language("nl", "Dutch"),
        language("pl", "Polish"),
        language("ru", "Russian"),
        language("uk", "Ukrainian"),
        language("ro", "Romanian"),
        language("cs", "Czech"),
        language("sk", "Slovak"),
        language("sl", "Slovenian"),
        language("bg", "Bulgarian"),
        language("hr", "Croatian"),
        language("sr", "Serbian"),
        language("hu", "Hungarian"),
        language("sv", "Swedish"),
        language("da", "Danish"),
        language("fi", "Finnish"),
        language("no", "Norwegian"),
        language("tr", "Turkish"),
        language("el", "Greek"),
        language("ar", "Arabic"),
        language("fa", "Persian"),
        language("zh-cn", "Chinese (Simplified)"),
        language("zh-tw", "Chinese (Traditional)"),
        language("ja", "Japanese"),
        language("ko", "Korean"),
        language("th", "Thai"),
        language("vi", "Vietnamese"),
        language("id", "Indonesian"),
        language("ms", "Malay"),
        language("sw", "Swahili"),
        language("af", "Afrikaans"),
    ];

    // The speech backend wants regional Chinese variants upper-cased
    for lang in languages.iter_mut() {
        match lang.code {
            "zh-cn" => lang.speech_code = "zh-CN",
            "zh-tw" => lang.speech_code = "zh-TW",
            _ => {}
        }
    }

    languages
}
