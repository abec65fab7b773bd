//! Language type: validated language representation.
//!
//! A `Language` can only be built from a code found in the registry, so any
//! value of this type is safe to embed in prompts or hand to the speech backend.

use crate::i18n::{LanguageConfig, LanguageRegistry};
use anyhow::{bail, Result};

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Language {
    /// Registry code (e.g., "en", "zh-cn")
    code: &'static str,
}

impl Language {
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a registry code.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is in the registry
    /// * `Err` if the code is unknown
    pub fn from_code(code: &str) -> Result<Language> {
        match LanguageRegistry::get().get_by_code(code) {
            Some(config) => Ok(Language { code: config.code }),
            None => bail!("Unknown language code: '{}'", code),
        }
    }

    /// Resolve a code, substituting the default language for anything unsupported.
    pub fn coerce(code: &str) -> Language {
        Self::from_code(code).unwrap_or_else(|_| Self::default_language())
    }

    /// The language unsupported codes fall back to.
    pub fn default_language() -> Language {
        let config = LanguageRegistry::get().default_language();
        Language { code: config.code }
    }

    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Get the full language configuration from the registry.
    ///
    /// # Panics
    /// Panics if the code is missing from the registry, which cannot happen
    /// for a Language built through `from_code` or the constants.
    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get()
            .get_by_code(self.code)
            .expect("Language code should always be valid")
    }

    /// English display name (e.g., "Chinese (Simplified)").
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Code in the form the speech backend expects.
    pub fn speech_code(&self) -> &'static str {
        self.config().speech_code
    }

    pub fn is_default(&self) -> bool {
        self.config().is_default
    }
}
