//! Internationalization (i18n) module.
//!
//! # Architecture
//!
//! - `registry`: Single source of truth for the ~50 supported languages
//! - `language`: Type-safe Language type validated against the registry
//! - `detect`: Source language detection for uploaded text
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::i18n::{detect_language, Language};
//!
//! // Unsupported or undetectable languages become English
//! let lang = Language::coerce(detect_language(text).unwrap_or("en"));
//! let speech = lang.speech_code();
//! ```

mod detect;
mod language;
mod registry;

pub use detect::detect_language;
pub use language::Language;
pub use registry::{LanguageConfig, LanguageRegistry};
