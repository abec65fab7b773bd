pub mod audio;
pub mod config;
pub mod error;
pub mod explain;
pub mod favorites;
pub mod i18n;
pub mod server;
pub mod store;
pub mod tts;
pub mod voice;
