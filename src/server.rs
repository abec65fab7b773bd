//! HTTP API.
//!
//! Handlers stay thin: validate input, call the stores and upstream clients,
//! shape JSON. All state lives in [`AppState`].

use crate::audio::AudioStore;
use crate::config::Config;
use crate::error::AppError;
use crate::explain::{Explanation, ExplanationClient};
use crate::favorites::Favorites;
use crate::i18n::{detect_language, Language, LanguageRegistry};
use crate::store::{FileStore, StoreError};
use crate::tts::SpeechClient;
use crate::voice::VoiceCommand;
use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Shared application state
pub struct AppState {
    pub store: FileStore,
    pub favorites: Favorites,
    pub explainer: ExplanationClient,
    pub speech: SpeechClient,
    pub audio: AudioStore,
    static_dir: PathBuf,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        let store = FileStore::open(&config.samples_dir).context(format!(
            "Failed to open samples directory {}",
            config.samples_dir.display()
        ))?;

        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; explanations will return an error message");
        }

        Ok(Self {
            store,
            favorites: Favorites::new(),
            explainer: ExplanationClient::new(client.clone(), config),
            speech: SpeechClient::new(client, config),
            audio: AudioStore::new(&config.static_dir, config.audio_cache_max_files),
            static_dir: config.static_dir.clone(),
        })
    }

    /// Synthesize `text` and store it, returning the public URL.
    async fn speak_to_url(&self, text: &str, language: Language) -> Result<String> {
        let audio = self.speech.synthesize(text, language).await?;
        self.audio.persist(audio).await
    }

    /// Like `speak_to_url`, but a failure only means no audio.
    async fn try_speak_to_url(&self, text: &str, language: Language) -> Option<String> {
        match self.speak_to_url(text, language).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!("Speech synthesis failed, continuing without audio: {:#}", e);
                None
            }
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    let static_files = ServeDir::new(&state.static_dir);

    Router::new()
        .route("/", get(home_page))
        .route("/explanation", get(explanation_page))
        .route("/viewer", get(viewer_page))
        .route("/translator", get(translator_page))
        .route("/health", get(health))
        .route("/languages", get(list_languages))
        // Samples are not size-capped
        .route(
            "/upload_file",
            post(upload_file).layer(DefaultBodyLimit::disable()),
        )
        .route("/speak", post(speak))
        .route("/list_files", get(list_files))
        .route("/add_favorite", post(add_favorite))
        .route("/remove_favorite", post(remove_favorite))
        .route("/get_favorites", get(get_favorites))
        .route("/delete_file", delete(delete_file))
        .route("/get_file_content", get(get_file_content))
        .route("/api/summarize_translate_speak", post(summarize_translate_speak))
        .route("/voice_command", post(voice_command))
        .nest_service("/static", static_files)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ==================== Request / Response Types ====================

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub file: Option<String>,
    pub target_lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SpeakRequest {
    #[serde(default)]
    pub text: String,
    pub lang: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub file: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    #[serde(default = "default_voice_engine")]
    pub voice_engine: String,
}

fn default_target_lang() -> String {
    "en".to_string()
}

fn default_voice_engine() -> String {
    "online".to_string()
}

#[derive(Debug, Deserialize)]
pub struct VoiceCommandRequest {
    #[serde(default)]
    pub command: String,
}

#[derive(Debug, Serialize)]
pub struct SpeakResponse {
    pub audio_url: String,
    pub lang: String,
}

#[derive(Debug, Serialize)]
pub struct FileContentResponse {
    pub file_name: String,
    pub text: String,
    pub explanation: String,
    pub glossary: BTreeMap<String, String>,
    pub lang: String,
    pub audio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummarizeResponse {
    pub summary: String,
    pub translated: String,
    pub audio_url: Option<String>,
    pub lang: String,
}

#[derive(Debug, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
}

/// Non-empty value of an optional field, or a 400.
fn required(value: Option<String>) -> Result<String, AppError> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::bad_request("No file specified"))
}

// ==================== Pages ====================

async fn home_page() -> Html<&'static str> {
    Html("<!doctype html><title>EduVision</title><h1>EduVision</h1>")
}

/// Gate a page on `?file=` naming an existing sample.
async fn require_existing_file(state: &AppState, query: FileQuery) -> Result<String, Response> {
    let Some(file_name) = query.file.filter(|f| !f.is_empty()) else {
        return Err((StatusCode::BAD_REQUEST, "No file specified.").into_response());
    };
    match state.store.exists(&file_name).await {
        Ok(true) => Ok(file_name),
        Ok(false) | Err(StoreError::InvalidName(_)) | Err(StoreError::NotFound) => {
            Err((StatusCode::NOT_FOUND, "File not found.").into_response())
        }
        Err(e) => Err(AppError::from(e).into_response()),
    }
}

async fn explanation_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Response {
    match require_existing_file(&state, query).await {
        Ok(_) => Html("<!doctype html><title>Explanation</title><div id=\"explanation\"></div>")
            .into_response(),
        Err(response) => response,
    }
}

async fn viewer_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Response {
    match require_existing_file(&state, query).await {
        Ok(file_name) => Html(format!(
            "<!doctype html><title>Viewer</title><h1>{}</h1>",
            escape_html(&file_name)
        ))
        .into_response(),
        Err(response) => response,
    }
}

async fn translator_page() -> Html<String> {
    let options: String = LanguageRegistry::get()
        .list_all()
        .iter()
        .map(|lang| format!("<option value=\"{}\">{}</option>", lang.code, lang.name))
        .collect();
    Html(format!(
        "<!doctype html><title>Translator</title><select name=\"target_lang\">{}</select>",
        options
    ))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ==================== JSON Endpoints ====================

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_languages() -> Json<serde_json::Value> {
    let languages: Vec<LanguageEntry> = LanguageRegistry::get()
        .list_all()
        .iter()
        .map(|lang| LanguageEntry {
            code: lang.code,
            name: lang.name,
        })
        .collect();
    Json(serde_json::json!({ "languages": languages }))
}

async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut saw_files_field = false;
    let mut uploaded_files = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.to_string()))?
    {
        if field.name() != Some("files") {
            continue;
        }
        saw_files_field = true;

        // A file input with nothing selected still sends an empty part
        let Some(file_name) = field.file_name().filter(|n| !n.is_empty()).map(str::to_string)
        else {
            continue;
        };

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.to_string()))?;
        state.store.save(&file_name, &bytes).await?;
        uploaded_files.push(file_name);
    }

    if !saw_files_field {
        return Err(AppError::bad_request("No files uploaded"));
    }

    Ok(Json(serde_json::json!({ "uploaded_files": uploaded_files })))
}

async fn speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SpeakRequest>,
) -> Result<Json<SpeakResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::bad_request("No text provided"));
    }

    let requested = match request.lang.as_deref().filter(|l| !l.is_empty()) {
        Some(lang) => lang,
        None => detect_language(&request.text).unwrap_or("en"),
    };
    let language = Language::coerce(requested);

    let audio_url = state.speak_to_url(&request.text, language).await?;
    info!("Spoke {} chars in {}", request.text.len(), language.code());

    Ok(Json(SpeakResponse {
        audio_url,
        lang: language.code().to_string(),
    }))
}

async fn list_files(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, AppError> {
    let files = state.store.list().await?;
    Ok(Json(serde_json::json!({ "files": files })))
}

async fn add_favorite(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FavoriteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let file = required(request.file)?;
    state.favorites.add(&file);
    Ok(Json(serde_json::json!({ "status": "added" })))
}

async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FavoriteRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let file = required(request.file)?;
    if !state.favorites.remove(&file) {
        return Err(AppError::not_found("File not in favorites"));
    }
    Ok(Json(serde_json::json!({ "status": "removed" })))
}

async fn get_favorites(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "favorites": state.favorites.list() }))
}

/// Deletes keep the `{success, error}` body shape on every path.
async fn delete_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Response {
    let result = match required(query.file) {
        Ok(file) => state
            .store
            .delete(&file)
            .await
            .map(|()| {
                state.favorites.remove(&file);
            })
            .map_err(AppError::from),
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => Json(serde_json::json!({ "success": true })).into_response(),
        Err(e) => (
            e.status(),
            Json(serde_json::json!({ "success": false, "error": e.to_string() })),
        )
            .into_response(),
    }
}

async fn get_file_content(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Json<FileContentResponse>, AppError> {
    let file_name = required(query.file)?;
    let text = state.store.read(&file_name).await?;

    let source = Language::coerce(detect_language(&text).unwrap_or("en"));
    let target = query
        .target_lang
        .as_deref()
        .and_then(|code| Language::from_code(code).ok());

    let instruction = match target {
        Some(target) => format!("Translate and explain fully in {} only.", target.name()),
        None => format!("Explain fully in {} (detected language).", source.name()),
    };
    let prompt = format!("{}\n\nIMPORTANT: {}", text, instruction);

    let Explanation {
        explanation,
        glossary,
    } = state.explainer.explain(&prompt).await;

    let speech_language = target.unwrap_or(source);
    let audio_url = state.try_speak_to_url(&explanation, speech_language).await;

    Ok(Json(FileContentResponse {
        file_name,
        text,
        explanation,
        glossary,
        lang: speech_language.speech_code().to_string(),
        audio_url,
    }))
}

async fn summarize_translate_speak(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::bad_request("No text provided"));
    }

    let summary = state.explainer.explain(&request.text).await.explanation;

    let translated = if request.target_lang != "en" {
        let target_name = Language::from_code(&request.target_lang)
            .map(|l| l.name())
            .unwrap_or(request.target_lang.as_str());
        let prompt = format!(
            "Translate the following text to {}:\n\n{}",
            target_name, summary
        );
        state.explainer.explain(&prompt).await.explanation
    } else {
        summary.clone()
    };

    let speech_language = Language::coerce(&request.target_lang);
    let audio_url = if request.voice_engine == "online" {
        state.try_speak_to_url(&translated, speech_language).await
    } else {
        None
    };

    Ok(Json(SummarizeResponse {
        summary,
        translated,
        audio_url,
        lang: speech_language.speech_code().to_string(),
    }))
}

async fn voice_command(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VoiceCommandRequest>,
) -> Result<Json<Explanation>, AppError> {
    if request.command.trim().is_empty() {
        return Err(AppError::bad_request("No command provided"));
    }

    let command = VoiceCommand::parse(&request.command);
    info!("Voice command: {:?}", command);
    let result = command.run(&state.store, &state.explainer).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_missing_and_empty() {
        assert!(required(None).is_err());
        assert!(required(Some(String::new())).is_err());
        assert_eq!(required(Some("x.txt".to_string())).unwrap(), "x.txt");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a&b\"</b>"),
            "&lt;b&gt;&quot;a&amp;b&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_summarize_request_defaults() {
        let request: SummarizeRequest = serde_json::from_str(r#"{"text": "hi"}"#).unwrap();
        assert_eq!(request.target_lang, "en");
        assert_eq!(request.voice_engine, "online");
    }

    #[test]
    fn test_speak_request_missing_text_defaults_empty() {
        let request: SpeakRequest = serde_json::from_str(r#"{"lang": "fr"}"#).unwrap();
        assert!(request.text.is_empty());
        assert_eq!(request.lang.as_deref(), Some("fr"));
    }
}
