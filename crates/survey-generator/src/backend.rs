//! Language-model backends.
//!
//! [`LanguageModel`] is the seam the generator talks through. The shipped
//! implementation is [`OllamaBackend`], which uses Ollama's native HTTP API
//! (`/api/chat`, `/api/tags`).

use crate::error::GeneratorError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default backend host.
pub const DEFAULT_OLLAMA_HOST: &str = "http://localhost:11434";

/// Listing paths probed when the native listing call fails.
pub const FALLBACK_LISTING_PATHS: [&str; 3] = ["/api/models", "/api/tags", "/api/list"];

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Sampling options sent with every chat request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            top_p: 0.9,
        }
    }
}

/// A chat-style language model.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Host the backend talks to, for diagnostics.
    fn host(&self) -> &str;

    /// Name of the model requests are sent to.
    fn model(&self) -> &str;

    /// Send one system/user exchange and return the reply text.
    async fn chat(&self, system: Option<&str>, prompt: &str) -> Result<String, GeneratorError>;

    /// List installed models through the backend's native interface.
    async fn list_models(&self) -> Result<Vec<String>, GeneratorError>;

    /// Best-effort listing through alternative endpoints.
    ///
    /// Used when [`LanguageModel::list_models`] fails or does not report the
    /// model. Never errors; unreachable endpoints yield nothing.
    async fn probe_models(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Whether an installed model name satisfies the requested one.
///
/// Installed names usually carry a tag (`llama2:latest`), so a name matches
/// when it contains the requested model.
pub fn model_matches(installed: &str, wanted: &str) -> bool {
    !wanted.is_empty() && installed.contains(wanted)
}

/// Fail with [`GeneratorError::BackendUnavailable`] unless the backend is
/// reachable and reports the configured model.
pub async fn ensure_model_available<M: LanguageModel + ?Sized>(
    backend: &M,
) -> Result<(), GeneratorError> {
    let wanted = backend.model();
    tracing::info!("Checking language model backend at {}", backend.host());

    match backend.list_models().await {
        Ok(names) => {
            tracing::debug!("Available models: {:?}", names);
            if names.iter().any(|n| model_matches(n, wanted)) {
                tracing::info!("Found model '{}'", wanted);
                return Ok(());
            }
            tracing::warn!("Model '{}' not in available models", wanted);
        }
        Err(e) => {
            tracing::warn!("Native model listing failed: {}", e);
        }
    }

    let names = backend.probe_models().await;
    if names.iter().any(|n| model_matches(n, wanted)) {
        tracing::info!("Found model '{}' via fallback listing", wanted);
        return Ok(());
    }

    Err(GeneratorError::BackendUnavailable {
        host: backend.host().to_string(),
        model: wanted.to_string(),
    })
}

/// Normalise a host setting: add a scheme when missing and trim trailing slashes.
pub fn normalize_host(host: &str) -> String {
    let mut host = host.trim().to_string();
    if host.is_empty() {
        host = DEFAULT_OLLAMA_HOST.to_string();
    }
    if !host.starts_with("http://") && !host.starts_with("https://") {
        host = format!("http://{host}");
    }
    host.trim_end_matches('/').to_string()
}

/// Extract model names from any of the listing shapes seen in the wild:
/// `{"models": [{"name"|"model": ...}]}`, `["name", ...]` or `[{"name": ...}]`.
pub fn model_names_from_listing(listing: &serde_json::Value) -> Vec<String> {
    fn entry_name(entry: &serde_json::Value) -> Option<String> {
        match entry {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("model")
                .or_else(|| obj.get("name"))
                .and_then(|v| v.as_str())
                .map(str::to_string),
            _ => None,
        }
    }

    let entries = match listing {
        serde_json::Value::Object(obj) => obj.get("models").and_then(|m| m.as_array()),
        serde_json::Value::Array(items) => Some(items),
        _ => None,
    };

    entries
        .map(|items| items.iter().filter_map(entry_name).collect())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    models: Vec<TagEntry>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    stream: bool,
    messages: Vec<ChatMessage>,
    options: SamplingOptions,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Ollama server backend.
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    host: String,
    model: String,
    options: SamplingOptions,
    client: Client,
}

impl OllamaBackend {
    /// Create a backend for `model` on `host`.
    ///
    /// `request_timeout` bounds a single chat call; generation of a large
    /// survey list on a local CPU model can take minutes.
    pub fn new(
        host: &str,
        model: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            host: normalize_host(host),
            model: model.into(),
            options: SamplingOptions::default(),
            client,
        })
    }
}

#[async_trait]
impl LanguageModel for OllamaBackend {
    fn host(&self) -> &str {
        &self.host
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn chat(&self, system: Option<&str>, prompt: &str) -> Result<String, GeneratorError> {
        let url = format!("{}/api/chat", self.host);

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage::system(system));
        }
        messages.push(ChatMessage::user(prompt));

        let request = ChatRequest {
            model: &self.model,
            stream: false,
            messages,
            options: self.options,
        };

        tracing::debug!("POST {} (model={})", url, self.model);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                GeneratorError::Backend(format!(
                    "failed to reach Ollama at {url} (is it running?): {e}"
                ))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::Backend(format!(
                "Ollama returned {status}: {text}"
            )));
        }

        let reply: ChatResponse = response.json().await.map_err(|e| {
            GeneratorError::Backend(format!("Ollama returned an unexpected chat payload: {e}"))
        })?;

        Ok(reply.message.content)
    }

    async fn list_models(&self) -> Result<Vec<String>, GeneratorError> {
        let url = format!("{}/api/tags", self.host);
        let response = self
            .client
            .get(&url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;

        let tags: TagsResponse = response.json().await?;
        Ok(tags
            .models
            .into_iter()
            .filter_map(|m| m.model.or(m.name))
            .collect())
    }

    async fn probe_models(&self) -> Vec<String> {
        let mut names = Vec::new();

        for path in FALLBACK_LISTING_PATHS {
            let url = format!("{}{}", self.host, path);
            let response = match self.client.get(&url).timeout(PROBE_TIMEOUT).send().await {
                Ok(r) if r.status().is_success() => r,
                Ok(r) => {
                    tracing::debug!("{} returned {}", url, r.status());
                    continue;
                }
                Err(e) => {
                    tracing::debug!("{} unreachable: {}", url, e);
                    continue;
                }
            };

            match response.json::<serde_json::Value>().await {
                Ok(listing) => names.extend(model_names_from_listing(&listing)),
                Err(e) => tracing::debug!("{} did not return JSON: {}", url, e),
            }
        }

        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeListing {
        native: Result<Vec<String>, String>,
        fallback: Vec<String>,
        fallback_calls: Mutex<u32>,
    }

    impl FakeListing {
        fn new(native: Result<Vec<&str>, &str>, fallback: Vec<&str>) -> Self {
            Self {
                native: native
                    .map(|v| v.into_iter().map(str::to_string).collect())
                    .map_err(str::to_string),
                fallback: fallback.into_iter().map(str::to_string).collect(),
                fallback_calls: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for FakeListing {
        fn host(&self) -> &str {
            "http://ollama:11434"
        }

        fn model(&self) -> &str {
            "llama2"
        }

        async fn chat(&self, _: Option<&str>, _: &str) -> Result<String, GeneratorError> {
            unreachable!("availability checks never chat")
        }

        async fn list_models(&self) -> Result<Vec<String>, GeneratorError> {
            self.native.clone().map_err(GeneratorError::Backend)
        }

        async fn probe_models(&self) -> Vec<String> {
            *self.fallback_calls.lock().unwrap() += 1;
            self.fallback.clone()
        }
    }

    #[test]
    fn test_normalize_host() {
        assert_eq!(normalize_host("localhost:11434/"), "http://localhost:11434");
        assert_eq!(normalize_host("https://llm.internal/"), "https://llm.internal");
        assert_eq!(normalize_host("  "), DEFAULT_OLLAMA_HOST);
    }

    #[test]
    fn test_model_matches_tagged_names() {
        assert!(model_matches("llama2:latest", "llama2"));
        assert!(model_matches("llama2", "llama2"));
        assert!(!model_matches("mistral:7b", "llama2"));
        assert!(!model_matches("llama2:latest", ""));
    }

    #[test]
    fn test_model_names_from_listing_shapes() {
        let tags = json!({"models": [{"name": "llama2:latest", "model": "llama2:latest"}, {"name": "phi3"}]});
        assert_eq!(model_names_from_listing(&tags), vec!["llama2:latest", "phi3"]);

        let strings = json!(["mistral", "llama3"]);
        assert_eq!(model_names_from_listing(&strings), vec!["mistral", "llama3"]);

        let objects = json!([{"name": "gemma"}, 42]);
        assert_eq!(model_names_from_listing(&objects), vec!["gemma"]);

        assert!(model_names_from_listing(&json!({"status": "ok"})).is_empty());
    }

    #[test]
    fn test_chat_request_shape() {
        let request = ChatRequest {
            model: "llama2",
            stream: false,
            messages: vec![ChatMessage::system("sys"), ChatMessage::user("hi")],
            options: SamplingOptions::default(),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "llama2");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert!((value["options"]["top_p"].as_f64().unwrap() - 0.9).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_available_via_native_listing() {
        let backend = FakeListing::new(Ok(vec!["llama2:latest"]), vec![]);
        ensure_model_available(&backend).await.unwrap();
        assert_eq!(*backend.fallback_calls.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_falls_back_when_native_listing_fails() {
        let backend = FakeListing::new(Err("connection refused"), vec!["llama2:7b"]);
        ensure_model_available(&backend).await.unwrap();
        assert_eq!(*backend.fallback_calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unavailable_model_is_reported() {
        let backend = FakeListing::new(Ok(vec!["mistral"]), vec!["mistral"]);
        let err = ensure_model_available(&backend).await.unwrap_err();
        assert!(matches!(err, GeneratorError::BackendUnavailable { .. }));
        let message = err.to_string();
        assert!(message.contains("ollama pull llama2"));
        assert!(message.contains("http://ollama:11434"));
    }
}
