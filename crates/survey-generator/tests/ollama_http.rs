//! OllamaBackend against an in-process HTTP server speaking the Ollama API.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use survey_generator::{
    ensure_model_available, DataGenerator, GenerationSettings, GeneratorError, LanguageModel,
    OllamaBackend,
};
use survey_model::DataDir;
use tokio::net::TcpListener;

/// Canned Ollama behaviour; `None` makes the endpoint answer 500.
#[derive(Clone, Default)]
struct FakeOllama {
    tags: Option<Value>,
    models: Option<Value>,
    chat_reply: Option<&'static str>,
    seen: Arc<Mutex<Vec<(String, Value)>>>,
}

impl FakeOllama {
    fn record(&self, route: &str, body: Value) {
        self.seen.lock().unwrap().push((route.to_string(), body));
    }

    fn routes(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(r, _)| r.clone()).collect()
    }

    fn chat_bodies(&self) -> Vec<Value> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|(r, _)| r == "POST /api/chat")
            .map(|(_, b)| b.clone())
            .collect()
    }
}

fn listing(body: Option<Value>) -> Response {
    match body {
        Some(body) => Json(body).into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "listing unavailable").into_response(),
    }
}

async fn tags(State(ollama): State<FakeOllama>) -> Response {
    ollama.record("GET /api/tags", Value::Null);
    listing(ollama.tags.clone())
}

async fn models(State(ollama): State<FakeOllama>) -> Response {
    ollama.record("GET /api/models", Value::Null);
    listing(ollama.models.clone())
}

async fn chat(State(ollama): State<FakeOllama>, Json(body): Json<Value>) -> Response {
    ollama.record("POST /api/chat", body);
    match ollama.chat_reply {
        Some(content) => Json(json!({
            "model": "llama2",
            "message": {"role": "assistant", "content": content},
            "done": true
        }))
        .into_response(),
        None => (StatusCode::INTERNAL_SERVER_ERROR, "model crashed").into_response(),
    }
}

/// Serve `ollama` on a free local port and return a backend pointed at it.
async fn start(ollama: &FakeOllama) -> OllamaBackend {
    let app = Router::new()
        .route("/api/tags", get(tags))
        .route("/api/models", get(models))
        .route("/api/chat", post(chat))
        .with_state(ollama.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let host = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    OllamaBackend::new(&host, "llama2", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn test_chat_round_trip() {
    let ollama = FakeOllama {
        chat_reply: Some(r#"{"users": []}"#),
        ..Default::default()
    };
    let backend = start(&ollama).await;

    let reply = backend.chat(Some("Only JSON."), "Three users").await.unwrap();

    assert_eq!(reply, r#"{"users": []}"#);
    let bodies = ollama.chat_bodies();
    assert_eq!(bodies.len(), 1);
    let body = &bodies[0];
    assert_eq!(body["model"], "llama2");
    assert_eq!(body["stream"], false);
    assert_eq!(
        body["messages"],
        json!([
            {"role": "system", "content": "Only JSON."},
            {"role": "user", "content": "Three users"}
        ])
    );
    assert!((body["options"]["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
}

#[tokio::test]
async fn test_chat_server_error() {
    let backend = start(&FakeOllama::default()).await;

    let err = backend.chat(None, "hello").await.unwrap_err();

    assert!(matches!(err, GeneratorError::Backend(ref m) if m.contains("500")), "{err}");
}

#[tokio::test]
async fn test_tags_listing_finds_model() {
    let ollama = FakeOllama {
        tags: Some(json!({"models": [
            {"name": "mistral:7b", "model": "mistral:7b"},
            {"name": "llama2:latest", "model": "llama2:latest"}
        ]})),
        ..Default::default()
    };
    let backend = start(&ollama).await;

    assert_eq!(
        backend.list_models().await.unwrap(),
        vec!["mistral:7b", "llama2:latest"]
    );
    ensure_model_available(&backend).await.unwrap();
    assert!(!ollama.routes().contains(&"GET /api/models".to_string()));
}

#[tokio::test]
async fn test_fallback_listing_when_tags_fails() {
    let ollama = FakeOllama {
        models: Some(json!(["llama2:13b"])),
        ..Default::default()
    };
    let backend = start(&ollama).await;

    assert!(backend.list_models().await.is_err());
    ensure_model_available(&backend).await.unwrap();

    let routes = ollama.routes();
    assert!(routes.contains(&"GET /api/models".to_string()), "{routes:?}");
}

#[tokio::test]
async fn test_missing_model_stops_generation() {
    let ollama = FakeOllama {
        tags: Some(json!({"models": [{"name": "mistral:latest"}]})),
        chat_reply: Some(r#"{"users": []}"#),
        ..Default::default()
    };
    let backend = start(&ollama).await;
    let dir = tempfile::TempDir::new().unwrap();
    let data = DataDir::new(dir.path().join("data"));

    let mut generator = DataGenerator::new(backend, Some(7));
    let err = generator
        .generate_all(&data, &GenerationSettings::default())
        .await
        .unwrap_err();

    assert!(
        matches!(err, GeneratorError::BackendUnavailable { ref model, .. } if model == "llama2"),
        "{err}"
    );
    assert!(ollama.chat_bodies().is_empty());
    assert!(!data.root().exists());
}
