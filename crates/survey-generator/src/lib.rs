//! Synthetic dataset generator for the survey seeder.
//!
//! Users and surveys are written by a chat language model; responses are
//! synthesized locally from the survey definitions with a seedable RNG.
//!
//! # Architecture
//!
//! ```text
//! GenerationSettings
//!        │
//!        ▼
//! ┌──────────────────────┐      chat / list_models
//! │  DataGenerator<M>    │ ───────────────────────────▶  LanguageModel
//! │                      │                               (OllamaBackend)
//! │  - backend: M        │ ◀── reply text ── extract_payload ── serde_json
//! │  - rng (StdRng)      │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!   users.json  surveys.json  responses.json   (DataDir)
//! ```
//!
//! Model output is untrusted: the JSON payload is located with
//! [`extract_payload`], parsed, trimmed to the requested count and
//! validated before anything is written.

pub mod answers;
pub mod backend;
pub mod error;
pub mod extract;
pub mod generator;
pub mod prompts;

// Re-exports for convenience
pub use answers::answer_for_question;
pub use backend::{
    ensure_model_available, model_matches, LanguageModel, OllamaBackend, SamplingOptions,
    DEFAULT_OLLAMA_HOST,
};
pub use error::GeneratorError;
pub use extract::extract_payload;
pub use generator::{DataGenerator, GenerationSettings, GenerationSummary};
