//! Core types for the survey seeder.
//!
//! This crate provides the domain model shared by generation and seeding:
//!
//! - [`User`] / [`UserList`] - Platform members, joined to responses by email
//! - [`Survey`] / [`SurveyList`] - Surveys and their ordered [`Question`]s
//! - [`Response`] / [`ResponseList`] - Answers submitted against a survey
//! - [`DataDir`] / [`Dataset`] - The interchange files written by generation
//!   and read back by seeding
//!
//! # Architecture
//!
//! ```text
//! survey-model (this crate)
//!    │
//!    ├─── survey-generator  (produces UserList, SurveyList, ResponseList)
//!    │
//!    └─── survey-populate   (replays them against the platform APIs)
//! ```
//!
//! Every list type implements [`Validate`]. Extra keys in model output are
//! ignored; validation only rejects what would break generation or seeding
//! downstream.
//!
//! # Example
//!
//! ```rust
//! use survey_model::{UserList, Validate};
//!
//! let users: UserList = serde_json::from_str(r#"{
//!     "users": [
//!         {"name": "Ada Lovelace", "email": "ada.lovelace@company.com", "role": "manager"}
//!     ]
//! }"#).unwrap();
//!
//! users.validate().unwrap();
//! ```

pub mod dataset;
pub mod error;
pub mod response;
pub mod survey;
pub mod user;

// Re-exports for convenience
pub use dataset::{DataDir, Dataset, RESPONSES_FILE, SURVEYS_FILE, USERS_FILE};
pub use error::ModelError;
pub use response::{Answer, AnswerValue, DanglingReference, Response, ResponseList};
pub use survey::{Question, QuestionChoice, QuestionType, Survey, SurveyList};
pub use user::{is_valid_email, User, UserList, UserRole};

/// Shape validation for values parsed from model output or interchange files.
pub trait Validate {
    /// Check required fields and type-keyed constraints.
    fn validate(&self) -> Result<(), ModelError>;
}
