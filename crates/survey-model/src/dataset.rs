//! Interchange files shared by generation and seeding.
//!
//! Each artifact is one pretty-printed JSON document in the data directory:
//!
//! - `users.json`     - `{ "users": [...] }`
//! - `surveys.json`   - `{ "surveys": [...] }`
//! - `responses.json` - `{ "responses": [...] }`
//!
//! Writes go to `<file>.part` first and are renamed into place, so a failed
//! write never leaves a truncated artifact behind.

use crate::{ModelError, ResponseList, SurveyList, UserList, Validate};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const USERS_FILE: &str = "users.json";
pub const SURVEYS_FILE: &str = "surveys.json";
pub const RESPONSES_FILE: &str = "responses.json";

/// Directory holding the interchange files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a file inside the data directory.
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    /// Create the directory (and parents) if missing.
    pub fn ensure(&self) -> Result<(), ModelError> {
        fs::create_dir_all(&self.root).map_err(|source| ModelError::Io {
            path: self.root.clone(),
            source,
        })
    }

    /// Serialize `value` to `file`, replacing any previous content.
    pub fn write<T: Serialize>(&self, file: &str, value: &T) -> Result<PathBuf, ModelError> {
        let path = self.path(file);
        let part_path = self.path(&format!("{file}.part"));

        let mut payload = serde_json::to_string_pretty(value).map_err(|source| {
            ModelError::Json {
                path: path.clone(),
                source,
            }
        })?;
        payload.push('\n');

        fs::write(&part_path, payload).map_err(|source| ModelError::Io {
            path: part_path.clone(),
            source,
        })?;
        fs::rename(&part_path, &path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;

        Ok(path)
    }

    /// Read `file` and validate its shape.
    pub fn read<T: DeserializeOwned + Validate>(&self, file: &str) -> Result<T, ModelError> {
        let path = self.path(file);
        if !path.exists() {
            return Err(ModelError::NotFound { path });
        }

        let raw = fs::read_to_string(&path).map_err(|source| ModelError::Io {
            path: path.clone(),
            source,
        })?;
        let value: T = serde_json::from_str(&raw).map_err(|source| ModelError::Json {
            path: path.clone(),
            source,
        })?;
        value.validate().map_err(|e| match e {
            ModelError::Invalid { entity, reason } => ModelError::Invalid {
                entity: format!("{entity} in {}", path.display()),
                reason,
            },
            other => other,
        })?;

        Ok(value)
    }
}

/// The three artifacts of one generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub users: UserList,
    pub surveys: SurveyList,
    pub responses: ResponseList,
}

impl Dataset {
    /// Load all three files, in dependency order.
    ///
    /// Answer values are re-keyed by their question's type once the surveys
    /// are known.
    pub fn load(dir: &DataDir) -> Result<Self, ModelError> {
        let users = dir.read(USERS_FILE)?;
        let surveys: SurveyList = dir.read(SURVEYS_FILE)?;
        let mut responses: ResponseList = dir.read(RESPONSES_FILE)?;
        responses.key_by_question_type(&surveys);

        Ok(Self {
            users,
            surveys,
            responses,
        })
    }

    /// Write all three files.
    pub fn save(&self, dir: &DataDir) -> Result<(), ModelError> {
        dir.ensure()?;
        dir.write(USERS_FILE, &self.users)?;
        dir.write(SURVEYS_FILE, &self.surveys)?;
        dir.write(RESPONSES_FILE, &self.responses)?;
        Ok(())
    }
}
