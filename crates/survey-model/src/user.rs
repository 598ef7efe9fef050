//! Platform members.

use crate::{ModelError, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Role of a member within the platform organisation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Manager,
    #[default]
    Member,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated employee profile.
///
/// The email is the join key used by responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Full name
    pub name: String,

    /// Email address, unique within a dataset
    pub email: String,

    /// Role, `member` when the model omits it
    #[serde(default)]
    pub role: UserRole,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            role,
        }
    }
}

impl Validate for User {
    fn validate(&self) -> Result<(), ModelError> {
        if self.name.trim().is_empty() {
            return Err(ModelError::invalid(
                format!("user '{}'", self.email),
                "name must not be empty",
            ));
        }
        if !is_valid_email(&self.email) {
            return Err(ModelError::invalid(
                format!("user '{}'", self.name),
                format!("'{}' is not a valid email address", self.email),
            ));
        }
        Ok(())
    }
}

/// Collection of users in generation order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<User>,
}

impl UserList {
    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Find a user by email (case-insensitive).
    pub fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
    }
}

impl Validate for UserList {
    fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::with_capacity(self.users.len());
        for user in &self.users {
            user.validate()?;
            if !seen.insert(user.email.to_ascii_lowercase()) {
                return Err(ModelError::invalid(
                    "user list",
                    format!("duplicate email '{}'", user.email),
                ));
            }
        }
        Ok(())
    }
}

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*\.[A-Za-z]{2,}$";

/// Compiled [`EMAIL_PATTERN`]; `None` only if the pattern fails to compile.
fn email_regex() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).ok()).as_ref()
}

/// Syntactic email check: a local part, `@`, and a dotted domain with an
/// alphabetic top-level label.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.len() > 254 || email.starts_with('.') || email.contains("..") {
        return false;
    }
    match email.split_once('@') {
        Some((local, _)) if local.ends_with('.') || local.len() > 64 => false,
        Some(_) => email_regex().is_some_and(|re| re.is_match(email)),
        None => false,
    }
}
