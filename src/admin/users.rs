use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::render::render_grid;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Rejected admin form input, caught before anything is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("enter a valid email address (e.g. admin@example.com)")]
    InvalidEmail,

    #[error("password too short (min {min} characters)")]
    PasswordTooShort { min: usize },
}

/// Email/password pair for signing in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub(crate) email: String,
    pub(crate) password: String,
}

impl Credentials {
    /// Email is trimmed and lower-cased; the password is taken verbatim.
    pub fn new(email: &str, password: &str) -> Result<Self, InputError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(InputError::MissingCredentials);
        }
        if !email.contains('@') {
            return Err(InputError::InvalidEmail);
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password_len", &self.password.len())
            .finish()
    }
}

/// A user to create through the admin function.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
    pub is_active: bool,
}

impl NewUser {
    pub fn new(
        email: &str,
        password: &str,
        full_name: Option<&str>,
        is_active: bool,
    ) -> Result<Self, InputError> {
        let email = email.trim().to_lowercase();
        let password = password.trim().to_string();
        if email.is_empty() || password.is_empty() {
            return Err(InputError::MissingCredentials);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(InputError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        let full_name = full_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Ok(Self {
            email,
            password,
            full_name,
            is_active,
        })
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password_len", &self.password.len())
            .field("full_name", &self.full_name)
            .field("is_active", &self.is_active)
            .finish()
    }
}

/// A user as listed by the admin function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    #[serde(default)]
    pub id: Value,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl AdminUser {
    /// Only an explicit `false` counts as inactive.
    pub fn is_active(&self) -> bool {
        self.is_active != Some(false)
    }

    fn id_text(&self) -> String {
        match &self.id {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull the `users` array out of a list response.
///
/// A missing or non-array `users` yields no users; malformed entries are
/// skipped.
pub fn users_from_payload(payload: &Value) -> Vec<AdminUser> {
    let Some(items) = payload.get("users").and_then(Value::as_array) else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value(item.clone()) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "skipping malformed user entry");
                None
            }
        })
        .collect()
}

pub fn render_users(users: &[AdminUser]) -> String {
    if users.is_empty() {
        return "no users found\n".to_string();
    }
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id_text(),
                u.full_name.clone().unwrap_or_default(),
                u.email.clone().unwrap_or_default(),
                u.role.clone().unwrap_or_default(),
                if u.is_active() { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect();
    render_grid(&["ID", "Name", "Email", "Role", "Status"], &rows)
}
