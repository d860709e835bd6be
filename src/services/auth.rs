//! Credential exchange with the backend's auth endpoints and the persisted
//! session.
//!
//! The backend is the authority on accounts. This client forwards
//! credentials and remembers the opaque user id returned by a successful
//! login, which is attached to later action requests.

use crate::services::action_client::{HttpBackend, ServiceError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct SignupRequest<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
    new_password: &'a str,
}

/// Success body of the auth endpoints
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<serde_json::Value>,
}

impl AuthResponse {
    /// The user id as a string; the backend sends it as a number
    pub fn user_id(&self) -> Option<String> {
        match self.user_id.as_ref()? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Thin client for `/api/login`, `/api/signup` and `/api/forgot-password`
#[derive(Debug, Clone)]
pub struct AuthClient {
    backend: HttpBackend,
}

impl AuthClient {
    pub fn new(backend: HttpBackend) -> Self {
        Self { backend }
    }

    /// Log in and return the user id
    pub fn login(&self, email: &str, password: &str) -> Result<String, ServiceError> {
        let response: AuthResponse = self
            .backend
            .post_json("login", &LoginRequest { email, password })?;
        response
            .user_id()
            .ok_or_else(|| ServiceError::Decode("login response has no userId".to_string()))
    }

    /// Create an account. Returns the new user id when the backend sends one.
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<String>, ServiceError> {
        let response: AuthResponse = self.backend.post_json(
            "signup",
            &SignupRequest {
                username,
                email,
                password,
            },
        )?;
        Ok(response.user_id())
    }

    /// Reset the password for an account
    pub fn forgot_password(&self, email: &str, new_password: &str) -> Result<String, ServiceError> {
        let response: AuthResponse = self.backend.post_json(
            "forgot-password",
            &ForgotPasswordRequest {
                email,
                new_password,
            },
        )?;
        Ok(response
            .message
            .unwrap_or_else(|| "Password updated successfully".to_string()))
    }
}

/// Persisted login state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Reads and writes the session file
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current session. A missing or corrupt file means logged out.
    pub fn load(&self) -> Option<Session> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!("Ignoring corrupt session file {}: {}", self.path.display(), e);
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(session)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(&self.path, contents)
    }

    /// Forget the session. Returns whether there was one.
    pub fn clear(&self) -> std::io::Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}
