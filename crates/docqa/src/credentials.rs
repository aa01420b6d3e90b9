//! Bearer credential persistence
//!
//! The credential is an opaque token proving an authenticated session.
//! Consumers only see the get/set/clear capability; the file-backed store
//! keeps the token as JSON under the Quill config directory, and absence
//! of the stored token is the sole unauthenticated signal.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

/// Credential filename in the Quill config directory
const CREDENTIALS_FILE: &str = "credentials.json";

/// Stored credential data
#[derive(Debug, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
}

/// Get/set/clear capability for the bearer credential
pub trait CredentialStore: Send + Sync {
    /// The stored token, or `None` when unauthenticated
    fn load(&self) -> Option<String>;

    /// Persist a token, replacing any previous one
    fn store(&self, token: &str) -> Result<()>;

    /// Remove the stored token
    fn clear(&self) -> Result<()>;
}

/// File-backed credential store (~/.config/quill/credentials.json)
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    /// Create a store at the default config-directory location
    pub fn new() -> Result<Self> {
        let path =
            config::config_path(CREDENTIALS_FILE).context("Could not determine config directory")?;
        Ok(Self { path })
    }

    /// Create a store at an explicit path
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let stored: StoredCredential = serde_json::from_str(&content).ok()?;
        Some(stored.token)
    }

    fn store(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let stored = StoredCredential {
            token: token.to_string(),
        };
        let content = serde_json::to_string_pretty(&stored)?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write credential file: {}", self.path.display()))?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove credential file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

/// In-memory credential store for tests and ephemeral sessions
pub struct InMemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    /// Create an empty (unauthenticated) store
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }

    /// Create a store seeded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl Default for InMemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Option<String> {
        self.token.read().unwrap().clone()
    }

    fn store(&self, token: &str) -> Result<()> {
        *self.token.write().unwrap() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.write().unwrap() = None;
        Ok(())
    }
}
