//! # Bearer Token Storage
//!
//! The only client state that outlives a request. Cart and session are
//! never persisted.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  login ok   ──► set("token", jwt)                                       │
//! │  request    ──► get("token") ──► Authorization: Bearer <jwt>            │
//! │  401/logout ──► remove("token")                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - [`MemoryTokenStore`] lives as long as the process
//! - [`FileTokenStore`] keeps a JSON object `{ key: token }` on disk, so the
//!   storefront and admin tokens can share one file under different keys

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use secrecy::SecretString;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};

/// Key/value storage for bearer tokens.
pub trait TokenStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SecretString>;

    fn set(&self, key: &str, token: &str) -> ClientResult<()>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> ClientResult<()>;
}

// =============================================================================
// In-Memory Store
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Option<SecretString> {
        let tokens = self.tokens.read().unwrap_or_else(PoisonError::into_inner);
        tokens.get(key).cloned().map(SecretString::from)
    }

    fn set(&self, key: &str, token: &str) -> ClientResult<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.insert(key.to_string(), token.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// Tokens in a JSON file.
///
/// A missing or unreadable file reads as empty. Writes replace the whole
/// file atomically and leave it readable by the owner only.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileTokenStore {
            path: path.into(),
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> HashMap<String, String> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return HashMap::new(),
        };

        match serde_json::from_str(&raw) {
            Ok(tokens) => tokens,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt token file");
                HashMap::new()
            }
        }
    }

    /// Writes a sibling temp file (mode 0600 on Unix) and renames it over
    /// the target, so readers see either the old map or the new one.
    fn save(&self, tokens: &HashMap<String, String>) -> ClientResult<()> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(storage_error)?;
                parent
            }
            None => Path::new("."),
        };

        let json = serde_json::to_vec_pretty(tokens).map_err(storage_error)?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(storage_error)?;
        tmp.write_all(&json).map_err(storage_error)?;
        tmp.as_file().sync_all().map_err(storage_error)?;
        tmp.persist(&self.path).map_err(|e| storage_error(e.error))?;

        debug!(path = %self.path.display(), keys = tokens.len(), "Token file written");
        Ok(())
    }
}

fn storage_error(e: impl std::fmt::Display) -> ClientError {
    ClientError::TokenStorage(e.to_string())
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Option<SecretString> {
        let _guard = self.lock.read().unwrap_or_else(PoisonError::into_inner);
        self.load().remove(key).map(SecretString::from)
    }

    fn set(&self, key: &str, token: &str) -> ClientResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load();
        tokens.insert(key.to_string(), token.to_string());
        self.save(&tokens)
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let _guard = self.lock.write().unwrap_or_else(PoisonError::into_inner);
        let mut tokens = self.load();
        if tokens.remove(key).is_none() {
            return Ok(());
        }
        self.save(&tokens)
    }
}
