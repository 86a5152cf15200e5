//! Durable persistence for the credential and user identity.
//!
//! The store holds exactly two keys: the serialized identity and the raw
//! credential string. It performs no validation; expiry and shape checks
//! belong to the session layer. Storage failures never cross the public
//! contract - they are logged and reflected as absent values.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::warn;

use crate::models::Identity;

/// Identity key file name
const IDENTITY_FILE: &str = "identity.json";

/// Credential key file name
const TOKEN_FILE: &str = "token";

/// Injected storage capability for the session layer.
/// Implementations must make `set` and `clear` full replacements so a
/// reader never observes a half-written pair.
pub trait TokenStore: Send + Sync {
    fn credential(&self) -> Option<String>;
    fn identity(&self) -> Option<Identity>;
    fn set(&self, identity: &Identity, credential: &str);
    fn clear(&self);
}

/// File-backed store: two files under a data directory, surviving
/// process restarts.
pub struct FileTokenStore {
    dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn identity_path(&self) -> PathBuf {
        self.dir.join(IDENTITY_FILE)
    }

    fn token_path(&self) -> PathBuf {
        self.dir.join(TOKEN_FILE)
    }

    fn remove_if_present(path: &PathBuf) {
        if path.exists() {
            if let Err(e) = std::fs::remove_file(path) {
                warn!(path = %path.display(), error = %e, "Failed to remove stored key");
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn credential(&self) -> Option<String> {
        let path = self.token_path();
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(token) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored credential");
                None
            }
        }
    }

    fn identity(&self) -> Option<Identity> {
        let path = self.identity_path();
        if !path.exists() {
            return None;
        }
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to read stored identity");
                return None;
            }
        };
        match serde_json::from_str(&contents) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!(error = %e, "Stored identity is not valid JSON");
                None
            }
        }
    }

    fn set(&self, identity: &Identity, credential: &str) {
        if let Err(e) = std::fs::create_dir_all(&self.dir) {
            warn!(error = %e, "Failed to create token store directory");
            return;
        }
        match serde_json::to_string(identity) {
            Ok(json) => {
                if let Err(e) = std::fs::write(self.identity_path(), json) {
                    warn!(error = %e, "Failed to write identity");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize identity"),
        }
        if let Err(e) = std::fs::write(self.token_path(), credential) {
            warn!(error = %e, "Failed to write credential");
        }
    }

    fn clear(&self) {
        Self::remove_if_present(&self.identity_path());
        Self::remove_if_present(&self.token_path());
    }
}

/// In-memory store for tests and embedders that manage their own
/// persistence.
#[derive(Default)]
pub struct MemoryTokenStore {
    inner: Mutex<MemoryPair>,
}

#[derive(Default)]
struct MemoryPair {
    identity: Option<Identity>,
    credential: Option<String>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed the pair, bypassing the session layer. Test setup only
    /// needs `set`, but seeding a credential without an identity requires
    /// direct access.
    pub fn seed(&self, identity: Option<Identity>, credential: Option<String>) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.identity = identity;
        inner.credential = credential;
    }
}

impl TokenStore for MemoryTokenStore {
    fn credential(&self) -> Option<String> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.credential.clone()
    }

    fn identity(&self) -> Option<Identity> {
        let inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.identity.clone()
    }

    fn set(&self, identity: &Identity, credential: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.identity = Some(identity.clone());
        inner.credential = Some(credential.to_string());
    }

    fn clear(&self) {
        let mut inner = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        inner.identity = None;
        inner.credential = None;
    }
}
