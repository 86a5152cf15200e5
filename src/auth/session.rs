//! Session state machine.
//!
//! Derives a logical session state from the token store contents at
//! startup, then exposes synchronous login/logout transitions. Resolution
//! runs exactly once per process lifetime; after that, expiry is only
//! re-validated reactively when the server rejects a credential.

use std::sync::Arc;

use tracing::{debug, info};

use crate::auth::claims;
use crate::auth::TokenStore;
use crate::models::Identity;

/// Logical session state. `Resolving` holds only until the one-shot
/// bootstrap read of the token store; consumers must treat it as
/// "state unknown" and defer authenticated-only actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Resolving,
    Authenticated,
    Anonymous,
}

pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    state: SessionState,
    identity: Option<Identity>,
    credential: Option<String>,
}

impl SessionManager {
    /// Create an unresolved session over an injected store.
    /// Call `resolve` once before consulting any accessor.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            state: SessionState::Resolving,
            identity: None,
            credential: None,
        }
    }

    /// One-shot bootstrap: derive the session state from the stored pair.
    /// Malformed, expired, or identity-less credentials are corrected by
    /// clearing the store - never surfaced as errors.
    pub fn resolve(&mut self) {
        if self.state != SessionState::Resolving {
            return;
        }

        let Some(token) = self.store.credential() else {
            debug!("No stored credential, starting anonymous");
            self.state = SessionState::Anonymous;
            return;
        };

        let expiry = match claims::decode_expiry(&token) {
            Ok(expiry) => expiry,
            Err(e) => {
                info!(error = %e, "Stored credential is undecodable, clearing");
                self.store.clear();
                self.state = SessionState::Anonymous;
                return;
            }
        };

        if expiry < chrono::Utc::now() {
            info!("Stored credential expired, clearing");
            self.store.clear();
            self.state = SessionState::Anonymous;
            return;
        }

        // A credential without an identity is corrupt state: clear both.
        let Some(identity) = self.store.identity() else {
            info!("Stored credential has no identity, clearing");
            self.store.clear();
            self.state = SessionState::Anonymous;
            return;
        };

        debug!(username = %identity.username, "Restored session from store");
        self.identity = Some(identity);
        self.credential = Some(token);
        self.state = SessionState::Authenticated;
    }

    /// Record a successful authentication exchange. The credential is not
    /// validated here; the caller received it from the server.
    pub fn login(&mut self, identity: Identity, credential: String) {
        info!(username = %identity.username, "Logging in");
        self.store.set(&identity, &credential);
        self.identity = Some(identity);
        self.credential = Some(credential);
        self.state = SessionState::Authenticated;
    }

    pub fn logout(&mut self) {
        info!("Logging out");
        self.store.clear();
        self.identity = None;
        self.credential = None;
        self.state = SessionState::Anonymous;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_resolving(&self) -> bool {
        self.state == SessionState::Resolving
    }

    pub fn is_authenticated(&self) -> bool {
        self.state == SessionState::Authenticated
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The bearer credential, present only while authenticated.
    pub fn credential(&self) -> Option<&str> {
        self.credential.as_deref()
    }
}
