//! Process-wide authentication state
//!
//! An explicit, injectable store with a defined lifecycle, passed by
//! reference to consumers. Until [`SessionManager::ready`] reports true,
//! the absence of a user may simply mean identity resolution is still in
//! flight; consumers must gate on readiness before branching on the user.

use std::sync::Arc;

use log::{info, warn};

use crate::api::AuthApi;
use crate::credentials::CredentialStore;
use crate::models::{ProfileUpdate, User};

/// Lifecycle of the authentication state
///
/// Moves forward exactly once per instance:
/// `Uninitialized → Resolving → Ready`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Resolving,
    Ready,
}

/// Holder of the credential and the authenticated user
pub struct SessionManager {
    state: SessionState,
    user: Option<User>,
    credentials: Arc<dyn CredentialStore>,
}

impl SessionManager {
    /// Create an uninitialized manager over a credential store
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            state: SessionState::Uninitialized,
            user: None,
            credentials,
        }
    }

    /// Resolve the startup identity, at most once per instance
    ///
    /// With a stored credential, the identity endpoint decides: success
    /// populates the user; failure (expired or invalid credential) clears
    /// the credential. Either way, and immediately when no credential is
    /// stored, the manager ends up ready.
    pub fn initialize(&mut self, auth: &dyn AuthApi) {
        if self.state != SessionState::Uninitialized {
            return;
        }
        self.state = SessionState::Resolving;

        if self.credentials.load().is_some() {
            match auth.me() {
                Ok(user) => {
                    info!("Resolved session for {}", user.username);
                    self.user = Some(user);
                }
                Err(e) => {
                    warn!("Stored credential rejected: {}", e);
                    // A 401 already cleared the store; clear for the other
                    // failure modes too so stale tokens don't linger.
                    if let Err(e) = self.credentials.clear() {
                        warn!("Failed to clear stored credential: {}", e);
                    }
                }
            }
        }

        self.state = SessionState::Ready;
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether initial identity resolution has completed
    pub fn ready(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// The authenticated user, if any
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Record a successful authentication exchange
    ///
    /// Persists the credential and replaces the user wholesale.
    pub fn login(&mut self, token: &str, user: User) -> anyhow::Result<()> {
        self.credentials.store(token)?;
        info!("Signed in as {}", user.username);
        self.user = Some(user);
        Ok(())
    }

    /// Clear the credential and the user
    ///
    /// Callers are responsible for navigating to the unauthenticated view
    /// afterward.
    pub fn logout(&mut self) -> anyhow::Result<()> {
        self.credentials.clear()?;
        self.user = None;
        info!("Signed out");
        Ok(())
    }

    /// Merge a partial profile update into the current user
    ///
    /// Never touches the credential. No-op when signed out.
    pub fn patch(&mut self, update: &ProfileUpdate) {
        if let Some(user) = &mut self.user {
            update.apply(user);
        }
    }
}
