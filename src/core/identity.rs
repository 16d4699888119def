//! Identity/session abstractions

use crate::core::transaction::OwnerId;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;

/// Source of the currently authenticated owner.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn current_owner(&self) -> Option<OwnerId>;

    /// Receives the new owner, or `None` once the session ends.
    fn subscribe(&self) -> watch::Receiver<Option<OwnerId>>;

    async fn sign_out(&self) -> Result<()>;
}

/// Authentication state of a transaction store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Loading(OwnerId),
    Authenticated(OwnerId),
}

impl AuthState {
    pub fn owner(&self) -> Option<&OwnerId> {
        match self {
            AuthState::Unauthenticated => None,
            AuthState::Loading(owner) | AuthState::Authenticated(owner) => Some(owner),
        }
    }
}
