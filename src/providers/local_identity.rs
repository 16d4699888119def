use crate::core::identity::IdentityProvider;
use crate::core::transaction::OwnerId;
use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tracing::info;

/// Identity provider for a single local user, typically taken from the config file.
pub struct LocalIdentityProvider {
    owner: watch::Sender<Option<OwnerId>>,
}

impl LocalIdentityProvider {
    pub fn new(owner: Option<OwnerId>) -> Self {
        let (owner, _) = watch::channel(owner);
        Self { owner }
    }

    /// Switches the session to `owner` and notifies subscribers.
    pub fn sign_in(&self, owner: OwnerId) {
        info!("Signed in as {}", owner);
        self.owner.send_replace(Some(owner));
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn current_owner(&self) -> Option<OwnerId> {
        self.owner.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<OwnerId>> {
        self.owner.subscribe()
    }

    async fn sign_out(&self) -> Result<()> {
        info!("Signed out");
        self.owner.send_replace(None);
        Ok(())
    }
}
