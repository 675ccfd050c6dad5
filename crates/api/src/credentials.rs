//! Credential persistence capability.
//!
//! The core never touches the transport-level session mechanism; the
//! embedding application implements this store against whatever it uses
//! (cookies, database rows, keychain). The JSON wire format of a stored
//! credential is fixed by [`quickslot_domain::Credential`]: `access_token`,
//! optional `refresh_token`, optional `expiry_date` in epoch milliseconds.
//! Stored values must be host-only, script-inaccessible, and transport-secure
//! where the transport allows it.
//!
//! Concurrent requests over the same session key are not coordinated here;
//! the last write wins.

use std::collections::HashMap;

use async_trait::async_trait;
use quickslot_domain::{Credential, Result};
use tokio::sync::RwLock;

/// Capability for loading and persisting per-session credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the credential stored for a session, if any.
    async fn get(&self, session_key: &str) -> Result<Option<Credential>>;

    /// Persist a (possibly refreshed) credential for a session.
    async fn put(&self, session_key: &str, credential: &Credential) -> Result<()>;
}

/// In-memory store for tests and single-process embedding.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<String, Credential>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn get(&self, session_key: &str) -> Result<Option<Credential>> {
        Ok(self.inner.read().await.get(session_key).cloned())
    }

    async fn put(&self, session_key: &str, credential: &Credential) -> Result<()> {
        self.inner.write().await.insert(session_key.to_string(), credential.clone());
        Ok(())
    }
}
