//! Application context wiring.
//!
//! All collaborators are constructed once at process start and injected;
//! there is no module-level mutable state. A missing configuration fails
//! construction (and therefore boot), never an individual request.

use std::sync::Arc;

use quickslot_core::{EventService, TokenLifecycle};
use quickslot_domain::Result;
use quickslot_infra::{AppConfig, GoogleCalendarClient, OAuthClient};

use crate::credentials::CredentialStore;

/// Shared per-process context for boundary commands.
pub struct AppContext {
    pub config: AppConfig,
    pub events: EventService,
    pub oauth: Arc<OAuthClient>,
    pub credentials: Arc<dyn CredentialStore>,
}

impl AppContext {
    /// Wire the production collaborators from configuration.
    ///
    /// # Errors
    /// Returns `Config` if an HTTP client cannot be constructed.
    pub fn new(config: AppConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let oauth = Arc::new(OAuthClient::new(config.google.clone())?);
        let calendar =
            Arc::new(GoogleCalendarClient::new()?.with_calendar_id(config.calendar_id.clone()));
        let events = EventService::new(TokenLifecycle::new(oauth.clone()), calendar);

        Ok(Self { config, events, oauth, credentials })
    }

    /// Assemble a context from pre-built collaborators (used by tests to
    /// substitute mock ports).
    pub fn from_parts(
        config: AppConfig,
        events: EventService,
        oauth: Arc<OAuthClient>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self { config, events, oauth, credentials }
    }
}
