//! Calendar connection commands
//!
//! Thin wrappers over the OAuth client: start the browser flow, complete it
//! from the callback, and report whether a session holds usable credentials.

use quickslot_domain::Result;
use tracing::info;

use crate::AppContext;

/// Authorization URL and state for starting the browser-based connect flow.
pub async fn connect_url(ctx: &AppContext) -> (String, String) {
    ctx.oauth.generate_authorization_url().await
}

/// Complete the connect flow from the OAuth callback and persist the
/// resulting credential for the session.
///
/// # Errors
/// Returns `NotConnected` when the code exchange fails or the state does not
/// match, and storage errors from the credential store.
pub async fn complete_connection(
    ctx: &AppContext,
    session_key: &str,
    code: &str,
    state: &str,
) -> Result<()> {
    let credential = ctx.oauth.exchange_code_for_tokens(code, state).await?;
    ctx.credentials.put(session_key, &credential).await?;
    info!("calendar connected");
    Ok(())
}

/// Whether the session holds a credential that could authenticate a request.
///
/// # Errors
/// Returns storage errors from the credential store.
pub async fn is_connected(ctx: &AppContext, session_key: &str) -> Result<bool> {
    let stored = ctx.credentials.get(session_key).await?;
    Ok(stored.is_some_and(|credential| credential.is_usable()))
}
