//! Event creation commands
//!
//! The single consolidated entry point for "parse text and create an event".
//! Every failure is reported as one structured response; there is no partial
//! success and no silent fallback.

use std::time::Instant;

use quickslot_domain::{Credential, QuickslotError};
use tracing::{debug, warn};

use crate::requests::{CreateEventRequest, CreateEventResponse};
use crate::utils::logging::{error_label, log_command_execution};
use crate::AppContext;

/// Create a calendar event for the session identified by `session_key`.
///
/// Loads the stored credential, runs the pipeline, and re-persists the
/// credential when the pipeline refreshed it. Repeating an identical request
/// creates a second, distinct remote event.
pub async fn create_event(
    ctx: &AppContext,
    session_key: &str,
    request: CreateEventRequest,
) -> CreateEventResponse {
    let command_name = "events::create_event";
    let start = Instant::now();

    let response = run_pipeline(ctx, session_key, request).await;

    log_command_execution(command_name, start.elapsed(), response.ok);
    response
}

async fn run_pipeline(
    ctx: &AppContext,
    session_key: &str,
    request: CreateEventRequest,
) -> CreateEventResponse {
    if !ctx.config.calendar_enabled {
        return failure_response(&QuickslotError::FeatureDisabled(
            "calendar integration is disabled".to_string(),
        ));
    }

    let core_request = match request.into_core_request() {
        Ok(core_request) => core_request,
        Err(error) => return failure_response(&error),
    };

    let stored = match ctx.credentials.get(session_key).await {
        Ok(credential) => credential.unwrap_or_default(),
        Err(error) => return failure_response(&error),
    };

    match ctx.events.create(core_request, stored).await {
        Ok(outcome) => {
            if let Some(refreshed) = &outcome.refreshed_credential {
                // The event exists remotely; a failed persistence write must
                // not turn the response into a failure
                if let Err(error) = ctx.credentials.put(session_key, refreshed).await {
                    warn!(error = %error, "failed to persist refreshed credential");
                }
            }
            CreateEventResponse::success(&outcome.parsed, &outcome.created)
        }
        Err(error) => failure_response(&error),
    }
}

fn failure_response(error: &QuickslotError) -> CreateEventResponse {
    debug!(error = %error, label = error_label(error), "create_event pipeline failed");
    CreateEventResponse::failure(error)
}
