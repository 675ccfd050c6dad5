//! # Quickslot API
//!
//! Boundary layer for the event-creation pipeline: the strict request/
//! response schema, the consolidated create-event command, the credential
//! store capability, and process wiring.
//!
//! The surrounding product (chat panels, wizards, persistence of
//! transcripts) lives outside this workspace and only calls in through
//! these commands.

pub mod commands;
pub mod context;
pub mod credentials;
pub mod requests;
pub mod utils;

// Re-export commonly used items
pub use commands::{complete_connection, connect_url, create_event, is_connected};
pub use context::AppContext;
pub use credentials::{CredentialStore, InMemoryCredentialStore};
pub use requests::{CreateEventRequest, CreateEventResponse, CreatedPayload, IntervalPayload};
pub use utils::logging::init_tracing;
