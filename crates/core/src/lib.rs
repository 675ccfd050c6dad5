//! # Quickslot Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The natural-language temporal expression parser
//! - The credential lifecycle (staleness check + refresh)
//! - The event creation pipeline
//! - Port/adapter interfaces (traits)
//!
//! ## Architecture Principles
//! - Only depends on `quickslot-domain`
//! - No HTTP or persistence code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod auth;
pub mod events;
pub mod temporal;

// Re-export specific items to avoid ambiguity
pub use auth::lifecycle::{FreshCredential, TokenLifecycle};
pub use auth::ports::{RefreshedToken, TokenExchange};
pub use events::ports::CalendarApi;
pub use events::service::{AvailabilityOutcome, CreateOutcome, CreateRequest, EventService};
pub use temporal::{parse, ResolvedZone};
