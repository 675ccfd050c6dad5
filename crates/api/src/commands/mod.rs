//! Boundary commands

pub mod auth;
pub mod events;

pub use auth::{complete_connection, connect_url, is_connected};
pub use events::create_event;
