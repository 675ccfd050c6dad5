//! Configuration loading and management

pub mod loader;

// Re-export commonly used items
pub use loader::{load, load_from_env, AppConfig, GoogleAuthConfig};
