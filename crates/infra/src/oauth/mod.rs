//! OAuth 2.0 authorization flow against the Google authorization server

pub mod client;
pub mod pkce;

pub use client::OAuthClient;
pub use pkce::{generate_state, PkceChallenge};
