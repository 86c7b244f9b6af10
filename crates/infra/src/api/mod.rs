//! REST adapter for the core transport port

mod auth;
mod rest;

pub use auth::{AccessTokenProvider, StaticTokenProvider};
pub use rest::RestTransport;
