//! Black Hole HTTP client
//!
//! [`BlackHoleClient`] is the single egress point for every API call. It
//! attaches the persisted bearer token to each request and, whenever the
//! server answers 401, clears the persisted session, runs the registered
//! expiry hooks and broadcasts [`GatewayEvent::SessionExpired`].

pub mod client;
pub mod types;

pub use client::config::ClientConfig;
pub use client::error::ClientError;
pub use client::{
    BlackHoleClient, BlackHoleClientBuilder, ExpiryHook, ExpiryHookId, GatewayEvent,
};
