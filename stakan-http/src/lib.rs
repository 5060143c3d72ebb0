//! stakan-http
//!
//! The reqwest-backed [`stakan_core::MarketData`] provider.
//!
//! - `session`: in-memory bearer credential plus the injectable `TokenStore`
//!   seam for durable renewal-token persistence.
//! - `transport`: uniform request dispatch with exactly-once transparent
//!   credential refresh on authorization failure.
//! - `client`: typed endpoint bindings (`login`, `register`, `me`,
//!   `symbols`, `candles`, `orderbook`, `analyze-csv`) and the builder.
//!
//! The refresh protocol is structural: a rejected request triggers at most
//! one `POST /refresh` followed by at most one replay, never a loop. A
//! refresh failure clears the session and surfaces a terminal
//! [`StakanError::Auth`](stakan_core::StakanError::Auth), signalling the
//! caller to send the user back to the login entry point.

mod client;
mod session;
mod transport;
mod wire;

pub use client::{HttpMarketData, HttpMarketDataBuilder};
pub use session::{Credential, MemoryTokenStore, RENEWAL_TOKEN_KEY, Session, TokenStore};
