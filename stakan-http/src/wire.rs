//! Wire DTOs for the dashboard API. Internal to this crate; public types in
//! `stakan-core` carry their own serde derives and are reused directly.

use serde::{Deserialize, Serialize};
use stakan_core::types::{BookAnalysis, Candle, CandleAnalytics, OrderBookSnapshot};

use crate::session::Credential;

#[derive(Serialize)]
pub(crate) struct CredentialsRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPairResponse> for Credential {
    fn from(wire: TokenPairResponse) -> Self {
        Self {
            access_token: wire.access_token,
            refresh_token: wire.refresh_token,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct RefreshResponse {
    pub access_token: String,
}

#[derive(Deserialize)]
pub(crate) struct SymbolsResponse {
    #[serde(default)]
    pub symbols: Vec<String>,
}

#[derive(Deserialize)]
pub(crate) struct CandlesResponse {
    #[serde(default)]
    pub candles: Vec<Candle>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct OrderBookResponse {
    #[serde(default)]
    pub snapshots: Vec<OrderBookSnapshot>,
    #[serde(default)]
    pub analysis: Option<BookAnalysis>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct AnalyzeResponse {
    pub analytics: CandleAnalytics,
}
