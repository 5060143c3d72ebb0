use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use stakan_core::types::{
    BookQuery, Candle, CandleAnalytics, CandleQuery, Page, PageToken, UserInfo,
};
use stakan_core::{BookPage, MarketData, StakanError};
use tracing::{debug, instrument};
use url::Url;

use crate::session::{MemoryTokenStore, Session, TokenStore};
use crate::transport::Transport;
use crate::wire::{
    AnalyzeResponse, CandlesResponse, CredentialsRequest, OrderBookResponse, SymbolsResponse,
    TokenPairResponse,
};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Typed client for the dashboard API, implementing [`MarketData`].
///
/// Construct via [`HttpMarketData::builder`]. One instance owns one
/// [`Session`]; clones of the `Arc`-wrapped client share it.
pub struct HttpMarketData {
    transport: Transport,
}

/// Builder for [`HttpMarketData`].
///
/// Defaults: 30 second request timeout, in-memory renewal-token store.
#[must_use]
pub struct HttpMarketDataBuilder {
    base_url: Option<String>,
    timeout: Duration,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl HttpMarketDataBuilder {
    fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            token_store: None,
        }
    }

    /// Set the API base URL, e.g. `http://localhost:8080/v1`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the per-request timeout.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Inject a durable renewal-token store. Without one the renewal token
    /// lives in memory and the session does not survive a restart.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    /// `Validation` when no base URL was provided or it does not parse;
    /// `Network` when the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpMarketData, StakanError> {
        let raw = self
            .base_url
            .ok_or_else(|| StakanError::validation("base URL is required"))?;
        // Normalize to a trailing slash so endpoint joins append segments.
        let normalized = format!("{}/", raw.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|e| StakanError::validation(format!("invalid base URL {raw:?}: {e}")))?;

        let store = self
            .token_store
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));
        let session = Arc::new(Session::new(store));
        let transport = Transport::new(base_url, self.timeout, session)?;
        Ok(HttpMarketData { transport })
    }
}

impl HttpMarketData {
    /// Start building a client.
    pub fn builder() -> HttpMarketDataBuilder {
        HttpMarketDataBuilder::new()
    }

    /// The session owning this client's credential.
    #[must_use]
    pub fn session(&self) -> &Arc<Session> {
        self.transport.session()
    }

    /// `true` when a bearer credential is currently held.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.transport.session().bearer().is_some()
    }

    /// Authenticate with username/password and install the credential.
    ///
    /// # Errors
    /// `Validation` for blank input (no request is sent); transport errors
    /// otherwise.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<(), StakanError> {
        validate_credentials(username, password)?;
        let pair: TokenPairResponse = self
            .transport
            .post_json("login", encode(&CredentialsRequest { username, password })?)
            .await?;
        self.transport.session().set_credential(pair.into());
        debug!(username, "logged in");
        Ok(())
    }

    /// Create an account and install the returned credential.
    ///
    /// # Errors
    /// Same contract as [`login`](Self::login).
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<(), StakanError> {
        validate_credentials(username, password)?;
        let pair: TokenPairResponse = self
            .transport
            .post_json("register", encode(&CredentialsRequest { username, password })?)
            .await?;
        self.transport.session().set_credential(pair.into());
        debug!(username, "registered");
        Ok(())
    }

    /// Restore a session at process start: if a renewal token is persisted,
    /// exchange it for a fresh bearer and fetch the user identity.
    ///
    /// Returns `Ok(None)` when there is nothing to restore (no renewal token,
    /// or the server rejected it, in which case the stale token is cleared).
    ///
    /// # Errors
    /// `Network` when the refresh could not reach the server; the renewal
    /// token is kept so a later attempt can succeed.
    #[instrument(skip(self))]
    pub async fn resume(&self) -> Result<Option<UserInfo>, StakanError> {
        let Some(renewal) = self.transport.session().renewal_token() else {
            return Ok(None);
        };
        match self.transport.refresh(&renewal).await {
            Ok(()) => {}
            Err(e @ StakanError::Network(_)) => return Err(e),
            Err(e) => {
                debug!(error = %e, "stored renewal token rejected, clearing session");
                self.transport.session().clear();
                return Ok(None);
            }
        }
        self.me().await.map(Some)
    }

    /// Drop the session: bearer and renewal token. Purely client-side.
    pub fn logout(&self) {
        self.transport.session().clear();
    }
}

#[async_trait]
impl MarketData for HttpMarketData {
    fn name(&self) -> &'static str {
        "stakan-http"
    }

    async fn symbols(&self) -> Result<Vec<String>, StakanError> {
        let wire: SymbolsResponse = self.transport.get_json("symbols", &[]).await?;
        Ok(wire.symbols)
    }

    async fn me(&self) -> Result<UserInfo, StakanError> {
        self.transport.get_json("me", &[]).await
    }

    #[instrument(skip(self), fields(symbol = %query.symbol))]
    async fn candles_page(
        &self,
        query: &CandleQuery,
        cursor: Option<&PageToken>,
    ) -> Result<Page<Candle>, StakanError> {
        query.validate()?;
        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("interval", query.interval.to_string()),
            ("start", iso_instant(query.start)),
            ("end", iso_instant(query.end)),
            ("page_size", query.page_size.to_string()),
        ];
        if let Some(token) = cursor {
            params.push(("page_token", token.as_str().to_string()));
        }
        let wire: CandlesResponse = self.transport.get_json("candles", &params).await?;
        debug!(count = wire.candles.len(), "candle page fetched");
        Ok(Page {
            items: wire.candles,
            next: PageToken::from_wire(wire.next_page_token),
        })
    }

    #[instrument(skip(self), fields(symbol = %query.symbol))]
    async fn book_page(
        &self,
        query: &BookQuery,
        cursor: Option<&PageToken>,
    ) -> Result<BookPage, StakanError> {
        query.validate()?;
        let mut params = vec![
            ("symbol", query.symbol.clone()),
            ("start", iso_instant(query.start)),
            ("end", iso_instant(query.end)),
            ("page_size", query.page_size.to_string()),
        ];
        if let Some(token) = cursor {
            params.push(("page_token", token.as_str().to_string()));
        }
        let wire: OrderBookResponse = self.transport.get_json("orderbook", &params).await?;
        debug!(count = wire.snapshots.len(), "order-book page fetched");
        Ok(BookPage {
            page: Page {
                items: wire.snapshots,
                next: PageToken::from_wire(wire.next_page_token),
            },
            analysis: wire.analysis,
        })
    }

    #[instrument(skip_all, fields(count = candles.len()))]
    async fn analyze_candles(&self, candles: &[Candle]) -> Result<CandleAnalytics, StakanError> {
        if candles.is_empty() {
            return Err(StakanError::validation("no candles to analyze"));
        }
        let wire: AnalyzeResponse = self
            .transport
            .post_json("analyze-csv", encode(&candles)?)
            .await?;
        Ok(wire.analytics)
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<(), StakanError> {
    if username.trim().is_empty() {
        return Err(StakanError::validation("username must not be empty"));
    }
    if password.is_empty() {
        return Err(StakanError::validation("password must not be empty"));
    }
    Ok(())
}

fn encode<T: serde::Serialize>(body: &T) -> Result<serde_json::Value, StakanError> {
    serde_json::to_value(body)
        .map_err(|e| StakanError::decode(format!("failed to encode request body: {e}")))
}

fn iso_instant(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
