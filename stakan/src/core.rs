use std::sync::Arc;

use chrono::Utc;

use stakan_core::export::{CsvDocument, candles_to_csv};
use stakan_core::types::{Candle, CandleAnalytics, UserInfo};
use stakan_core::{MarketData, StakanError};

use crate::feeds::{BookFeed, CandleFeed, candle_feed};

/// Dashboard client over a single market-data provider.
pub struct Stakan {
    provider: Arc<dyn MarketData>,
}

impl std::fmt::Debug for Stakan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stakan")
            .field("provider", &self.provider.name())
            .finish()
    }
}

/// Builder for [`Stakan`]. A provider is required.
#[derive(Default)]
pub struct StakanBuilder {
    provider: Option<Arc<dyn MarketData>>,
}

impl StakanBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the provider serving every request.
    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn MarketData>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Finish the builder.
    ///
    /// # Errors
    /// `Validation` when no provider was registered.
    pub fn build(self) -> Result<Stakan, StakanError> {
        let provider = self
            .provider
            .ok_or_else(|| StakanError::validation("a market-data provider is required"))?;
        Ok(Stakan { provider })
    }
}

impl Stakan {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> StakanBuilder {
        StakanBuilder::new()
    }

    /// Name of the underlying provider.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Symbols the provider serves.
    ///
    /// # Errors
    /// Propagates the provider error.
    pub async fn symbols(&self) -> Result<Vec<String>, StakanError> {
        self.provider.symbols().await
    }

    /// The authenticated user's identity.
    ///
    /// # Errors
    /// Propagates the provider error; `Auth` when the session is invalid.
    pub async fn me(&self) -> Result<UserInfo, StakanError> {
        self.provider.me().await
    }

    /// Server-side analytics over an explicit candle set.
    ///
    /// # Errors
    /// `Validation` on empty input; otherwise the provider error.
    pub async fn analyze_candles(
        &self,
        candles: &[Candle],
    ) -> Result<CandleAnalytics, StakanError> {
        self.provider.analyze_candles(candles).await
    }

    /// Render candles to a downloadable CSV document stamped with the
    /// current time. Returns `None` for an empty set.
    #[must_use]
    pub fn export_candles(&self, candles: &[Candle]) -> Option<CsvDocument> {
        let doc = candles_to_csv(candles, Utc::now());
        if let Some(doc) = &doc {
            tracing::debug!(file = %doc.file_name, rows = candles.len(), "exported candles");
        }
        doc
    }

    /// A fresh, idle candle feed over this client's provider.
    #[must_use]
    pub fn candle_feed(&self) -> CandleFeed {
        candle_feed(Arc::clone(&self.provider))
    }

    /// A fresh, idle order-book feed over this client's provider.
    #[must_use]
    pub fn book_feed(&self) -> BookFeed {
        BookFeed::new(Arc::clone(&self.provider))
    }
}
