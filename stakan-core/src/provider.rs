use async_trait::async_trait;

use crate::StakanError;
use crate::types::{
    BookAnalysis, BookQuery, Candle, CandleAnalytics, CandleQuery, OrderBookSnapshot, Page,
    PageToken, UserInfo,
};

/// One page of order-book snapshots plus the server's analysis block.
#[derive(Debug, Clone, PartialEq)]
pub struct BookPage {
    /// Snapshots and continuation cursor.
    pub page: Page<OrderBookSnapshot>,
    /// Server-computed analysis for the returned window, when provided.
    pub analysis: Option<BookAnalysis>,
}

/// Contract for anything that can serve market data to the client core.
///
/// `stakan-http` implements this over the remote REST API; `stakan-mock`
/// provides a deterministic in-process implementation for tests and CI.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Short provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// List available instrument symbols.
    async fn symbols(&self) -> Result<Vec<String>, StakanError>;

    /// Fetch the authenticated user's identity.
    async fn me(&self) -> Result<UserInfo, StakanError>;

    /// Fetch one page of candles for `query`. `cursor: None` requests the
    /// first page.
    async fn candles_page(
        &self,
        query: &CandleQuery,
        cursor: Option<&PageToken>,
    ) -> Result<Page<Candle>, StakanError>;

    /// Fetch one page of order-book snapshots for `query`.
    async fn book_page(
        &self,
        query: &BookQuery,
        cursor: Option<&PageToken>,
    ) -> Result<BookPage, StakanError>;

    /// Submit an externally-loaded candle dataset for server-side analysis.
    async fn analyze_candles(&self, candles: &[Candle]) -> Result<CandleAnalytics, StakanError>;
}
