use std::sync::Arc;

use async_trait::async_trait;

use stakan_core::types::{
    BookAnalysis, BookQuery, Candle, CandleQuery, OrderBookSnapshot, Page, PageToken,
};
use stakan_core::{FeedPhase, FetchOutcome, MarketData, PageSource, Paginator, StakanError};

/// Page source pulling candle pages from a provider.
pub struct CandleSource {
    provider: Arc<dyn MarketData>,
}

#[async_trait]
impl PageSource for CandleSource {
    type Query = CandleQuery;
    type Item = Candle;
    type Attachment = ();

    async fn fetch_page(
        &self,
        query: &CandleQuery,
        cursor: Option<&PageToken>,
    ) -> Result<(Page<Candle>, ()), StakanError> {
        let page = self.provider.candles_page(query, cursor).await?;
        Ok((page, ()))
    }
}

/// Accumulating candle feed for one dashboard panel.
pub type CandleFeed = Paginator<CandleSource>;

/// Build a candle feed over `provider`.
#[must_use]
pub fn candle_feed(provider: Arc<dyn MarketData>) -> CandleFeed {
    Paginator::new(CandleSource { provider })
}

/// Page source pulling order-book snapshot pages from a provider.
///
/// Each fetched page may carry a server-computed analysis block. It rides
/// along as the page attachment, so the paginator only keeps it when the
/// page itself is accepted and [`BookFeed::server_analysis`] never reflects
/// a superseded response.
pub struct BookSource {
    provider: Arc<dyn MarketData>,
}

#[async_trait]
impl PageSource for BookSource {
    type Query = BookQuery;
    type Item = OrderBookSnapshot;
    type Attachment = Option<BookAnalysis>;

    async fn fetch_page(
        &self,
        query: &BookQuery,
        cursor: Option<&PageToken>,
    ) -> Result<(Page<OrderBookSnapshot>, Option<BookAnalysis>), StakanError> {
        let book = self.provider.book_page(query, cursor).await?;
        Ok((book.page, book.analysis))
    }
}

/// Accumulating order-book feed plus the latest server analysis block.
pub struct BookFeed {
    inner: Paginator<BookSource>,
}

impl BookFeed {
    pub(crate) fn new(provider: Arc<dyn MarketData>) -> Self {
        Self {
            inner: Paginator::new(BookSource { provider }),
        }
    }

    /// Start a fresh accumulation for `query`. See [`Paginator::fetch_first`].
    ///
    /// # Errors
    /// Propagates the provider error; the previous accumulation is kept.
    pub async fn fetch_first(&self, query: BookQuery) -> Result<FetchOutcome, StakanError> {
        self.inner.fetch_first(query).await
    }

    /// Append the next page to the accumulation. See [`Paginator::fetch_more`].
    ///
    /// # Errors
    /// `NoActiveQuery`, `NoMorePages`, `AlreadyLoading`, or the provider
    /// error; a failed fetch leaves the accumulation and cursor untouched.
    pub async fn fetch_more(&self) -> Result<FetchOutcome, StakanError> {
        self.inner.fetch_more().await
    }

    /// Drop the accumulation, cursor, and held analysis.
    pub fn reset(&self) {
        self.inner.reset();
    }

    /// Snapshots accumulated so far, arrival-ordered and duplicate-free.
    #[must_use]
    pub fn items(&self) -> Vec<OrderBookSnapshot> {
        self.inner.items()
    }

    /// Number of accumulated snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the accumulation is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The query currently being accumulated, if any.
    #[must_use]
    pub fn active_query(&self) -> Option<BookQuery> {
        self.inner.active_query()
    }

    /// Whether a continuation cursor is held.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.inner.has_more()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        self.inner.phase()
    }

    /// Analysis block carried by the most recently accepted page, if any.
    #[must_use]
    pub fn server_analysis(&self) -> Option<BookAnalysis> {
        self.inner.attachment().flatten()
    }
}
