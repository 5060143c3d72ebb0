use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::StakanError;
use crate::series::{SeriesItem, extend_unique};
use crate::types::{Page, PageToken};

/// A cursor-paginated endpoint the paginator can pull pages from.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Query type identifying one logical result set. Equality (cursor
    /// excluded) means "same result set, different page".
    type Query: Clone + PartialEq + Send + Sync;
    /// Item type served by the endpoint.
    type Item: SeriesItem + Clone + Send + Sync;
    /// Page-level payload stored alongside the items when a page is
    /// accepted, under the same supersession check. Sources without one
    /// use `()`.
    type Attachment: Clone + Send;

    /// Fetch a single page. `cursor: None` requests the first page.
    async fn fetch_page(
        &self,
        query: &Self::Query,
        cursor: Option<&PageToken>,
    ) -> Result<(Page<Self::Item>, Self::Attachment), StakanError>;
}

/// Observable lifecycle of a paginator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPhase {
    /// Nothing fetched yet.
    Idle,
    /// A page request is in flight.
    Loading,
    /// At least one page loaded and a continuation cursor is held.
    Loaded,
    /// The result set is exhausted (no continuation cursor).
    Exhausted,
}

/// Result of a completed page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was applied to the accumulation.
    Appended {
        /// How many previously-unseen items were appended.
        new_items: usize,
        /// Whether a continuation cursor remains.
        more: bool,
    },
    /// The response arrived for a query that has since been replaced; it was
    /// discarded without touching the current accumulation.
    Superseded,
}

struct FeedState<Q, T, A> {
    query: Option<Q>,
    items: Vec<T>,
    cursor: Option<PageToken>,
    // Payload of the most recently accepted page, if any.
    attachment: Option<A>,
    loading: bool,
    // Bumped every time a request is issued; a completing request only
    // applies its result when its recorded generation is still current.
    generation: u64,
}

impl<Q, T, A> FeedState<Q, T, A> {
    const fn new() -> Self {
        Self {
            query: None,
            items: Vec::new(),
            cursor: None,
            attachment: None,
            loading: false,
            generation: 0,
        }
    }
}

/// Generic cursor-pagination engine with accumulation.
///
/// Turns a [`PageSource`] into two operations, [`fetch_first`] and
/// [`fetch_more`], accumulating arrival-ordered, duplicate-free items for one
/// active query. Guarantees honored:
///
/// - at most one page request in flight per paginator; an overlapping
///   `fetch_more` is rejected with the benign `AlreadyLoading`;
/// - a failed page fetch leaves the accumulation and cursor untouched, so the
///   caller can retry without losing progress;
/// - a response that completes after its query was replaced is discarded
///   ([`FetchOutcome::Superseded`]) instead of mutating the new query's state;
///   this covers the page's [`Attachment`] as well as its items.
///
/// [`Attachment`]: PageSource::Attachment
///
/// The internal mutex is only held for synchronous bookkeeping, never across
/// an await.
///
/// [`fetch_first`]: Paginator::fetch_first
/// [`fetch_more`]: Paginator::fetch_more
pub struct Paginator<S: PageSource> {
    source: S,
    state: Mutex<FeedState<S::Query, S::Item, S::Attachment>>,
}

impl<S: PageSource> Paginator<S> {
    /// Wrap a page source in a fresh, idle paginator.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            state: Mutex::new(FeedState::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedState<S::Query, S::Item, S::Attachment>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The wrapped page source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch the first page of `query`.
    ///
    /// On success the query becomes active, its first page replaces any
    /// accumulation belonging to a previous query, and the returned cursor is
    /// stored. On failure all prior state stays intact. A `fetch_first`
    /// issued while another request is in flight takes over: the stale
    /// response will be discarded when it lands.
    ///
    /// # Errors
    /// Propagates the page source's error untouched.
    pub async fn fetch_first(&self, query: S::Query) -> Result<FetchOutcome, StakanError> {
        let generation = {
            let mut st = self.lock();
            st.loading = true;
            st.generation += 1;
            st.generation
        };

        let res = self.source.fetch_page(&query, None).await;

        let mut st = self.lock();
        if st.generation != generation {
            return Ok(FetchOutcome::Superseded);
        }
        st.loading = false;
        match res {
            Ok((page, attachment)) => {
                let fresh = crate::series::merge_unique(Vec::new(), page.items);
                let new_items = fresh.len();
                st.query = Some(query);
                st.items = fresh;
                st.cursor = page.next;
                st.attachment = Some(attachment);
                Ok(FetchOutcome::Appended {
                    new_items,
                    more: st.cursor.is_some(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Fetch the next page of the active query and append its unseen items.
    ///
    /// # Errors
    /// - `NoActiveQuery` when nothing has been fetched yet.
    /// - `NoMorePages` (benign) when the result set is exhausted; the
    ///   accumulation is left unchanged.
    /// - `AlreadyLoading` (benign) when a page request is already in flight;
    ///   the overlapping call appends nothing.
    /// - Any page source error, with accumulation and cursor untouched so the
    ///   call can be retried.
    pub async fn fetch_more(&self) -> Result<FetchOutcome, StakanError> {
        let (query, cursor, generation) = {
            let mut st = self.lock();
            let Some(query) = st.query.clone() else {
                return Err(StakanError::NoActiveQuery);
            };
            if st.loading {
                return Err(StakanError::AlreadyLoading);
            }
            let Some(cursor) = st.cursor.clone() else {
                return Err(StakanError::NoMorePages);
            };
            st.loading = true;
            st.generation += 1;
            (query, cursor, st.generation)
        };

        let res = self.source.fetch_page(&query, Some(&cursor)).await;

        let mut st = self.lock();
        if st.generation != generation {
            return Ok(FetchOutcome::Superseded);
        }
        st.loading = false;
        match res {
            Ok((page, attachment)) => {
                let new_items = extend_unique(&mut st.items, page.items);
                st.cursor = page.next;
                st.attachment = Some(attachment);
                Ok(FetchOutcome::Appended {
                    new_items,
                    more: st.cursor.is_some(),
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Discard the active query and all accumulated state, returning to
    /// `Idle`. Any in-flight response will be discarded when it lands.
    pub fn reset(&self) {
        let mut st = self.lock();
        st.generation += 1;
        st.query = None;
        st.items.clear();
        st.cursor = None;
        st.attachment = None;
        st.loading = false;
    }

    /// Payload of the most recently accepted page, if any. A superseded
    /// response never contributes here.
    #[must_use]
    pub fn attachment(&self) -> Option<S::Attachment> {
        self.lock().attachment.clone()
    }

    /// Snapshot of the accumulated items in arrival order.
    #[must_use]
    pub fn items(&self) -> Vec<S::Item> {
        self.lock().items.clone()
    }

    /// Number of accumulated items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// `true` when nothing has been accumulated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    /// The currently active query, if any.
    #[must_use]
    pub fn active_query(&self) -> Option<S::Query> {
        self.lock().query.clone()
    }

    /// `true` when a continuation cursor is held.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.lock().cursor.is_some()
    }

    /// Current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> FeedPhase {
        let st = self.lock();
        if st.loading {
            FeedPhase::Loading
        } else if st.query.is_none() {
            FeedPhase::Idle
        } else if st.cursor.is_some() {
            FeedPhase::Loaded
        } else {
            FeedPhase::Exhausted
        }
    }
}
