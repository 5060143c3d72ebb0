use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Storage key under which implementations should persist the renewal token.
///
/// Matches the key the dashboard's browser build used in `localStorage`, so a
/// storage backend shared with it stays compatible.
pub const RENEWAL_TOKEN_KEY: &str = "refresh_token";

/// A bearer token plus the longer-lived renewal token it came with.
///
/// Both are opaque pass-through values; no validation of their contents is
/// performed anywhere in this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Short-lived token presented on each authenticated request.
    pub access_token: String,
    /// Longer-lived token exchanged for a new bearer credential.
    pub refresh_token: String,
}

/// Durable persistence seam for the renewal token.
///
/// The bearer token is deliberately kept in process memory only; the renewal
/// token is the single credential that survives a restart, and a fresh
/// process re-derives its bearer via refresh before making authenticated
/// calls. Host applications supply a durable implementation (keyed by
/// [`RENEWAL_TOKEN_KEY`]); [`MemoryTokenStore`] covers tests and throwaway
/// sessions.
pub trait TokenStore: Send + Sync {
    /// Load the persisted renewal token, if any.
    fn load(&self) -> Option<String>;
    /// Persist (replace) the renewal token.
    fn store(&self, token: &str);
    /// Remove the persisted renewal token.
    fn clear(&self);
}

/// Non-durable `TokenStore` holding the renewal token in memory.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        lock(&self.token).clone()
    }

    fn store(&self, token: &str) {
        *lock(&self.token) = Some(token.to_string());
    }

    fn clear(&self) {
        *lock(&self.token) = None;
    }
}

/// The session store: owner of the current credential.
///
/// At most one bearer token is active at a time. The session is an explicit,
/// injectable object with a defined lifecycle (created at client build time,
/// mutated only by the transport's refresh step and by explicit login/logout)
/// rather than ambient global state.
pub struct Session {
    bearer: Mutex<Option<String>>,
    store: Arc<dyn TokenStore>,
}

impl Session {
    /// Create a session backed by the given renewal-token store.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            bearer: Mutex::new(None),
            store,
        }
    }

    /// Install a full credential: bearer to memory, renewal to the store.
    pub fn set_credential(&self, credential: Credential) {
        self.store.store(&credential.refresh_token);
        *lock(&self.bearer) = Some(credential.access_token);
    }

    /// Replace only the bearer token (the refresh path).
    pub fn set_bearer(&self, token: String) {
        *lock(&self.bearer) = Some(token);
    }

    /// The currently active bearer token, if any.
    #[must_use]
    pub fn bearer(&self) -> Option<String> {
        lock(&self.bearer).clone()
    }

    /// The persisted renewal token, if any.
    #[must_use]
    pub fn renewal_token(&self) -> Option<String> {
        self.store.load()
    }

    /// Drop both tokens: logout, or an irrecoverable refresh failure.
    pub fn clear(&self) {
        *lock(&self.bearer) = None;
        self.store.clear();
    }
}

fn lock<'a, T>(mutex: &'a Mutex<T>) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
