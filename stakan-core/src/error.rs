use thiserror::Error;

/// Unified error type for the stakan workspace.
///
/// Variants split into three families: transport failures (`Network`, `Auth`,
/// `Server`, `Decode`), pre-request input rejection (`Validation`), and the
/// paginator's benign flow-control signals (`NoActiveQuery`, `NoMorePages`,
/// `AlreadyLoading`). The benign variants are suppressible by callers and
/// must never be rendered as user-facing failures.
#[derive(Debug, Error)]
pub enum StakanError {
    /// No response reached the client (connect/timeout/DNS failure).
    #[error("network error: {0}")]
    Network(String),

    /// Authorization was rejected and could not be recovered by a refresh.
    /// The session has been cleared; the caller should re-authenticate.
    #[error("unauthenticated: {0}")]
    Auth(String),

    /// A response was received with a non-success, non-auth status.
    #[error("server error ({status}): {body}")]
    Server {
        /// HTTP status code of the response.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },

    /// A request body could not be encoded or a response body could not be
    /// decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Client-side input was rejected before any request was sent.
    #[error("invalid input: {0}")]
    Validation(String),

    /// `fetch_more` was called on a paginator that never fetched a first page.
    #[error("no active query")]
    NoActiveQuery,

    /// The active query has no further pages. Benign: a no-op, not a failure.
    #[error("no more pages")]
    NoMorePages,

    /// A page request for this paginator is already in flight. Benign: the
    /// duplicate action should be suppressed, not surfaced.
    #[error("a page request is already in flight")]
    AlreadyLoading,
}

impl StakanError {
    /// Helper: build a `Network` error from any displayable cause.
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Helper: build an `Auth` error.
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Helper: build a `Decode` error.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Helper: build a `Validation` error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Helper: build a `Server` error from a status code and body.
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// `true` for flow-control variants that callers should swallow rather
    /// than report (`NoMorePages`, `AlreadyLoading`).
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::NoMorePages | Self::AlreadyLoading)
    }

    /// `true` when the error means the session is gone and the user must
    /// sign in again.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
