use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use stakan_core::StakanError;
use tracing::{debug, warn};
use url::Url;

use crate::session::Session;
use crate::wire::{RefreshRequest, RefreshResponse};

/// Uniform request dispatch with exactly-once transparent credential refresh.
///
/// Every outgoing request attaches the session's current bearer token. An
/// authorization failure triggers at most one `POST /refresh` and at most one
/// replay of the original request; the replay never refreshes again (the
/// at-most-once invariant is enforced structurally by the straight-line shape
/// of [`request_json`], which has no retry loop).
///
/// [`request_json`]: Transport::request_json
pub(crate) struct Transport {
    http: Client,
    base_url: Url,
    session: Arc<Session>,
}

impl Transport {
    pub(crate) fn new(
        base_url: Url,
        timeout: Duration,
        session: Arc<Session>,
    ) -> Result<Self, StakanError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StakanError::network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub(crate) fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, StakanError> {
        self.request_json(Method::GET, path, query, None).await
    }

    pub(crate) async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, StakanError> {
        self.request_json(Method::POST, path, &[], Some(body)).await
    }

    /// Dispatch a request, refreshing the credential once on a 401 and
    /// replaying the original request with the new bearer.
    ///
    /// # Errors
    /// - `Network` when no response was received (including for the refresh
    ///   and replay legs).
    /// - `Auth` when authorization was rejected and could not be recovered:
    ///   no renewal token, refresh rejected (session is cleared), or the
    ///   replay was rejected again.
    /// - `Server` / `Decode` passed through from the final response.
    async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, StakanError> {
        let url = self.endpoint(path)?;

        let first = self
            .dispatch(method.clone(), url.clone(), query, body.as_ref())
            .await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return decode(first).await;
        }

        let Some(renewal) = self.session.renewal_token() else {
            return Err(StakanError::auth(
                "authorization rejected and no renewal token is available",
            ));
        };

        debug!(path, "authorization rejected, refreshing credential");
        if let Err(e) = self.refresh(&renewal).await {
            if matches!(e, StakanError::Network(_)) {
                return Err(e);
            }
            warn!(error = %e, "credential refresh failed, clearing session");
            self.session.clear();
            return Err(StakanError::auth(format!("credential refresh failed: {e}")));
        }

        let replay = self.dispatch(method, url, query, body.as_ref()).await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            // One refresh per original request; a rejected replay is terminal.
            return Err(StakanError::auth(
                "authorization rejected after a successful refresh",
            ));
        }
        decode(replay).await
    }

    /// Exchange the renewal token for a new bearer and install it.
    ///
    /// # Errors
    /// `Network`, `Server`, or `Decode` from the refresh endpoint; the caller
    /// decides whether the failure invalidates the session.
    pub(crate) async fn refresh(&self, renewal: &str) -> Result<(), StakanError> {
        let url = self.endpoint("refresh")?;
        let body = serde_json::to_value(RefreshRequest {
            refresh_token: renewal,
        })
        .map_err(|e| StakanError::decode(format!("failed to encode refresh request: {e}")))?;
        let response = self.dispatch(Method::POST, url, &[], Some(&body)).await?;
        let wire: RefreshResponse = decode(response).await?;
        self.session.set_bearer(wire.access_token);
        debug!("bearer credential refreshed");
        Ok(())
    }

    async fn dispatch(
        &self,
        method: Method,
        url: Url,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<Response, StakanError> {
        let mut request = self.http.request(method, url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(json) = body {
            request = request.json(json);
        }
        if let Some(token) = self.session.bearer() {
            request = request.bearer_auth(token);
        }
        request
            .send()
            .await
            .map_err(|e| StakanError::network(e.to_string()))
    }

    fn endpoint(&self, path: &str) -> Result<Url, StakanError> {
        // The base URL is normalized to end with '/' at build time, so a
        // relative join appends instead of replacing the last segment.
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| StakanError::validation(format!("invalid endpoint path {path:?}: {e}")))
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StakanError> {
    let status = response.status();
    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| StakanError::decode(e.to_string()))
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(StakanError::server(status.as_u16(), body))
    }
}
