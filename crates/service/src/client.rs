//! HTTP plumbing shared by every endpoint module.
//!
//! One request in, one typed result out: no retries, no timeouts. A non-2xx
//! response becomes [`ApiError::Status`] carrying the backend's `detail`
//! message when it sent one; a body that does not match the expected shape
//! becomes [`ApiError::Decode`].

use std::sync::Arc;
use std::time::Instant;

use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::errors::ApiError;
use crate::metrics;
use crate::session::Session;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").field("base_url", &self.base_url).finish()
    }
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!("base url must be http(s): {base_url:?}")));
        }
        let http = reqwest::Client::builder()
            .user_agent(concat!("atelier-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        Ok(Self { http, base_url: base_url.into() })
    }

    pub fn from_config(cfg: &configs::ApiConfig) -> Result<Self, ApiError> {
        Self::new(cfg.base_url.clone())
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    pub(crate) fn public(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) fn authed(&self, method: Method, path: &str, session: &Session) -> RequestBuilder {
        self.public(method, path).bearer_auth(session.token())
    }

    /// Send and decode a JSON body.
    pub(crate) async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        let resp = self.send(req).await?;
        let bytes = resp.bytes().await.map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(error = %e, "response did not match expected shape");
            ApiError::Decode(e.to_string())
        })
    }

    /// Send and discard the body (deletes answer `true` or nothing at all).
    pub(crate) async fn execute_unit(&self, req: RequestBuilder) -> Result<(), ApiError> {
        let resp = self.send(req).await?;
        if let Err(e) = resp.bytes().await {
            debug!(error = %e, "unit response body not drained");
        }
        Ok(())
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let req = req.build().map_err(|e| ApiError::Config(e.to_string()))?;
        let method = req.method().to_string();
        let path = req.url().path().to_string();
        let started = Instant::now();

        let resp = match self.http.execute(req).await {
            Ok(resp) => resp,
            Err(e) => {
                metrics::observe(&method, "network", started.elapsed().as_secs_f64());
                warn!(%method, %path, error = %e, "request failed");
                return Err(ApiError::Network(e.to_string()));
            }
        };

        let status = resp.status();
        if status.is_success() {
            metrics::observe(&method, "ok", started.elapsed().as_secs_f64());
            debug!(%method, %path, status = status.as_u16(), "request ok");
            return Ok(resp);
        }

        metrics::observe(&method, "status", started.elapsed().as_secs_f64());
        let body = resp.bytes().await.unwrap_or_default();
        let detail = extract_detail(&body);
        warn!(%method, %path, status = status.as_u16(), detail = detail.as_deref().unwrap_or(""), "request rejected");
        Err(ApiError::status(status.as_u16(), detail))
    }
}

/// Pull the `detail` field out of an error body.
///
/// FastAPI-style backends send either `{"detail": "text"}` or, for schema
/// violations, `{"detail": [{"msg": "...", ...}]}`.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|i| i.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() { None } else { Some(msgs.join("; ")) }
        }
        _ => None,
    }
}

/// Log and swallow a failed list fetch.
pub(crate) fn or_empty<T>(result: Result<Vec<T>, ApiError>, what: &str) -> Vec<T> {
    match result {
        Ok(items) => items,
        Err(e) => {
            warn!(error = %e, code = e.code(), "{what} unavailable; showing empty list");
            Vec::new()
        }
    }
}

/// Map a 404 to `None` for single-item lookups.
pub(crate) fn or_missing<T>(result: Result<T, ApiError>) -> Result<Option<T>, ApiError> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let c = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(c.url("/api/albums"), "http://localhost:8000/api/albums");
        assert_eq!(c.url("api/albums"), "http://localhost:8000/api/albums");
    }

    #[test]
    fn rejects_non_http_base() {
        assert!(matches!(ApiClient::new("localhost:8000"), Err(ApiError::Config(_))));
    }

    #[test]
    fn detail_string_and_list_forms() {
        assert_eq!(extract_detail(br#"{"detail":"Incorrect username or password"}"#).as_deref(), Some("Incorrect username or password"));
        assert_eq!(
            extract_detail(br#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"too short"}]}"#).as_deref(),
            Some("field required; too short")
        );
        assert_eq!(extract_detail(b"<html>bad gateway</html>"), None);
        assert_eq!(extract_detail(br#"{"error":"x"}"#), None);
    }

    #[test]
    fn or_empty_swallows_errors() {
        let v: Vec<u8> = or_empty(Err(ApiError::status(500, None)), "albums");
        assert!(v.is_empty());
        assert_eq!(or_empty(Ok(vec![1u8, 2]), "albums"), vec![1, 2]);
    }

    #[test]
    fn or_missing_only_maps_404() {
        assert_eq!(or_missing::<u8>(Err(ApiError::status(404, None))).unwrap(), None);
        assert!(or_missing::<u8>(Err(ApiError::status(500, None))).is_err());
    }
}
