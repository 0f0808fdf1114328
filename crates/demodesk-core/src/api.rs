//! Lead backend client.
//!
//! [`LeadApi`] is the seam between the UI state machines and the network.
//! [`HttpLeadApi`] is the `reqwest` implementation; tests plug in fakes.

use std::time::Instant;

use reqwest::{Method, RequestBuilder, Response};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::types::{AdminCredential, ApiErrorBody, HealthBody, HealthStatus, Lead, LeadId, NewLead};

/// Header carrying the shared admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "X-Admin-Password";

/// Operations the backend exposes for leads.
///
/// Privileged calls take the credential explicitly; implementations must
/// not cache it.
#[async_trait::async_trait]
pub trait LeadApi: Send + Sync {
    /// `POST /api/demo-request`.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] on a non-2xx answer, transport errors otherwise.
    async fn create_lead(&self, lead: &NewLead) -> Result<(), ApiError>;

    /// `GET /api/demo-requests`, in backend order.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] on a non-2xx answer (401 for a wrong password).
    async fn list_leads(&self, credential: &AdminCredential) -> Result<Vec<Lead>, ApiError>;

    /// `DELETE /api/demo-requests/{id}`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// [`ApiError::Rejected`] on a non-2xx answer.
    async fn delete_lead(&self, credential: &AdminCredential, id: &LeadId) -> Result<(), ApiError>;
}

/// `reqwest`-backed [`LeadApi`].
#[derive(Debug, Clone)]
pub struct HttpLeadApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpLeadApi {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the base URL is empty or the HTTP
    /// client cannot be constructed.
    pub fn new(cfg: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = cfg.base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ApiError::Config(
                "missing base URL — set DEMODESK_API_URL or pass --api-url".to_owned(),
            ));
        }
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "base URL must start with http:// or https://, got {base_url}"
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(concat!("demodesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { base_url, client })
    }

    /// Build a client from `DEMODESK_*` environment variables.
    ///
    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(&ClientConfig::from_env())
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /health`. Never fails; an unreachable backend reports `ok: false`.
    pub async fn health(&self) -> HealthStatus {
        let start = Instant::now();
        let result = send(self.request(Method::GET, "/health")).await;
        let latency_ms = start.elapsed().as_millis();

        match result {
            Ok(resp) => {
                let status = resp
                    .json::<HealthBody>()
                    .await
                    .ok()
                    .and_then(|b| b.status);
                HealthStatus {
                    ok: true,
                    status,
                    latency_ms,
                }
            }
            Err(e) => {
                debug!(error = %e, "health check failed");
                HealthStatus {
                    ok: false,
                    status: None,
                    latency_ms,
                }
            }
        }
    }

    // --- Private ---

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        debug!(%method, path, "lead api request");
        self.client
            .request(method, format!("{}{path}", self.base_url))
    }
}

/// Send and split 2xx from everything else. Non-2xx bodies are mined for
/// an `{"error": "..."}` message.
async fn send(req: RequestBuilder) -> Result<Response, ApiError> {
    let resp = req.send().await.map_err(|e| {
        warn!(error = %e, "lead api transport failure");
        ApiError::Transport(e)
    })?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.is_empty());

    warn!(status = status.as_u16(), "lead api rejected request");
    Err(ApiError::Rejected {
        status: status.as_u16(),
        message,
    })
}

#[async_trait::async_trait]
impl LeadApi for HttpLeadApi {
    async fn create_lead(&self, lead: &NewLead) -> Result<(), ApiError> {
        let req = self.request(Method::POST, "/api/demo-request").json(lead);
        send(req).await?;
        Ok(())
    }

    async fn list_leads(&self, credential: &AdminCredential) -> Result<Vec<Lead>, ApiError> {
        let req = self
            .request(Method::GET, "/api/demo-requests")
            .header(ADMIN_PASSWORD_HEADER, credential.expose());
        let resp = send(req).await?;
        let body = resp.bytes().await?;
        let leads: Vec<Lead> = serde_json::from_slice(&body)?;
        debug!(count = leads.len(), "listed leads");
        Ok(leads)
    }

    async fn delete_lead(&self, credential: &AdminCredential, id: &LeadId) -> Result<(), ApiError> {
        let path = format!("/api/demo-requests/{}", urlencoding::encode(id.as_str()));
        let req = self
            .request(Method::DELETE, &path)
            .header(ADMIN_PASSWORD_HEADER, credential.expose());
        send(req).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_base_url() {
        let cfg = ClientConfig {
            base_url: "/".to_owned(),
            ..ClientConfig::default()
        };
        assert!(matches!(HttpLeadApi::new(&cfg), Err(ApiError::Config(_))));
    }

    #[test]
    fn rejects_non_http_scheme() {
        let cfg = ClientConfig::default().with_base_url("ftp://leads");
        assert!(matches!(HttpLeadApi::new(&cfg), Err(ApiError::Config(_))));
    }

    #[test]
    fn trims_trailing_slash() {
        let cfg = ClientConfig {
            base_url: "http://127.0.0.1:5000//".to_owned(),
            ..ClientConfig::default()
        };
        let api = HttpLeadApi::new(&cfg).unwrap();
        assert_eq!(api.base_url(), "http://127.0.0.1:5000");
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let cfg = ClientConfig::default().with_base_url("http://127.0.0.1:1");
        let api = HttpLeadApi::new(&cfg).unwrap();
        let err = api.create_lead(&NewLead::default()).await.unwrap_err();
        assert!(err.is_transport());
        assert!(!api.health().await.ok);
    }
}
