use crate::auth::{self, AuthCredential, CredentialProvider};
use crate::error_code::StandardErrorCode;
use crate::policy::Decision;
use crate::route::Request;
use crate::transport::config::TransportConfig;
use crate::transport::prepare::{self, PreparedRequest};
use crate::transport::{DispatchResponse, TransportError};
use crate::{Error, Result};
use reqwest::header::HeaderMap;
use reqwest::Proxy;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// Executes request descriptors against one API base URL.
///
/// Cheap to share behind an `Arc`; the inner reqwest client pools connections.
pub struct HttpTransport {
    client: reqwest::Client,
    config: TransportConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl HttpTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Some(Duration::from_secs(config.pool_idle_timeout_secs)));

        if let Some(proxy_url) = &config.proxy_url {
            let proxy = Proxy::all(proxy_url).map_err(|e| {
                Error::configuration_with_context(
                    format!("invalid proxy_url {:?}", proxy_url),
                    crate::ErrorContext::new()
                        .with_field_path("config.proxy_url")
                        .with_details(e.to_string()),
                )
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            config,
            credentials: auth::no_credentials(),
        })
    }

    /// Build from `MAIL_API_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(TransportConfig::from_env())
    }

    /// Provider consulted for authenticated descriptors that carry no credential.
    pub fn with_credentials(mut self, provider: Arc<dyn CredentialProvider>) -> Self {
        self.credentials = provider;
        self
    }

    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Credential to attach, or `None` for unauthenticated requests.
    pub async fn resolve_credential<R: Request + ?Sized>(
        &self,
        request: &R,
    ) -> Result<Option<AuthCredential>> {
        if !request.is_authenticated() {
            return Ok(None);
        }
        if let Some(credential) = request.auth_credential() {
            return Ok(Some(credential));
        }
        match self.credentials.credential().await? {
            Some(credential) => Ok(Some(credential)),
            None => Err(Error::MissingCredential {
                path: request.path(),
            }),
        }
    }

    /// Validate, resolve credentials, and build the request plan without sending it.
    pub async fn prepare<R: Request + ?Sized>(&self, request: &R) -> Result<PreparedRequest> {
        prepare::validate_path(&request.path())?;
        let credential = self.resolve_credential(request).await?;
        let request_id = Uuid::new_v4().to_string();
        prepare::prepare(&self.config, request, credential.as_ref(), &request_id)
    }

    /// Execute one descriptor, resending transient failures when both the
    /// descriptor and the configured retry policy allow it.
    pub async fn dispatch<R: Request + ?Sized>(&self, request: &R) -> Result<DispatchResponse> {
        let prepared = self.prepare(request).await?;
        debug!(
            method = prepared.method.as_str(),
            path = prepared.path.as_str(),
            has_body = prepared.body.is_some(),
            query_len = prepared.query.len(),
            auto_retry = prepared.auto_retry,
            "dispatching request"
        );

        let mut attempt: u32 = 0;
        loop {
            let start = Instant::now();
            match self.send_once(&prepared).await {
                Ok(mut resp) => {
                    resp.retry_count = attempt;
                    debug!(
                        method = prepared.method.as_str(),
                        path = prepared.path.as_str(),
                        http_status = resp.status,
                        attempt,
                        duration_ms = start.elapsed().as_millis(),
                        "request succeeded"
                    );
                    return Ok(resp);
                }
                Err(err) => {
                    info!(
                        method = prepared.method.as_str(),
                        path = prepared.path.as_str(),
                        http_status = err.status(),
                        attempt,
                        duration_ms = start.elapsed().as_millis(),
                        error = %err,
                        "request attempt failed"
                    );
                    match self.config.retry.decide(&err, attempt, prepared.auto_retry) {
                        Decision::Retry { delay } => {
                            tokio::time::sleep(delay).await;
                            attempt += 1;
                        }
                        Decision::Fail => return Err(err),
                    }
                }
            }
        }
    }

    async fn send_once(&self, prepared: &PreparedRequest) -> Result<DispatchResponse> {
        let mut req = self
            .client
            .request(prepared.method.into_reqwest(), &prepared.url)
            .headers(prepared.headers.clone());
        if !prepared.query.is_empty() {
            req = req.query(&prepared.query);
        }
        if let Some(body) = &prepared.body {
            req = req.json(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Transport(TransportError::Http(e)))?;

        if !(200..300).contains(&status) {
            let code = StandardErrorCode::from_http_status(status);
            return Err(Error::Remote {
                status,
                code,
                message: String::from_utf8_lossy(&body).into_owned(),
                retryable: code.retryable(),
                retry_after_ms: retry_after_ms(&headers),
            });
        }

        Ok(DispatchResponse {
            status,
            headers,
            body,
            retry_count: 0,
        })
    }
}

/// Only the `Retry-After: <seconds>` form is understood.
fn retry_after_ms(headers: &HeaderMap) -> Option<u32> {
    let raw = headers.get("retry-after")?.to_str().ok()?.trim();
    let secs: u32 = raw.parse().ok()?;
    Some(secs.saturating_mul(1000))
}
