//! HTTP transport seam.
//!
//! The API client only needs "GET this URL, give me status and body", so that
//! is all [`HttpTransport`] exposes. Tests substitute their own implementation.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::BoxError;

/// Default request timeout for [`ReqwestTransport`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed")]
    Network(#[source] BoxError),

    #[error("HTTP request was cancelled")]
    Interrupted,
}

#[async_trait]
pub trait HttpTransport: Send + Sync + Debug {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError>;
}

/// `reqwest`-backed transport. Build it once and reuse it for the process.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
    cancel: CancellationToken,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(Box::new(e)))?;

        Ok(Self {
            http,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort in-flight requests with [`TransportError::Interrupted`] once
    /// `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    async fn send(&self, url: &Url) -> Result<HttpResponse, reqwest::Error> {
        let res = self.http.get(url.clone()).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<HttpResponse, TransportError> {
        // The request URL carries the API key; drop it from the error.
        let strip_url = |e: reqwest::Error| TransportError::Network(Box::new(e.without_url()));

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(TransportError::Interrupted),
            res = self.send(url) => res.map_err(strip_url),
        }
    }
}
