//! reqwest-backed retriever.

use std::error::Error as StdError;

use async_trait::async_trait;
use futures_util::StreamExt;
use tracing::trace;
use url::Url;

use fanfetch_core::{RetrievalError, RetrieverPort, Target};

use crate::config::HttpRetrieverConfig;
use crate::error::HttpError;

/// Retrieves targets as HTTP(S) URLs.
///
/// The client is shared by every task of a run. Responses are never shared:
/// each retrieval owns its response and drops it before returning.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: reqwest::Client,
    error_for_status: bool,
}

impl HttpRetriever {
    /// Build a retriever from `config`.
    pub fn new(config: &HttpRetrieverConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            error_for_status: config.error_for_status,
        })
    }
}

#[async_trait]
impl RetrieverPort for HttpRetriever {
    async fn retrieve(&self, target: &Target) -> Result<u64, RetrievalError> {
        let url = parse_target(target)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(&e))?;

        let status = response.status();
        trace!(target_id = %target, %status, "response headers received");
        if self.error_for_status && !status.is_success() {
            return Err(RetrievalError::transport_with_status(
                format!("{target}: HTTP {status}"),
                status.as_u16(),
            ));
        }

        drain(response, target).await
    }
}

/// Accept only absolute http(s) URLs.
fn parse_target(target: &Target) -> Result<Url, RetrievalError> {
    let url = Url::parse(target.as_str())
        .map_err(|e| RetrievalError::invalid_target(format!("{target}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(RetrievalError::invalid_target(format!(
            "{target}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Stream the body to nowhere, counting bytes. Consumes the response.
async fn drain(response: reqwest::Response, target: &Target) -> Result<u64, RetrievalError> {
    let mut body = response.bytes_stream();
    let mut bytes: u64 = 0;
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| {
            trace!(target_id = %target, bytes, "body read failed");
            RetrievalError::body(error_chain(&e))
        })?;
        bytes += chunk.len() as u64;
    }
    Ok(bytes)
}

fn transport_error(err: &reqwest::Error) -> RetrievalError {
    let message = error_chain(err);
    match err.status() {
        Some(status) => RetrievalError::transport_with_status(message, status.as_u16()),
        None => RetrievalError::transport(message),
    }
}

/// reqwest's own message is terse ("error sending request for url (...)");
/// the useful part (refused, DNS, TLS) is in the source chain.
fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
