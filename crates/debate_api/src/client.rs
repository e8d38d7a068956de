use std::future::Future;

use futures_util::StreamExt;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use reqwest::{Client, RequestBuilder, Response};
use tokio_util::sync::CancellationToken;

use crate::config::DebateApiConfig;
use crate::error::{parse_error_message, DebateApiError};
use crate::payload::DebateRequest;
use crate::transport::{ChunkStream, DebateTransport, OpenFuture};
use crate::url::normalize_debate_url;

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

#[derive(Debug, Clone)]
pub struct DebateApiClient {
    http: Client,
    config: DebateApiConfig,
}

impl DebateApiClient {
    pub fn new(config: DebateApiConfig) -> Result<Self, DebateApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(user_agent) = config.user_agent.as_deref() {
            builder = builder.user_agent(user_agent.to_owned());
        }
        let http = builder.build().map_err(DebateApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &DebateApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_debate_url(&self.config.base_url)
    }

    pub fn build_headers(&self) -> Result<HeaderMap, DebateApiError> {
        let mut out = HeaderMap::new();
        out.insert(ACCEPT, HeaderValue::from_static(NDJSON_CONTENT_TYPE));
        for (key, value) in &self.config.extra_headers {
            out.insert(
                HeaderName::from_bytes(key.as_bytes())
                    .map_err(|_| DebateApiError::InvalidHeader(format!("invalid header key: {key}")))?,
                HeaderValue::from_str(value).map_err(|_| {
                    DebateApiError::InvalidHeader(format!("invalid header value for {key}"))
                })?,
            );
        }
        Ok(out)
    }

    pub fn build_request(&self, request: &DebateRequest) -> Result<RequestBuilder, DebateApiError> {
        let endpoint = self.normalized_endpoint();
        let url = reqwest::Url::parse(&endpoint)
            .map_err(|error| DebateApiError::InvalidBaseUrl(format!("{endpoint}: {error}")))?;
        let headers = self.build_headers()?;
        Ok(self.http.post(url).headers(headers).json(request))
    }
}

impl DebateTransport for DebateApiClient {
    fn open(&self, request: DebateRequest, cancel: CancellationToken) -> OpenFuture {
        let builder = self.build_request(&request);
        let endpoint = self.normalized_endpoint();
        Box::pin(async move {
            tracing::debug!(
                %endpoint,
                prior_turns = request.prior_turns(),
                "opening debate stream"
            );
            let response = send_request(builder?, &cancel).await?;
            let chunks: ChunkStream = response
                .bytes_stream()
                .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(DebateApiError::from))
                .boxed();
            Ok::<ChunkStream, DebateApiError>(chunks)
        })
    }
}

/// Sends one request. Resolves to the response only when its status is a
/// success; otherwise the body text becomes the error message.
async fn send_request(
    builder: RequestBuilder,
    cancel: &CancellationToken,
) -> Result<Response, DebateApiError> {
    let response = await_or_cancel(builder.send(), cancel)
        .await?
        .map_err(DebateApiError::from)?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = await_or_cancel(response.text(), cancel)
        .await?
        .unwrap_or_default();
    let message = parse_error_message(&body);
    tracing::warn!(status = status.as_u16(), %message, "debate stream request rejected");
    Err(DebateApiError::Status(status, message))
}

/// Races `future` against `cancel`; cancellation wins ties.
pub async fn await_or_cancel<F>(
    future: F,
    cancel: &CancellationToken,
) -> Result<F::Output, DebateApiError>
where
    F: Future,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(DebateApiError::Cancelled),
        output = future => Ok(output),
    }
}
