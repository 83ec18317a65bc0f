use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Serialize;

use recognizer_core::{Error, RequestContext, Result};

/// Status and body of a completed exchange. Failure statuses are not yet
/// interpreted at this layer.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool { self.status.is_success() }
}

/// JSON-over-HTTP connection to the backend. Cheap to clone; the underlying
/// client pools connections and is safe to share across tasks.
#[derive(Debug, Clone)]
pub struct Transport {
    client: Client,
    base: Url,
}

impl Transport {
    pub fn new(base: Url, timeout: Duration) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(Error::InvalidConfig(format!("backend url '{}' cannot carry a path", base)));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InvalidConfig(format!("http client: {}", e)))?;
        Ok(Self { client, base })
    }

    /// Append percent-encoded path segments to the base URL.
    pub fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidConfig(format!("backend url '{}' cannot carry a path", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn send(&self, ctx: &RequestContext, method: Method, url: Url) -> Result<RawResponse> {
        self.execute(ctx, self.client.request(method, url)).await
    }

    pub async fn send_json<B>(&self, ctx: &RequestContext, method: Method, url: Url, body: &B) -> Result<RawResponse>
    where
        B: Serialize + ?Sized,
    {
        self.execute(ctx, self.client.request(method, url).json(body)).await
    }

    async fn execute(&self, ctx: &RequestContext, request: RequestBuilder) -> Result<RawResponse> {
        let request = request.build().map_err(|e| Error::InvalidInput(e.to_string()))?;
        tracing::debug!(method = %request.method(), url = %request.url(), "backend request");
        let exchange = async {
            let response = self.client.execute(request).await.map_err(connection_error)?;
            let status = response.status();
            let body = response.bytes().await.map_err(connection_error)?.to_vec();
            tracing::debug!(status = status.as_u16(), bytes = body.len(), "backend response");
            Ok(RawResponse { status, body })
        };
        ctx.run(exchange).await
    }
}

fn connection_error(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::DeadlineExceeded
    } else {
        Error::Connection(e.to_string())
    }
}
