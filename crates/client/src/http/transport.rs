use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use super::{JsonApiRequest, JsonApiResponse};
use crate::{ClientConfig, ClientResult};

/// Sends serialized requests. Network failures are errors; any response the
/// server produced, successful or not, is an `Ok` value.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: JsonApiRequest) -> ClientResult<JsonApiResponse>;
}

/// reqwest backed transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    http: Client,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Self::with_timeout(config.timeout)
    }

    pub fn with_timeout(timeout: Duration) -> ClientResult<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(
        name = "jsonapi.transport.send",
        skip(self, request),
        fields(method = %request.method(), path = %request.base_url().path()),
        err
    )]
    async fn send(&self, request: JsonApiRequest) -> ClientResult<JsonApiResponse> {
        let url = request.url();
        debug!(url = %url, "sending JSON:API request");

        let mut builder = self.http.request(request.method().clone(), url);
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(credentials) = request.basic_auth() {
            builder = builder.basic_auth(&credentials.user, Some(&credentials.password));
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;

        if !(200..300).contains(&status) {
            warn!(status, "JSON:API request returned a non-success status");
        }

        Ok(JsonApiResponse::from_body(status, &body))
    }
}
