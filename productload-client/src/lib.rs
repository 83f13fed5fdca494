//! An HTTP [`ResourceClient`] for the product service.
//!
//! Products are exchanged as JSON over the `/product` endpoints. The client maps a `404` on
//! `GET /product/{id}` to [`ClientError::NotFound`]. Every other failure, including non-success
//! statuses, becomes a [`ClientError::Transport`].
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use std::sync::Arc;
use std::time::Duration;

use productload_engine::{ClientError, ClientResult, Resource, ResourceClient};
use reqwest::StatusCode;

/// A builder for creating an [`HttpResourceClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    host: String,
    port: u16,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a builder targeting `http://{host}:{port}`.
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: None,
        }
    }

    /// Sets a timeout applied to every request, from connecting until the body is read.
    ///
    /// By default, requests never time out.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Creates the client.
    pub fn build(self) -> ClientResult<HttpResourceClient> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ClientError::transport("building HTTP client", err))?;

        Ok(HttpResourceClient {
            http,
            base_url: format!("http://{}:{}", self.host, self.port).into(),
        })
    }
}

/// A [`ResourceClient`] talking to the product service over HTTP.
#[derive(Clone, Debug)]
pub struct HttpResourceClient {
    http: reqwest::Client,
    base_url: Arc<str>,
}

impl HttpResourceClient {
    /// Creates a client for `http://{host}:{port}` with default settings.
    pub fn new(host: impl Into<String>, port: u16) -> ClientResult<Self> {
        ClientBuilder::new(host, port).build()
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{endpoint}", self.base_url)
    }
}

#[async_trait::async_trait]
impl ResourceClient for HttpResourceClient {
    async fn list(&self) -> ClientResult<Vec<Resource>> {
        let context = "listing products";
        let response = self
            .http
            .get(self.url("product"))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| ClientError::transport(context, err))?;

        response
            .json()
            .await
            .map_err(|err| ClientError::transport(context, err))
    }

    async fn get(&self, id: &str) -> ClientResult<Resource> {
        let context = "fetching product";
        let response = self
            .http
            .get(self.url(&format!("product/{id}")))
            .send()
            .await
            .map_err(|err| ClientError::transport(context, err))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { id: id.to_owned() });
        }

        response
            .error_for_status()
            .map_err(|err| ClientError::transport(context, err))?
            .json()
            .await
            .map_err(|err| ClientError::transport(context, err))
    }

    async fn create(&self, resource: &Resource) -> ClientResult<()> {
        tracing::trace!(id = %resource.id, "creating product");
        self.http
            .post(self.url("product"))
            .json(resource)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|err| ClientError::transport("creating product", err))?;

        Ok(())
    }
}
