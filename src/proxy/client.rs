//! Upstream client module
//!
//! Holds the pooled HTTP client and the parsed upstream origin. Built
//! once at startup, so upstream URL problems surface before the listener
//! binds.

use std::time::Duration;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::http::uri::{Authority, PathAndQuery, Scheme};
use hyper::{Request, Response, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;

use crate::config::ProxyConfig;

/// HTTP client bound to the configured upstream origin
#[derive(Debug)]
pub struct ProxyClient {
    client: Client<HttpConnector, Full<Bytes>>,
    scheme: Scheme,
    authority: Authority,
    request_timeout: Duration,
}

impl ProxyClient {
    /// Build the client from proxy configuration
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when the upstream URL cannot be parsed or has
    /// no scheme/host; this is a fatal startup condition.
    pub fn new(config: &ProxyConfig) -> Result<Self, String> {
        let uri: Uri = config
            .upstream
            .parse()
            .map_err(|e| format!("Invalid upstream URL '{}': {e}", config.upstream))?;
        let scheme = uri
            .scheme()
            .cloned()
            .ok_or_else(|| format!("Invalid upstream URL '{}': missing scheme", config.upstream))?;
        let authority = uri
            .authority()
            .cloned()
            .ok_or_else(|| format!("Invalid upstream URL '{}': missing host", config.upstream))?;

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.connect_timeout)));

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Ok(Self {
            client,
            scheme,
            authority,
            request_timeout: Duration::from_secs(config.request_timeout),
        })
    }

    /// Upstream authority, e.g. `localhost:8000` (becomes the Host header)
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Upstream origin, e.g. `http://localhost:8000` (rewrites Origin)
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    /// Build the upstream URI for a request path
    ///
    /// The path and query are forwarded unchanged; the proxy never strips
    /// or rewrites the prefix.
    pub fn upstream_uri(&self, path_and_query: &PathAndQuery) -> Result<Uri, hyper::http::Error> {
        Uri::builder()
            .scheme(self.scheme.clone())
            .authority(self.authority.clone())
            .path_and_query(path_and_query.clone())
            .build()
    }

    /// Whole-exchange deadline for one proxied request
    pub const fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Send a rewritten request to the upstream
    pub async fn send(
        &self,
        req: Request<Full<Bytes>>,
    ) -> Result<Response<Incoming>, hyper_util::client::legacy::Error> {
        self.client.request(req).await
    }
}
