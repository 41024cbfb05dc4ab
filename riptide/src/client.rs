//! The transport seam: request factories turn frozen request arguments into
//! response futures.

use futures_util::FutureExt;
use hyper::client::HttpConnector;
use hyper::Client;
use log::debug;

use crate::error::Error;
use crate::plugin::ResponseFuture;
use crate::rest::request::RequestArguments;

/// Produces the transport future for a frozen request.
///
/// The factory owns all HTTP semantics, connection pooling and timeouts
/// included; the routing layer only ever consumes the completed response.
/// Any failure surfaces as [`Error::Transport`] with the underlying cause
/// preserved, so the classifier can inspect it.
pub trait RequestFactory: Send + Sync {
    /// Starts the request, returning the eventual response.
    fn call(&self, arguments: RequestArguments) -> ResponseFuture;
}

impl<F> RequestFactory for F
where
    F: Fn(RequestArguments) -> ResponseFuture + Send + Sync,
{
    fn call(&self, arguments: RequestArguments) -> ResponseFuture {
        self(arguments)
    }
}

/// A request factory backed by a connection-pooled `hyper` client.
pub struct HyperRequestFactory {
    client: Client<HttpConnector>,
}

impl HyperRequestFactory {
    /// Creates a factory with a freshly configured client.
    pub fn new() -> HyperRequestFactory {
        HyperRequestFactory {
            client: Client::new(),
        }
    }

    /// Wraps an existing client, keeping its pool and executor.
    pub fn with_client(client: Client<HttpConnector>) -> HyperRequestFactory {
        HyperRequestFactory { client }
    }
}

impl Default for HyperRequestFactory {
    fn default() -> Self {
        HyperRequestFactory::new()
    }
}

impl RequestFactory for HyperRequestFactory {
    fn call(&self, arguments: RequestArguments) -> ResponseFuture {
        debug!("{} {}", arguments.method(), arguments.uri());

        let response = self.client.request(arguments.into_request());
        async move { response.await.map_err(|e| Error::Transport(e.into())) }.boxed()
    }
}
