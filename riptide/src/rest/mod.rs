//! The client: configuration, the plugin chain and dispatch entry points.

pub mod request;

pub use self::request::{InvalidRequest, RequestArguments, RequestBuilder};

use std::sync::Arc;

use hyper::{Method, Uri};
use log::trace;
use thiserror::Error;

use crate::client::{HyperRequestFactory, RequestFactory};
use crate::plugin::{self, Plugin, ResponseFuture, Supplier};

/// Client configuration the builder rejected.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The base URL does not parse as a URI.
    #[error("base url is not a valid uri")]
    BaseUrl(#[source] hyper::http::uri::InvalidUri),
}

struct RestData {
    base_url: String,
    request_factory: Box<dyn RequestFactory>,
    plugins: Vec<Box<dyn Plugin>>,
}

/// An HTTP client whose request futures terminate in response routing.
///
/// A `Rest` instance is configured once, with a base URL, a request factory
/// and an ordered plugin list, and is immutable and cheaply cloneable
/// afterwards: clones share the same configuration.
///
/// Requests start from one of the verb methods and end in
/// [`dispatch`](RequestBuilder::dispatch):
///
/// ```rust,no_run
/// use hyper::StatusCode;
/// use riptide::converter::PlainText;
/// use riptide::router::{binding, navigator};
/// use riptide::Rest;
///
/// # async fn example() -> Result<(), riptide::Error> {
/// let rest = Rest::builder()
///     .base_url("http://localhost:8080")
///     .build()
///     .unwrap();
///
/// let greeting = rest
///     .get("/greetings/{}", &["world"])
///     .dispatch(
///         navigator::status(),
///         vec![
///             binding::on(StatusCode::OK).map(PlainText, |text: String| text),
///             binding::on(StatusCode::NOT_FOUND).map(PlainText, |_| String::new()),
///         ],
///     )
///     .await?;
/// # let _ = greeting;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Rest {
    data: Arc<RestData>,
}

impl Rest {
    /// Starts configuring a new client.
    pub fn builder() -> RestBuilder {
        RestBuilder {
            base_url: String::new(),
            request_factory: None,
            plugins: Vec::new(),
        }
    }

    /// Starts a `GET` request.
    pub fn get(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::GET, template, variables)
    }

    /// Starts a `HEAD` request.
    pub fn head(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::HEAD, template, variables)
    }

    /// Starts a `POST` request.
    pub fn post(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::POST, template, variables)
    }

    /// Starts a `PUT` request.
    pub fn put(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::PUT, template, variables)
    }

    /// Starts a `PATCH` request.
    pub fn patch(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::PATCH, template, variables)
    }

    /// Starts a `DELETE` request.
    pub fn delete(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::DELETE, template, variables)
    }

    /// Starts an `OPTIONS` request.
    pub fn options(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::OPTIONS, template, variables)
    }

    /// Starts a `TRACE` request.
    pub fn trace(&self, template: &str, variables: &[&str]) -> RequestBuilder {
        self.request(Method::TRACE, template, variables)
    }

    /// Starts a request with an explicit method.
    pub fn request(&self, method: Method, template: &str, variables: &[&str]) -> RequestBuilder {
        RequestBuilder::new(self.clone(), method, template, variables)
    }

    /// Runs `arguments` through the plugin chain and the request factory,
    /// returning the response future.
    ///
    /// The chain is folded per request, first-listed plugin outermost, and
    /// the transport is only reached when the outermost supplier resolves.
    pub fn execute(&self, arguments: RequestArguments) -> ResponseFuture {
        trace!("executing {} {}", arguments.method(), arguments.uri());

        let data = Arc::clone(&self.data);
        let transport_arguments = arguments.clone();
        let transport: Supplier =
            Box::new(move || data.request_factory.call(transport_arguments));

        let supplier = plugin::compose(&self.data.plugins, &arguments, transport);
        supplier()
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.data.base_url
    }
}

/// Accumulates the configuration of a [`Rest`] client.
pub struct RestBuilder {
    base_url: String,
    request_factory: Option<Box<dyn RequestFactory>>,
    plugins: Vec<Box<dyn Plugin>>,
}

impl RestBuilder {
    /// Sets the base URL request templates are resolved against. A trailing
    /// slash is trimmed so templates can always start with `/`.
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_owned();
        self
    }

    /// Sets the request factory. Defaults to a pooled
    /// [`HyperRequestFactory`](crate::client::HyperRequestFactory).
    pub fn request_factory<F>(mut self, factory: F) -> Self
    where
        F: RequestFactory + 'static,
    {
        self.request_factory = Some(Box::new(factory));
        self
    }

    /// Appends a plugin. The first plugin added is outermost in the chain.
    pub fn plugin<P>(mut self, plugin: P) -> Self
    where
        P: Plugin + 'static,
    {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Appends a batch of already-boxed plugins, preserving their order.
    pub fn plugins(mut self, plugins: Vec<Box<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Validates the configuration and builds the client.
    pub fn build(self) -> Result<Rest, BuildError> {
        if !self.base_url.is_empty() {
            self.base_url
                .parse::<Uri>()
                .map_err(BuildError::BaseUrl)?;
        }

        Ok(Rest {
            data: Arc::new(RestData {
                base_url: self.base_url,
                request_factory: self
                    .request_factory
                    .unwrap_or_else(|| Box::new(HyperRequestFactory::new())),
                plugins: self.plugins,
            }),
        })
    }
}
