//! The fluent request builder and its frozen form.

use std::fmt::Debug;
use std::hash::Hash;

use bytes::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use hyper::{Body, Method, Request, Uri};
use mime::Mime;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use thiserror::Error;

use crate::error::Error;
use crate::rest::Rest;
use crate::router;
use crate::router::binding::Binding;
use crate::router::navigator::Navigator;

/// Characters escaped when a path variable is expanded into a URI template.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}')
    .add(b'/')
    .add(b'%');

/// Characters escaped inside query parameter names and values.
const QUERY: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'=')
    .add(b'+')
    .add(b'%');

/// Request input the builder rejected while freezing. These errors are
/// synchronous and fatal to the dispatch call.
#[derive(Debug, Error)]
pub enum InvalidRequest {
    /// The URI template declares a different number of placeholders than the
    /// caller supplied variables for.
    #[error("uri template expects {expected} path variables, {supplied} supplied")]
    PathVariables {
        /// Placeholders in the template.
        expected: usize,
        /// Variables supplied by the caller.
        supplied: usize,
    },

    /// The expanded request target is not a valid URI.
    #[error("invalid request uri")]
    Uri(#[source] hyper::http::uri::InvalidUri),

    /// A header value contained bytes that are not permitted in a header.
    #[error("invalid value for header {name}")]
    HeaderValue {
        /// The offending header.
        name: HeaderName,
        /// The underlying parse failure.
        #[source]
        source: hyper::header::InvalidHeaderValue,
    },
}

/// The frozen form of a request: everything plugins and the request factory
/// are allowed to observe.
#[derive(Clone, Debug)]
pub struct RequestArguments {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestArguments {
    /// Creates bare arguments with no headers and an empty body. Mostly
    /// useful to exercise plugins outside a full client.
    pub fn new(method: Method, uri: Uri) -> RequestArguments {
        RequestArguments {
            method,
            uri,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The fully expanded request target.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// The request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The request body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Assembles the transport request.
    pub fn into_request(self) -> Request<Body> {
        let mut request = Request::new(Body::from(self.body));
        *request.method_mut() = self.method;
        *request.uri_mut() = self.uri;
        *request.headers_mut() = self.headers;
        request
    }
}

/// Accumulates a single request: method, URI template, path variables, query
/// parameters, headers and body.
///
/// Terminated by [`dispatch`](RequestBuilder::dispatch), which freezes the
/// arguments, runs the plugin chain and routes the completed response.
pub struct RequestBuilder {
    rest: Rest,
    method: Method,
    template: String,
    path_variables: Vec<String>,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
    error: Option<InvalidRequest>,
}

impl RequestBuilder {
    pub(crate) fn new(
        rest: Rest,
        method: Method,
        template: &str,
        path_variables: &[&str],
    ) -> RequestBuilder {
        RequestBuilder {
            rest,
            method,
            template: template.to_owned(),
            path_variables: path_variables.iter().map(|v| (*v).to_owned()).collect(),
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            error: None,
        }
    }

    /// Appends a header. An invalid value is remembered and surfaces when
    /// the request is frozen.
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(source) => {
                if self.error.is_none() {
                    self.error = Some(InvalidRequest::HeaderValue { name, source });
                }
            }
        }
        self
    }

    /// Sets the `Accept` header.
    pub fn accept(self, mime: Mime) -> Self {
        let value = mime.to_string();
        self.header(ACCEPT, &value)
    }

    /// Sets the `Content-Type` header.
    pub fn content_type(self, mime: Mime) -> Self {
        let value = mime.to_string();
        self.header(CONTENT_TYPE, &value)
    }

    /// Appends a query parameter. Names and values are percent-encoded on
    /// expansion.
    pub fn query(mut self, name: &str, value: &str) -> Self {
        self.query.push((name.to_owned(), value.to_owned()));
        self
    }

    /// Sets the request body.
    pub fn body<B>(mut self, body: B) -> Self
    where
        B: Into<Bytes>,
    {
        self.body = body.into();
        self
    }

    /// Freezes the accumulated input into [`RequestArguments`].
    pub(crate) fn freeze(self) -> Result<RequestArguments, InvalidRequest> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let path = expand(&self.template, &self.path_variables)?;

        let mut target = String::with_capacity(self.rest.base_url().len() + path.len());
        target.push_str(self.rest.base_url());
        target.push_str(&path);

        for (i, (name, value)) in self.query.iter().enumerate() {
            target.push(if i == 0 { '?' } else { '&' });
            target.extend(utf8_percent_encode(name, QUERY));
            target.push('=');
            target.extend(utf8_percent_encode(value, QUERY));
        }

        let uri: Uri = target.parse().map_err(InvalidRequest::Uri)?;

        Ok(RequestArguments {
            method: self.method,
            uri,
            headers: self.headers,
            body: self.body,
        })
    }

    /// Freezes the request, runs it through the plugin chain and dispatches
    /// the completed response through a routing tree built from `bindings`.
    ///
    /// Tree and builder errors fail synchronously before any transport
    /// activity; everything later arrives as the failure of the returned
    /// future.
    pub async fn dispatch<N, A, T, I>(self, navigator: N, bindings: I) -> Result<T, Error>
    where
        N: Navigator<A> + Send + Sync + 'static,
        A: Eq + Hash + Debug + Send + Sync + 'static,
        T: Send + 'static,
        I: IntoIterator<Item = Binding<A, T>>,
    {
        let route = router::dispatch(navigator, bindings)?;

        let rest = self.rest.clone();
        let arguments = self.freeze()?;

        let response = rest.execute(arguments).await?;
        route.execute(response).await
    }
}

/// Expands `{}`-delimited placeholders in `template` with `variables`, in
/// order, percent-encoding each variable as a path segment.
fn expand(template: &str, variables: &[String]) -> Result<String, InvalidRequest> {
    let mut out = String::with_capacity(template.len());
    let mut vars = variables.iter();
    let mut expected = 0;
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(offset) => {
                expected += 1;
                if let Some(variable) = vars.next() {
                    out.extend(utf8_percent_encode(variable, PATH_SEGMENT));
                }
                rest = &rest[start + offset + 1..];
            }
            None => {
                // An unbalanced brace is kept literally.
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);

    if expected != variables.len() {
        return Err(InvalidRequest::PathVariables {
            expected,
            supplied: variables.len(),
        });
    }

    Ok(out)
}
