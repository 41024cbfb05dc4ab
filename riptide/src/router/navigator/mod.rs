//! Strategies that extract a routing attribute from a response and select a
//! branch of a routing tree.

pub mod content_type;
pub mod reason_phrase;
pub mod series;

pub use self::content_type::ContentTypeNavigator;
pub use self::reason_phrase::ReasonPhraseNavigator;
pub use self::series::{Series, SeriesNavigator};

use std::hash::Hash;

use hyper::{Body, Response, StatusCode};

use crate::route::Route;
use crate::router::tree::RoutingTree;

/// Determines which branch of a [`RoutingTree`] handles a response.
///
/// Implementors supply `extract`; the provided `select` covers the common
/// policy of falling through to the wildcard when no attribute is present.
/// Any function of the response can act as a navigator, so one-off dispatch
/// criteria do not need a named type:
///
/// ```rust
/// # use hyper::{Body, Response};
/// # use riptide::router::navigator::Navigator;
/// let by_server = |response: &Response<Body>| {
///     response
///         .headers()
///         .get("server")
///         .and_then(|v| v.to_str().ok())
///         .map(str::to_owned)
/// };
/// # fn assert_navigator<N: Navigator<String>>(_: N) {}
/// # assert_navigator(by_server);
/// ```
pub trait Navigator<A> {
    /// Computes the routing attribute for `response`, if one is present.
    fn extract(&self, response: &Response<Body>) -> Option<A>;

    /// Selects the route for the extracted attribute. An absent attribute
    /// falls through to the wildcard; a present one is looked up in the
    /// tree, which itself falls back to the wildcard on a miss.
    fn select<'a, T>(
        &self,
        attribute: Option<&A>,
        tree: &'a RoutingTree<A, T>,
    ) -> Option<&'a Route<T>>
    where
        A: Eq + Hash,
    {
        match attribute {
            Some(attribute) => tree.lookup(attribute),
            None => tree.wildcard(),
        }
    }
}

impl<A, F> Navigator<A> for F
where
    F: Fn(&Response<Body>) -> Option<A>,
{
    fn extract(&self, response: &Response<Body>) -> Option<A> {
        self(response)
    }
}

/// A `Navigator` dispatching on the raw integer status code.
#[derive(Clone, Copy)]
pub struct StatusCodeNavigator;

impl Navigator<u16> for StatusCodeNavigator {
    fn extract(&self, response: &Response<Body>) -> Option<u16> {
        Some(response.status().as_u16())
    }
}

/// A `Navigator` dispatching on the typed status code.
#[derive(Clone, Copy)]
pub struct StatusNavigator;

impl Navigator<StatusCode> for StatusNavigator {
    fn extract(&self, response: &Response<Body>) -> Option<StatusCode> {
        Some(response.status())
    }
}

/// Creates a navigator dispatching on the raw integer status code.
pub fn status_code() -> StatusCodeNavigator {
    StatusCodeNavigator
}

/// Creates a navigator dispatching on the typed status code.
pub fn status() -> StatusNavigator {
    StatusNavigator
}

/// Creates a navigator dispatching on the status family.
pub fn series() -> SeriesNavigator {
    SeriesNavigator
}

/// Creates a navigator dispatching on the `Content-Type` of the response.
pub fn content_type() -> ContentTypeNavigator {
    ContentTypeNavigator
}

/// Creates a navigator dispatching on the reason phrase of the response
/// status.
pub fn reason_phrase() -> ReasonPhraseNavigator {
    ReasonPhraseNavigator
}
