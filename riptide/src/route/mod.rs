//! Terminal response handlers.
//!
//! A [`Route`] is the leaf of every dispatch expression: a reusable function
//! from a completed response to a future of some value. The routing layer
//! treats it as opaque and invokes it at most once per dispatch, because
//! response bodies are single-consumption.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::{self, FutureExt};
use hyper::{Body, Response};

use crate::error::Error;

/// The future returned by invoking a [`Route`].
pub type RouteFuture<T> = dyn Future<Output = Result<T, Error>> + Send;

type RouteFn<T> = dyn Fn(Response<Body>) -> Pin<Box<RouteFuture<T>>> + Send + Sync;

/// A terminal response handler, yielding a value of `T` (unit, for purely
/// side-effecting handlers).
///
/// Failures raised synchronously inside a handler are captured into the
/// returned future; nothing escapes out of band.
pub struct Route<T = ()> {
    f: Arc<RouteFn<T>>,
}

impl<T> Clone for Route<T> {
    fn clone(&self) -> Self {
        Route {
            f: Arc::clone(&self.f),
        }
    }
}

impl<T> Route<T> {
    /// Creates a route from an asynchronous handler.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn(Response<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        Route {
            f: Arc::new(move |response| f(response).boxed()),
        }
    }

    /// Invokes the handler with `response`.
    ///
    /// The response body may only be drained once; callers must not execute
    /// the same route twice for a single response.
    pub fn execute(&self, response: Response<Body>) -> Pin<Box<RouteFuture<T>>> {
        (self.f)(response)
    }
}

impl Route<()> {
    /// A no-op success. The response body is dropped unread; the transport
    /// releases it when the future completes.
    pub fn pass() -> Route<()> {
        Route::new(|_| future::ok(()))
    }

    /// A side-effecting consumer of the raw response. Handler failures
    /// surface as [`Error::Route`].
    pub fn call<F>(f: F) -> Route<()>
    where
        F: Fn(Response<Body>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        Route::new(move |response| future::ready(f(response).map_err(Error::Route)))
    }
}

impl Route<Response<Body>> {
    /// Yields the raw response for the caller to inspect, headers and
    /// undrained body included.
    pub fn capture() -> Route<Response<Body>> {
        Route::new(future::ok)
    }
}
