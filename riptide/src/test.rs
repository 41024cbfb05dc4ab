//! Helpers for exercising dispatch expressions without a network.
//!
//! The [`TestRequestFactory`] stands in for the transport: tests queue
//! responses (or failures) up front and assert on what the dispatch
//! expression did with them.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::{self, FutureExt};
use hyper::{Body, Response};

use crate::client::RequestFactory;
use crate::error::Error;
use crate::plugin::ResponseFuture;
use crate::rest::RequestArguments;

/// A [`RequestFactory`] that answers from a queue of canned results.
///
/// The factory is a cheaply cloneable handle; clones share the queue, so a
/// test can keep one handle while moving another into the client under test.
/// An exhausted queue fails the request with a transport error naming the
/// problem.
#[derive(Clone, Default)]
pub struct TestRequestFactory {
    data: Arc<TestRequestFactoryData>,
}

#[derive(Default)]
struct TestRequestFactoryData {
    results: Mutex<VecDeque<Result<Response<Body>, Error>>>,
    called: AtomicBool,
}

impl TestRequestFactory {
    /// Creates a factory with an empty queue.
    pub fn new() -> TestRequestFactory {
        TestRequestFactory::default()
    }

    /// Queues a response to answer the next request with.
    pub fn enqueue(&self, response: Response<Body>) {
        self.data.results.lock().unwrap().push_back(Ok(response));
    }

    /// Queues a failure to answer the next request with.
    pub fn enqueue_error(&self, error: Error) {
        self.data.results.lock().unwrap().push_back(Err(error));
    }

    /// `true` once the transport was asked for at least one response.
    pub fn was_called(&self) -> bool {
        self.data.called.load(Ordering::SeqCst)
    }
}

impl RequestFactory for TestRequestFactory {
    fn call(&self, _arguments: RequestArguments) -> ResponseFuture {
        self.data.called.store(true, Ordering::SeqCst);

        let next = self.data.results.lock().unwrap().pop_front();
        let result = next.unwrap_or_else(|| {
            Err(Error::Transport("no canned response queued".into()))
        });

        future::ready(result).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::{Method, StatusCode};

    fn arguments() -> RequestArguments {
        RequestArguments::new(Method::GET, "http://localhost/".parse().unwrap())
    }

    #[tokio::test]
    async fn answers_in_queue_order() {
        let factory = TestRequestFactory::new();
        factory.enqueue(
            Response::builder()
                .status(StatusCode::OK)
                .body(Body::empty())
                .unwrap(),
        );
        factory.enqueue(
            Response::builder()
                .status(StatusCode::NOT_FOUND)
                .body(Body::empty())
                .unwrap(),
        );

        assert!(!factory.was_called());
        assert_eq!(
            factory.call(arguments()).await.unwrap().status(),
            StatusCode::OK
        );
        assert_eq!(
            factory.call(arguments()).await.unwrap().status(),
            StatusCode::NOT_FOUND
        );
        assert!(factory.was_called());
    }

    #[tokio::test]
    async fn exhausted_queues_fail_as_transport_errors() {
        let factory = TestRequestFactory::new();

        let error = factory.call(arguments()).await.unwrap_err();
        assert!(matches!(error, Error::Transport(_)));
    }
}
