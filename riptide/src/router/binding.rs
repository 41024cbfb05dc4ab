//! Pairs an attribute value, or the wildcard, with a terminal route.

use std::sync::Arc;

use hyper::{Body, Response};

use crate::converter::{self, MessageConverter};
use crate::error::Error;
use crate::route::Route;

/// A single branch of a routing tree: an attribute key (or the wildcard) and
/// the route to run when that key matches.
pub struct Binding<A, T = ()> {
    key: Option<A>,
    route: Route<T>,
}

impl<A, T> Binding<A, T> {
    /// Creates a binding from its parts. `None` is the wildcard key.
    pub fn new(key: Option<A>, route: Route<T>) -> Self {
        Binding { key, route }
    }

    /// The attribute key, or `None` for the wildcard.
    pub fn key(&self) -> Option<&A> {
        self.key.as_ref()
    }

    /// `true` when this binding is the wildcard fallback.
    pub fn is_wildcard(&self) -> bool {
        self.key.is_none()
    }

    pub(crate) fn into_parts(self) -> (Option<A>, Route<T>) {
        (self.key, self.route)
    }
}

/// Starts a binding for the concrete attribute value `attribute`.
pub fn on<A>(attribute: A) -> BindingBuilder<A> {
    BindingBuilder {
        key: Some(attribute),
    }
}

/// Starts the wildcard binding, matched when no concrete attribute does.
pub fn any<A>() -> BindingBuilder<A> {
    BindingBuilder { key: None }
}

/// Attaches a route to a pending binding key.
pub struct BindingBuilder<A> {
    key: Option<A>,
}

impl<A> BindingBuilder<A> {
    /// Attaches an explicit route.
    pub fn to<T>(self, route: Route<T>) -> Binding<A, T> {
        Binding::new(self.key, route)
    }

    /// Attaches a side-effecting consumer of the raw response.
    pub fn call<F>(self, f: F) -> Binding<A, ()>
    where
        F: Fn(Response<Body>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.to(Route::call(f))
    }

    /// Decodes the body with `converter` and hands the typed value to `f`,
    /// yielding unit.
    pub fn consume<C, B, F>(self, converter: C, f: F) -> Binding<A, ()>
    where
        C: MessageConverter<B> + 'static,
        B: Send + 'static,
        F: Fn(B) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.to(decoding(converter, move |value| {
            f(value).map_err(Error::Route)
        }))
    }

    /// Decodes the body with `converter` and yields `f`'s result as the
    /// route output.
    pub fn map<C, B, T, F>(self, converter: C, f: F) -> Binding<A, T>
    where
        C: MessageConverter<B> + 'static,
        B: Send + 'static,
        T: Send + 'static,
        F: Fn(B) -> T + Send + Sync + 'static,
    {
        self.to(decoding(converter, move |value| Ok(f(value))))
    }
}

/// Builds a route that drains the body, decodes it with `converter` and
/// finishes with `f`.
fn decoding<C, B, T, F>(converter: C, f: F) -> Route<T>
where
    C: MessageConverter<B> + 'static,
    B: Send + 'static,
    T: Send + 'static,
    F: Fn(B) -> Result<T, Error> + Send + Sync + 'static,
{
    let converter = Arc::new(converter);
    let f = Arc::new(f);

    Route::new(move |response| {
        let converter = Arc::clone(&converter);
        let f = Arc::clone(&f);

        async move {
            let content_type = converter::content_type(response.headers());
            let body = hyper::body::to_bytes(response.into_body())
                .await
                .map_err(|e| Error::Transport(e.into()))?;

            if !converter.supports(content_type.as_ref()) {
                return Err(Error::Decode {
                    content_type,
                    source: "no converter accepts the response media type".into(),
                });
            }

            let value = match converter.convert(content_type.as_ref(), body) {
                Ok(value) => value,
                Err(source) => {
                    return Err(Error::Decode {
                        content_type,
                        source,
                    })
                }
            };

            f(value)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::{Json, PlainText};
    use hyper::StatusCode;
    use serde::Deserialize;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Deserialize)]
    struct Greeting {
        message: String,
    }

    fn response(content_type: &str, body: &'static str) -> Response<Body> {
        Response::builder()
            .status(StatusCode::OK)
            .header("content-type", content_type)
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn consume_decodes_and_feeds_the_handler() {
        static SEEN: Mutex<Option<String>> = Mutex::new(None);

        let binding = on(StatusCode::OK).consume(Json, |greeting: Greeting| {
            *SEEN.lock().unwrap() = Some(greeting.message);
            Ok(())
        });

        let (_, route) = binding.into_parts();
        route
            .execute(response("application/json", "{\"message\":\"It works!\"}"))
            .await
            .unwrap();

        assert_eq!(SEEN.lock().unwrap().as_deref(), Some("It works!"));
    }

    #[tokio::test]
    async fn map_yields_the_handler_result() {
        let binding = on(StatusCode::OK).map(PlainText, |text: String| text.to_uppercase());

        let (_, route) = binding.into_parts();
        let value = route
            .execute(response("text/plain", "It works!"))
            .await
            .unwrap();

        assert_eq!(value, "IT WORKS!");
    }

    #[tokio::test]
    async fn decode_failures_carry_the_content_type() {
        let binding = on(StatusCode::OK).map(Json, |greeting: Greeting| greeting.message);

        let (_, route) = binding.into_parts();
        let error = route
            .execute(response("application/json", "{not json"))
            .await
            .unwrap_err();

        match error {
            Error::Decode { content_type, .. } => {
                assert_eq!(content_type, Some(mime::APPLICATION_JSON));
            }
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn mismatched_media_types_are_rejected_before_decoding() {
        static INVOCATIONS: AtomicUsize = AtomicUsize::new(0);

        let binding = on(StatusCode::OK).consume(PlainText, |_: String| {
            INVOCATIONS.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        let (_, route) = binding.into_parts();
        let error = route
            .execute(response("application/json", "{}"))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::Decode { .. }));
        assert_eq!(INVOCATIONS.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn wildcard_bindings_have_no_key() {
        let binding = any::<u16>().to(Route::pass());
        assert!(binding.is_wildcard());
        assert!(binding.key().is_none());

        let binding = on(200u16).to(Route::pass());
        assert_eq!(binding.key(), Some(&200));
    }
}
