//! Riptide &ndash; client-side response routing for asynchronous HTTP.
//!
//! Riptide takes a completed HTTP response and selects exactly one handler
//! for it, dispatching on an observable attribute of the response: the
//! status code, its family, the content type, or any function of the
//! response a caller supplies. Combined with the [`Rest`] client, request
//! futures carry not only the response bytes but a continuation chosen by
//! pattern matching on the response itself.
//!
//! Two subsystems do the heavy lifting:
//!
//! * the routing tree and the [`Navigator`](router::navigator::Navigator)
//!   protocol &ndash; a typed attribute-to-route map with an explicit
//!   wildcard fallback, and the strategy that extracts an attribute and
//!   selects a branch;
//! * the plugin-composed request pipeline and the failure classifier
//!   &ndash; ordered decorators over the deferred transport call, and the
//!   whitelist that labels transport failures *temporary* so callers can
//!   decide whether to retry.
//!
//! # Examples
//!
//! ```rust
//! use hyper::{Body, Response, StatusCode};
//! use riptide::converter::PlainText;
//! use riptide::router::{binding, navigator};
//! use riptide::test::TestRequestFactory;
//! use riptide::Rest;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), riptide::Error> {
//! let factory = TestRequestFactory::new();
//! factory.enqueue(
//!     Response::builder()
//!         .status(StatusCode::OK)
//!         .header("content-type", "text/plain")
//!         .body(Body::from("It works!"))
//!         .unwrap(),
//! );
//!
//! let rest = Rest::builder()
//!     .base_url("http://localhost")
//!     .request_factory(factory)
//!     .build()
//!     .unwrap();
//!
//! let body = rest
//!     .get("/greeting", &[])
//!     .dispatch(
//!         navigator::status(),
//!         vec![binding::on(StatusCode::OK).map(PlainText, |text: String| text)],
//!     )
//!     .await?;
//!
//! assert_eq!(body, "It works!");
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]

pub mod classify;
pub mod client;
pub mod converter;
pub mod error;
pub mod plugin;
pub mod rest;
pub mod route;
pub mod router;
pub mod test;

pub use crate::error::Error;
pub use crate::rest::Rest;
pub use crate::route::Route;
