//! The error taxonomy shared by dispatch, transport and routing.

use mime::Mime;
use thiserror::Error;

use crate::classify::TemporaryError;
use crate::rest::request::InvalidRequest;
use crate::router::tree::TreeError;

/// A type-erased failure cause, as produced by the transport or a converter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The failure value carried by every future this crate returns.
///
/// Construction-time errors (`Tree`, `Request`) surface synchronously and are
/// fatal to the dispatch expression; everything else travels through the
/// returned future.
#[derive(Debug, Error)]
pub enum Error {
    /// No concrete binding matched the extracted attribute and the tree
    /// carries no wildcard.
    #[error("no route matched attribute {}", .attribute.as_deref().unwrap_or("<none>"))]
    NoRouteMatched {
        /// The attribute the navigator extracted, if one was present.
        attribute: Option<String>,
    },

    /// A network, I/O or protocol error raised by the request factory.
    #[error("transport failed")]
    Transport(#[source] BoxError),

    /// A transport failure the classifier recognised as transient. Callers
    /// may retry.
    #[error(transparent)]
    Temporary(#[from] TemporaryError),

    /// An application error raised inside a route handler.
    #[error("route handler failed")]
    Route(#[source] anyhow::Error),

    /// The response body could not be decoded into the requested type.
    #[error("failed to decode response body as {}", .content_type.as_ref().map(Mime::as_ref).unwrap_or("<unspecified>"))]
    Decode {
        /// The media type the response declared, if any.
        content_type: Option<Mime>,
        /// The underlying converter failure.
        #[source]
        source: BoxError,
    },

    /// The binding set could not be assembled into a routing tree.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The fluent builder accumulated input that does not form a valid
    /// request.
    #[error(transparent)]
    Request(#[from] InvalidRequest),
}
