//! The plugin chain wrapped around every outbound request.
//!
//! A plugin is a decorator over the deferred transport call: it receives the
//! frozen request arguments and the next supplier in the chain, and returns
//! the supplier its caller will invoke. Composition is right-to-left, so the
//! last-listed plugin sits nearest the transport and the first-listed one is
//! outermost. Nothing happens until the outermost supplier is invoked.

pub mod logging;
pub mod temporary;

pub use self::logging::LoggingPlugin;
pub use self::temporary::TemporaryExceptionPlugin;

use std::future::Future;
use std::pin::Pin;

use hyper::{Body, Response};

use crate::error::Error;
use crate::rest::request::RequestArguments;

/// The future eventually yielding the transport response.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<Response<Body>, Error>> + Send>>;

/// A deferred transport call. Invoking the supplier starts the request.
pub type Supplier = Box<dyn FnOnce() -> ResponseFuture + Send>;

/// A decorator over the deferred transport call of a single request.
///
/// A plugin may pass `next` through untouched, attach a continuation to its
/// future, substitute a response, transform a failure, or short-circuit by
/// returning a supplier that never invokes `next` at all. Plugins must not
/// silently swallow failures unless they substitute a successful response,
/// and must forward cancellation (dropping the future) to the inner supplier
/// unless they explicitly own it.
pub trait Plugin: Send + Sync {
    /// Wraps `next`, returning the supplier the caller will invoke.
    fn apply(&self, arguments: &RequestArguments, next: Supplier) -> Supplier;
}

/// A plugin that passes the supplier through untouched.
#[derive(Clone, Copy, Default)]
pub struct IdentityPlugin;

impl Plugin for IdentityPlugin {
    fn apply(&self, _arguments: &RequestArguments, next: Supplier) -> Supplier {
        next
    }
}

/// Folds `plugins` around the transport supplier, right-to-left, so that the
/// first-listed plugin ends up outermost.
pub(crate) fn compose(
    plugins: &[Box<dyn Plugin>],
    arguments: &RequestArguments,
    transport: Supplier,
) -> Supplier {
    plugins
        .iter()
        .rev()
        .fold(transport, |next, plugin| plugin.apply(arguments, next))
}
