//! Classifies transport failures as temporary or permanent.
//!
//! The classifier is a whitelist: an immutable list of predicates over the
//! failure cause, combined by logical OR. It never generates failures of its
//! own; the [`TemporaryExceptionPlugin`](crate::plugin::TemporaryExceptionPlugin)
//! consults it and re-wraps the cause when any predicate matches.

use std::error::Error as StdError;
use std::io;
use std::sync::Arc;

use thiserror::Error;

use crate::error::BoxError;

type Predicate = Arc<dyn Fn(&(dyn StdError + 'static)) -> bool + Send + Sync>;

/// A transient transport failure. Callers may retry.
///
/// Wrapping depth is exactly one: a `TemporaryError` never contains another
/// `TemporaryError`, and the original cause is preserved unchanged.
#[derive(Debug, Error)]
#[error("temporary transport failure")]
pub struct TemporaryError {
    #[source]
    cause: BoxError,
}

impl TemporaryError {
    pub(crate) fn new(cause: BoxError) -> Self {
        debug_assert!(!cause.is::<TemporaryError>());
        TemporaryError { cause }
    }

    /// The underlying transport failure.
    pub fn cause(&self) -> &(dyn StdError + 'static) {
        self.cause.as_ref()
    }

    /// Unwraps the underlying transport failure.
    pub fn into_cause(self) -> BoxError {
        self.cause
    }
}

/// An OR-combined whitelist of predicates recognising transient failures.
///
/// The default whitelist covers the transport conditions that are worth
/// retrying: socket timeouts, refused, reset or aborted connections, and the
/// connect-phase failures hyper reports for unreachable or unresolvable
/// hosts. Additional predicates are appended through the additive builder:
///
/// ```rust
/// use riptide::classify::ExceptionClassifier;
///
/// let classifier = ExceptionClassifier::create()
///     .and(|error| error.to_string().contains("please retry"))
///     .build();
///
/// let transient = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
/// assert!(classifier.matches(&transient));
/// ```
#[derive(Clone)]
pub struct ExceptionClassifier {
    predicates: Arc<Vec<Predicate>>,
}

impl ExceptionClassifier {
    /// Starts an additive builder seeded with the default whitelist.
    pub fn create() -> ClassifierBuilder {
        ClassifierBuilder {
            predicates: default_predicates(),
        }
    }

    /// Starts a builder with an empty whitelist, for callers that want full
    /// control over what counts as transient.
    pub fn of() -> ClassifierBuilder {
        ClassifierBuilder {
            predicates: Vec::new(),
        }
    }

    /// `true` when any predicate recognises `error`. Predicates are
    /// OR-combined; evaluation order is unobservable.
    pub fn matches(&self, error: &(dyn StdError + 'static)) -> bool {
        self.predicates.iter().any(|predicate| predicate(error))
    }
}

impl Default for ExceptionClassifier {
    fn default() -> Self {
        ExceptionClassifier::create().build()
    }
}

/// Accumulates predicates for an [`ExceptionClassifier`].
pub struct ClassifierBuilder {
    predicates: Vec<Predicate>,
}

impl ClassifierBuilder {
    /// Appends a predicate to the whitelist.
    pub fn and<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&(dyn StdError + 'static)) -> bool + Send + Sync + 'static,
    {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Freezes the whitelist.
    pub fn build(self) -> ExceptionClassifier {
        ExceptionClassifier {
            predicates: Arc::new(self.predicates),
        }
    }
}

fn default_predicates() -> Vec<Predicate> {
    vec![Arc::new(transient_io), Arc::new(transient_hyper)]
}

/// I/O error kinds that signal a transient transport condition.
fn transient_io(error: &(dyn StdError + 'static)) -> bool {
    match error.downcast_ref::<io::Error>() {
        Some(error) => matches!(
            error.kind(),
            io::ErrorKind::TimedOut
                | io::ErrorKind::ConnectionRefused
                | io::ErrorKind::ConnectionReset
                | io::ErrorKind::ConnectionAborted
                | io::ErrorKind::NotConnected
                | io::ErrorKind::BrokenPipe
                | io::ErrorKind::UnexpectedEof
                | io::ErrorKind::Interrupted
        ),
        None => false,
    }
}

/// hyper failures raised before or while the response arrived: connect-phase
/// errors (covering DNS resolution), client timeouts, and connections closed
/// mid-message.
fn transient_hyper(error: &(dyn StdError + 'static)) -> bool {
    match error.downcast_ref::<hyper::Error>() {
        Some(error) => error.is_connect() || error.is_timeout() || error.is_incomplete_message(),
        None => false,
    }
}
