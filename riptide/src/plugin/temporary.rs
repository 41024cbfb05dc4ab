//! Marks transient transport failures so callers can decide whether to
//! retry.

use futures_util::FutureExt;
use log::trace;

use super::{Plugin, Supplier};
use crate::classify::{ExceptionClassifier, TemporaryError};
use crate::error::Error;
use crate::rest::request::RequestArguments;

/// Observes the response future and re-wraps transport failures the
/// classifier recognises as [`Error::Temporary`].
///
/// The single-level unwrap rule lives here and nowhere else: predicates are
/// shown the cause inside [`Error::Transport`], never the wrapper itself.
/// Failures the classifier rejects propagate unchanged, cause untouched, and
/// a failure that is already classified passes straight through, so stacking
/// the plugin twice observes the same failures as applying it once.
pub struct TemporaryExceptionPlugin {
    classifier: ExceptionClassifier,
}

impl TemporaryExceptionPlugin {
    /// Uses the default classifier.
    pub fn new() -> Self {
        TemporaryExceptionPlugin::with_classifier(ExceptionClassifier::default())
    }

    /// Uses the supplied classifier.
    pub fn with_classifier(classifier: ExceptionClassifier) -> Self {
        TemporaryExceptionPlugin { classifier }
    }
}

impl Default for TemporaryExceptionPlugin {
    fn default() -> Self {
        TemporaryExceptionPlugin::new()
    }
}

impl Plugin for TemporaryExceptionPlugin {
    fn apply(&self, _arguments: &RequestArguments, next: Supplier) -> Supplier {
        let classifier = self.classifier.clone();
        Box::new(move || {
            let future = next();
            async move {
                match future.await {
                    Ok(response) => Ok(response),
                    Err(error) => Err(classify(&classifier, error)),
                }
            }
            .boxed()
        })
    }
}

fn classify(classifier: &ExceptionClassifier, error: Error) -> Error {
    match error {
        Error::Transport(cause) => {
            if classifier.matches(cause.as_ref()) {
                trace!("transport failure classified as temporary: {}", cause);
                Error::Temporary(TemporaryError::new(cause))
            } else {
                Error::Transport(cause)
            }
        }
        // Anything else is not a transport failure, or an inner plugin
        // already classified it.
        other => other,
    }
}
