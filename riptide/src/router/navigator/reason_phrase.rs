//! Dispatch on the reason phrase of a response status.

use hyper::{Body, Response};

use super::Navigator;

/// A `Navigator` dispatching on the reason phrase of the status code.
///
/// hyper does not retain the phrase that was on the wire, so the canonical
/// phrase for the status code is used instead. Unregistered codes have no
/// canonical phrase and yield no attribute.
#[derive(Clone, Copy)]
pub struct ReasonPhraseNavigator;

impl Navigator<&'static str> for ReasonPhraseNavigator {
    fn extract(&self, response: &Response<Body>) -> Option<&'static str> {
        response.status().canonical_reason()
    }
}
