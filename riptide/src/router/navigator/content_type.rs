//! Dispatch on the `Content-Type` of a response.

use hyper::{Body, Response};
use mime::Mime;

use super::Navigator;
use crate::converter;

/// A `Navigator` dispatching on the declared media type of the response.
///
/// The header is parsed with its parameters retained, so matching is exact
/// on (type, subtype) and parameter set: a binding on `text/plain` does not
/// match a `text/plain; charset=utf-8` response. Callers that want
/// parameter-insensitive dispatch can supply their own navigator over the
/// essence of the parsed type.
///
/// A missing or unparseable header yields no attribute, which the default
/// selection maps to the wildcard.
#[derive(Clone, Copy)]
pub struct ContentTypeNavigator;

impl Navigator<Mime> for ContentTypeNavigator {
    fn extract(&self, response: &Response<Body>) -> Option<Mime> {
        converter::content_type(response.headers())
    }
}
