//! Content-type driven decoding of response bodies into typed values.
//!
//! A [`MessageConverter`] is the explicit type descriptor a binding carries:
//! where the routing layer needs to turn bytes into a value, the caller names
//! the converter alongside the handler instead of relying on runtime type
//! information.

use bytes::Bytes;
use hyper::header::{HeaderMap, CONTENT_TYPE};
use mime::Mime;
use serde::de::DeserializeOwned;

use crate::error::BoxError;

/// Decodes response bodies of supported media types into values of `T`.
pub trait MessageConverter<T>: Send + Sync {
    /// Indicates whether this converter is willing to decode a body declared
    /// with the given media type. An absent `Content-Type` is accepted by
    /// every built-in converter.
    fn supports(&self, content_type: Option<&Mime>) -> bool;

    /// Decodes the body into a value of `T`.
    fn convert(&self, content_type: Option<&Mime>, body: Bytes) -> Result<T, BoxError>;
}

/// Decodes `application/json` bodies (including `+json` suffixed types) via
/// `serde_json`.
#[derive(Clone, Copy, Default)]
pub struct Json;

impl<T> MessageConverter<T> for Json
where
    T: DeserializeOwned,
{
    fn supports(&self, content_type: Option<&Mime>) -> bool {
        match content_type {
            None => true,
            Some(mime) => {
                mime.type_() == mime::APPLICATION
                    && (mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
            }
        }
    }

    fn convert(&self, _content_type: Option<&Mime>, body: Bytes) -> Result<T, BoxError> {
        serde_json::from_slice(&body).map_err(Into::into)
    }
}

/// Decodes `text/*` bodies into a `String`, expecting UTF-8.
#[derive(Clone, Copy, Default)]
pub struct PlainText;

impl MessageConverter<String> for PlainText {
    fn supports(&self, content_type: Option<&Mime>) -> bool {
        match content_type {
            None => true,
            Some(mime) => mime.type_() == mime::TEXT,
        }
    }

    fn convert(&self, _content_type: Option<&Mime>, body: Bytes) -> Result<String, BoxError> {
        String::from_utf8(body.to_vec()).map_err(Into::into)
    }
}

/// Yields the body bytes untouched, regardless of media type.
#[derive(Clone, Copy, Default)]
pub struct Raw;

impl MessageConverter<Bytes> for Raw {
    fn supports(&self, _content_type: Option<&Mime>) -> bool {
        true
    }

    fn convert(&self, _content_type: Option<&Mime>, body: Bytes) -> Result<Bytes, BoxError> {
        Ok(body)
    }
}

/// Parses the `Content-Type` header of `headers`, retaining parameters.
/// Missing or unparseable values yield `None`.
pub(crate) fn content_type(headers: &HeaderMap) -> Option<Mime> {
    headers.get(CONTENT_TYPE)?.to_str().ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Greeting {
        message: String,
    }

    #[test]
    fn json_decodes_typed_values() {
        let body = Bytes::from_static(b"{\"message\":\"It works!\"}");
        let greeting: Greeting = Json.convert(None, body).unwrap();
        assert_eq!(greeting.message, "It works!");
    }

    #[test]
    fn json_supports_suffixed_types() {
        let problem: Mime = "application/problem+json".parse().unwrap();
        let plain: Mime = "text/plain".parse().unwrap();

        assert!(MessageConverter::<Greeting>::supports(&Json, None));
        assert!(MessageConverter::<Greeting>::supports(
            &Json,
            Some(&mime::APPLICATION_JSON)
        ));
        assert!(MessageConverter::<Greeting>::supports(&Json, Some(&problem)));
        assert!(!MessageConverter::<Greeting>::supports(&Json, Some(&plain)));
    }

    #[test]
    fn json_reports_malformed_bodies() {
        let body = Bytes::from_static(b"{not json");
        let result: Result<Greeting, _> = Json.convert(None, body);
        assert!(result.is_err());
    }

    #[test]
    fn plain_text_decodes_utf8() {
        let body = Bytes::from_static(b"It works!");
        assert_eq!(PlainText.convert(None, body).unwrap(), "It works!");
    }

    #[test]
    fn plain_text_rejects_non_text_types() {
        assert!(PlainText.supports(None));
        assert!(PlainText.supports(Some(&mime::TEXT_PLAIN_UTF_8)));
        assert!(!PlainText.supports(Some(&mime::APPLICATION_JSON)));
    }

    #[test]
    fn content_type_retains_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "text/plain; charset=utf-8".parse().unwrap());

        let mime = content_type(&headers).unwrap();
        assert_eq!(mime, mime::TEXT_PLAIN_UTF_8);
        assert_eq!(mime.get_param(mime::CHARSET), Some(mime::UTF_8));
    }

    #[test]
    fn content_type_absent_for_unparseable_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, "not a media type".parse().unwrap());

        assert!(content_type(&headers).is_none());
    }
}
