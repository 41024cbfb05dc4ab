//! Dispatch on the status family of a response.

use hyper::{Body, Response, StatusCode};

use super::Navigator;

/// The five status-code families of RFC 7231, derived from the leading digit
/// of the status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Series {
    /// 1xx.
    Informational,
    /// 2xx.
    Successful,
    /// 3xx.
    Redirection,
    /// 4xx.
    ClientError,
    /// 5xx.
    ServerError,
}

impl Series {
    /// The family of `status`, if it falls within the five defined classes.
    /// `http` permits codes up to 999; anything above 599 has no family.
    pub fn of(status: StatusCode) -> Option<Series> {
        match status.as_u16() / 100 {
            1 => Some(Series::Informational),
            2 => Some(Series::Successful),
            3 => Some(Series::Redirection),
            4 => Some(Series::ClientError),
            5 => Some(Series::ServerError),
            _ => None,
        }
    }
}

/// A `Navigator` dispatching on the status family.
#[derive(Clone, Copy)]
pub struct SeriesNavigator;

impl Navigator<Series> for SeriesNavigator {
    fn extract(&self, response: &Response<Body>) -> Option<Series> {
        Series::of(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> Response<Body> {
        Response::builder()
            .status(status)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn families_follow_the_leading_digit() {
        assert_eq!(
            SeriesNavigator.extract(&response(100)),
            Some(Series::Informational)
        );
        assert_eq!(
            SeriesNavigator.extract(&response(204)),
            Some(Series::Successful)
        );
        assert_eq!(
            SeriesNavigator.extract(&response(301)),
            Some(Series::Redirection)
        );
        assert_eq!(
            SeriesNavigator.extract(&response(418)),
            Some(Series::ClientError)
        );
        assert_eq!(
            SeriesNavigator.extract(&response(503)),
            Some(Series::ServerError)
        );
    }

    #[test]
    fn codes_outside_the_defined_classes_have_no_family() {
        assert_eq!(SeriesNavigator.extract(&response(600)), None);
        assert_eq!(SeriesNavigator.extract(&response(999)), None);
    }
}
