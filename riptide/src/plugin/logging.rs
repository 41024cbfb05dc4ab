//! Logs each outbound request and its outcome.

use std::time::Instant;

use futures_util::FutureExt;
use log::{log, log_enabled, Level};

use super::{Plugin, Supplier};
use crate::rest::request::RequestArguments;

/// A plugin that logs method, target and outcome of every request once its
/// future completes.
///
/// When the configured level is disabled the plugin steps aside entirely and
/// the supplier passes through untouched.
#[derive(Copy, Clone)]
pub struct LoggingPlugin {
    level: Level,
    duration: bool,
}

impl LoggingPlugin {
    /// Creates a logging plugin emitting at `level`.
    pub fn new(level: Level) -> LoggingPlugin {
        LoggingPlugin {
            level,
            duration: false,
        }
    }

    /// Creates a logging plugin emitting at `level`, with the elapsed time
    /// attached to each message.
    pub fn with_duration(level: Level) -> LoggingPlugin {
        LoggingPlugin {
            level,
            duration: true,
        }
    }
}

impl Default for LoggingPlugin {
    fn default() -> Self {
        LoggingPlugin::new(Level::Debug)
    }
}

impl Plugin for LoggingPlugin {
    fn apply(&self, arguments: &RequestArguments, next: Supplier) -> Supplier {
        if !log_enabled!(self.level) {
            return next;
        }

        let this = *self;
        let method = arguments.method().clone();
        let uri = arguments.uri().clone();

        Box::new(move || {
            let start = Instant::now();
            let future = next();
            async move {
                let result = future.await;

                let elapsed = if this.duration {
                    format!(" in {}us", start.elapsed().as_micros())
                } else {
                    String::new()
                };
                match &result {
                    Ok(response) => log!(
                        this.level,
                        "{} {} -> {}{}",
                        method,
                        uri,
                        response.status(),
                        elapsed
                    ),
                    Err(error) => log!(this.level, "{} {} failed: {}{}", method, uri, error, elapsed),
                }

                result
            }
            .boxed()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::compose;
    use hyper::{Body, Method, Response, StatusCode};

    #[tokio::test]
    async fn responses_pass_through_unmodified() {
        let plugins: Vec<Box<dyn Plugin>> = vec![Box::new(LoggingPlugin::with_duration(
            Level::Trace,
        ))];
        let arguments = RequestArguments::new(Method::GET, "http://localhost/".parse().unwrap());

        let transport: Supplier = Box::new(|| {
            async {
                Ok(Response::builder()
                    .status(StatusCode::ACCEPTED)
                    .body(Body::empty())
                    .unwrap())
            }
            .boxed()
        });

        let supplier = compose(&plugins, &arguments, transport);
        let response = supplier().await.unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }
}
