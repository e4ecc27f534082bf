use std::fmt::{Debug, Display};
use std::panic::Location;

use hyper::{Body, Response, StatusCode};
use routerify::RequestInfo;
use serde_json::json;

use super::macros::make_response;

/// An error that already knows the response it maps to. Validation failures
/// carry only a message; server errors also carry the underlying fault,
/// which goes into the response body as `"error"` and into the log.
pub struct RouteError {
    source: Option<anyhow::Error>,
    location: &'static Location<'static>,
    span: tracing::Span,
    response: Response<Body>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShouldLog {
    Yes,
    Debug,
    No,
}

impl RouteError {
    pub fn span(&self) -> &tracing::Span {
        &self.span
    }

    pub fn location(&self) -> &'static Location<'static> {
        self.location
    }

    pub fn response(self) -> Response<Body> {
        self.response
    }

    pub fn should_log(&self) -> ShouldLog {
        match self.response.status().is_server_error() {
            true => ShouldLog::Yes,
            false => match self.source.is_some() {
                true => ShouldLog::Debug,
                false => ShouldLog::No,
            },
        }
    }
}

impl From<Response<Body>> for RouteError {
    #[track_caller]
    fn from(res: Response<Body>) -> Self {
        Self {
            source: None,
            span: tracing::Span::current(),
            location: Location::caller(),
            response: res,
        }
    }
}

impl<S: AsRef<str>> From<(StatusCode, S)> for RouteError {
    #[track_caller]
    fn from(status: (StatusCode, S)) -> Self {
        Self {
            source: None,
            span: tracing::Span::current(),
            location: Location::caller(),
            response: make_response!(status.0, json!({ "message": status.1.as_ref() })),
        }
    }
}

impl<S: AsRef<str>, T> From<(StatusCode, S, T)> for RouteError
where
    T: Into<anyhow::Error>,
{
    #[track_caller]
    fn from(status: (StatusCode, S, T)) -> Self {
        let source: anyhow::Error = status.2.into();

        // Server errors surface the fault text to the caller; client errors
        // keep it for the log only.
        let response = if status.0.is_server_error() {
            make_response!(
                status.0,
                json!({ "message": status.1.as_ref(), "error": source.to_string() })
            )
        } else {
            make_response!(status.0, json!({ "message": status.1.as_ref() }))
        };

        Self {
            source: Some(source),
            span: tracing::Span::current(),
            location: Location::caller(),
            response,
        }
    }
}

impl From<&'_ str> for RouteError {
    #[track_caller]
    fn from(message: &'_ str) -> Self {
        Self {
            source: None,
            span: tracing::Span::current(),
            location: Location::caller(),
            response: make_response!(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": message })
            ),
        }
    }
}

impl Debug for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(err) => write!(f, "RouteError: {:?}", err),
            None => write!(f, "RouteError: Unknown Source"),
        }
    }
}

impl Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(err) => write!(f, "RouteError: {}", err),
            None => write!(f, "RouteError: Unknown Source"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.source {
            Some(err) => Some(err.as_ref()),
            None => None,
        }
    }
}

pub async fn error_handler(err: routerify::RouteError, info: RequestInfo) -> Response<Body> {
    match err.downcast::<RouteError>() {
        Ok(err) => {
            let location = err.location();

            err.span().in_scope(|| match err.should_log() {
                ShouldLog::Yes => {
                    tracing::error!(path = %info.uri(), method = %info.method(), location = location.to_string(), error = ?err, "http error")
                }
                ShouldLog::Debug => {
                    tracing::debug!(path = %info.uri(), method = %info.method(), location = location.to_string(), error = ?err, "http error")
                }
                ShouldLog::No => (),
            });

            err.response()
        }
        Err(err) => {
            tracing::error!(path = %info.uri(), method = %info.method(), error = ?err, "unhandled http error");
            make_response!(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "message": "Internal Server Error", "error": err.to_string() })
            )
        }
    }
}
