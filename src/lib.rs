//! FlexiFi is a web front end for managing your personal finances.
//!
//! This library serves HTML pages directly and delegates all persistence,
//! authentication, and AI computation to an external backend API. The server
//! is a thin presentation and state-orchestration layer: every page fetches
//! the data it needs from the backend, derives any display values in memory,
//! and renders the result.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_server::Handle;
use tokio::signal;

mod account;
mod alert;
mod api;
mod app_state;
mod assistant;
mod auth;
mod budget;
mod dashboard;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
mod routing;
mod timezone;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use api::ApiClient;
pub use app_state::AppState;
pub use logging::logging_middleware;
pub use routing::build_router;

use crate::{
    alert::AlertView,
    internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The backend API responded with a non-success status code.
    ///
    /// The message is the `detail`/`message` text from the response body when
    /// the backend provided one, otherwise the canonical reason for the
    /// status code.
    #[error("the backend API returned HTTP {status}: {message}")]
    Api {
        /// The HTTP status code of the backend response.
        status: u16,
        /// A human-readable description of what went wrong.
        message: String,
    },

    /// The backend API could not be reached or the response body could not be
    /// read (connection refused, DNS failure, malformed JSON, etc.).
    #[error("could not reach the backend API: {0}")]
    Request(String),

    /// The session cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar :(")]
    SessionMissing,

    /// The session cookie exists but its contents could not be parsed, or the
    /// session has expired.
    #[error("the session is invalid or has expired")]
    SessionInvalid,

    /// The session could not be serialized for storage in the cookie.
    #[error("could not encode the session cookie: {0}")]
    SessionEncoding(String),

    /// There was an error formatting or parsing the session expiry date-time.
    ///
    /// Callers should pass in the original error as a string and the date
    /// string that caused the error.
    #[error("could not format session expiry date-time string \"{1}\": {0}")]
    InvalidDateFormat(String, String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// The requested resource was not found.
    #[error("the requested resource could not be found")]
    NotFound,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::Request(value.to_string())
    }
}

impl Error {
    /// Whether this error means the backend rejected the session token and
    /// the user should sign in again.
    fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Api { status: 401, .. } | Error::SessionMissing | Error::SessionInvalid
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.is_unauthorized() {
            return Redirect::to(endpoints::SIGN_IN_VIEW).into_response();
        }

        match self {
            Error::NotFound => get_404_not_found_response(),
            Error::Request(reason) => {
                tracing::error!("Could not reach the backend API: {reason}");
                InternalServerError {
                    description: "The backend service is unavailable.",
                    fix: "Check that the backend API is running, then try again.",
                }
                .into_response()
            }
            Error::Api { status, message } => {
                tracing::error!("The backend API returned HTTP {status}: {message}");
                InternalServerError {
                    description: "The backend service reported an error.",
                    fix: "Try again later or check the server logs.",
                }
                .into_response()
            }
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to a valid, canonical timezone string"
                ),
            }
            .into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTMX alert fragment for endpoints that swap
    /// partial content instead of navigating to a new page.
    fn into_alert_response(self) -> Response {
        match self {
            Error::Api { message, .. } => AlertView::error("Request failed", &message)
                .into_response_with_status(StatusCode::BAD_GATEWAY),
            Error::Request(reason) => {
                tracing::error!("Could not reach the backend API: {reason}");
                AlertView::error(
                    "Backend unavailable",
                    "The backend service could not be reached. Try again later.",
                )
                .into_response_with_status(StatusCode::BAD_GATEWAY)
            }
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                AlertView::error(
                    "Something went wrong",
                    "An unexpected error occurred, check the server logs for more details.",
                )
                .into_response_with_status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}
