//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts render into the `#alert-container` element of the base template
//! via HTMX's `hx-target-error` mechanism, so endpoints that swap partial
//! content can surface failures without a full page navigation.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AlertKind {
    Success,
    Error,
}

/// An alert message with a headline and detail text.
#[derive(Debug, Clone)]
pub struct AlertView {
    kind: AlertKind,
    message: String,
    details: String,
}

impl AlertView {
    /// Create a new success alert
    #[allow(dead_code)]
    pub fn success(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Create a new error alert
    pub fn error(message: &str, details: &str) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert markup.
    pub fn into_html(self) -> Markup {
        let container_style = match self.kind {
            AlertKind::Success => {
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                border-green-300 bg-green-50 text-green-800 \
                dark:border-green-800 dark:bg-gray-800 dark:text-green-400"
            }
            AlertKind::Error => {
                "flex items-start gap-3 p-4 mb-4 rounded-lg border \
                border-red-300 bg-red-50 text-red-800 \
                dark:border-red-800 dark:bg-gray-800 dark:text-red-400"
            }
        };

        html!(
            div
                class=(container_style)
                role="alert"
            {
                div
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }
                }

                button
                    type="button"
                    class="ms-auto text-sm font-semibold"
                    onclick="document.getElementById('alert-container').classList.add('hidden')"
                {
                    "✕"
                }
            }
        )
    }

    /// Render the alert as a response with the given status code.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_html()).into_response()
    }
}
