//! The AI analysis page: generate a new analysis and review previous ones.

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    alert::AlertView,
    api::{AiAnalysis, ApiClient, ApiToken},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, base},
    navigation::NavBar,
};

/// Display format for analysis timestamps, e.g. "14 May 2024 09:30".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day] [month repr:short] [year] [hour]:[minute]");

/// The analysis types the backend understands, with their display names.
const ANALYSIS_TYPES: [(&str, &str); 4] = [
    ("general", "General Overview"),
    ("budget", "Budget Analysis"),
    ("spending", "Spending Patterns"),
    ("savings", "Savings Opportunities"),
];

/// Result text the backend stores when its AI integration is unavailable.
/// Analyses containing these are hidden rather than shown to the user.
const ERROR_PLACEHOLDERS: [&str; 2] = ["API key not configured", "Error generating insights"];

/// The state needed for the analysis page and endpoint.
#[derive(Debug, Clone)]
pub struct AnalysisState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for AnalysisState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

fn is_placeholder(result: &str) -> bool {
    ERROR_PLACEHOLDERS
        .iter()
        .any(|placeholder| result.contains(placeholder))
}

fn display_name(analysis_type: &str) -> &str {
    ANALYSIS_TYPES
        .iter()
        .find(|(value, _)| *value == analysis_type)
        .map(|(_, name)| *name)
        .unwrap_or(analysis_type)
}

/// Display the analysis page with previously generated analyses.
pub async fn get_analysis_page(
    State(state): State<AnalysisState>,
    Extension(token): Extension<ApiToken>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::ANALYSIS_VIEW);

    let mut analyses = state
        .api
        .analyses(&token)
        .await
        .inspect_err(|error| tracing::error!("Could not fetch analyses: {error}"))?;
    analyses.retain(|analysis| !is_placeholder(&analysis.result));

    Ok(analysis_view(nav_bar, &analyses).into_response())
}

fn format_timestamp(timestamp: Option<OffsetDateTime>) -> String {
    timestamp
        .and_then(|value| value.format(DATE_TIME_FORMAT).ok())
        .unwrap_or_default()
}

fn analysis_card(analysis: &AiAnalysis) -> Markup {
    html!(
        div class=(CARD_STYLE) {
            div class="flex items-center justify-between mb-2" {
                h3 class="font-semibold" { (display_name(&analysis.analysis_type)) }
                span class="text-xs text-gray-600 dark:text-gray-400" {
                    (format_timestamp(analysis.created_at))
                }
            }

            div class="text-sm text-gray-700 dark:text-gray-300 space-y-1" {
                @for line in analysis.result.lines() {
                    @if !line.trim().is_empty() {
                        p { (line) }
                    }
                }
            }
        }
    )
}

fn analysis_view(nav_bar: NavBar, analyses: &[AiAnalysis]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-md
            text-gray-900 dark:text-white space-y-6"
        {
            h2 class="text-xl font-bold" { "AI Analysis" }

            section class=(CARD_STYLE) {
                form
                    hx-post=(endpoints::ANALYSIS_API)
                    hx-target-error="#alert-container"
                    hx-disabled-elt="#analysis_type, #generate-button"
                    class="space-y-4"
                {
                    div {
                        label for="analysis_type" class=(FORM_LABEL_STYLE) { "Analysis Type" }

                        select name="analysis_type" id="analysis_type" class=(FORM_SELECT_STYLE) {
                            @for (value, name) in &ANALYSIS_TYPES {
                                option value=(value) { (name) }
                            }
                        }
                    }

                    button
                        type="submit"
                        id="generate-button"
                        class=(BUTTON_PRIMARY_STYLE)
                    {
                        "Generate Analysis"
                    }
                }
            }

            @if analyses.is_empty() {
                p class="text-gray-600 dark:text-gray-400" {
                    "No analyses yet. Generate one to get insights into your
                    finances."
                }
            }

            div class="space-y-4" {
                @for analysis in analyses {
                    (analysis_card(analysis))
                }
            }
        }
    );

    base("AI Analysis", &[], &content)
}

/// The form data for generating an analysis.
#[derive(Debug, Deserialize)]
pub struct AnalysisForm {
    /// The analysis type keyword, e.g. "general".
    pub analysis_type: String,
}

/// A route handler that asks the backend to generate a new analysis, then
/// redirects back to the analysis page.
pub async fn generate_analysis_endpoint(
    State(state): State<AnalysisState>,
    Extension(token): Extension<ApiToken>,
    Form(form): Form<AnalysisForm>,
) -> Response {
    match state.api.generate_analysis(&token, &form.analysis_type).await {
        Ok(analysis) if is_placeholder(&analysis.result) => AlertView::error(
            "AI analysis unavailable",
            "The AI service is not configured. Please contact support.",
        )
        .into_response_with_status(StatusCode::SERVICE_UNAVAILABLE),
        Ok(_) => (
            HxRedirect(endpoints::ANALYSIS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not generate analysis: {error}");
            error.into_alert_response()
        }
    }
}
