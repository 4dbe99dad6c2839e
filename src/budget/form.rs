//! The budget form and the endpoint that creates budget records.
//!
//! Setting a budget never edits an existing record: a new record is created
//! and the dashboard picks the most recently created one as active.

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::AlertView,
    api::{ApiClient, ApiToken, NewBudget},
    budget::BudgetPeriod,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE},
    timezone::local_now,
};

/// The state needed to create a budget.
#[derive(Debug, Clone)]
pub struct BudgetState {
    /// The client for the backend API.
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for BudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for setting a budget.
#[derive(Debug, Deserialize)]
pub struct BudgetForm {
    /// The budget period keyword from the select element.
    pub period: BudgetPeriod,
    /// The budget amount.
    pub amount: f64,
}

/// Renders the "Adjust Budget" card embedded in the dashboard.
pub(crate) fn budget_form_view() -> Markup {
    html! {
        section class=(CARD_STYLE) {
            h2 class="text-lg font-semibold mb-4" { "Set Your Budget" }

            form
                hx-post=(endpoints::BUDGETS_API)
                hx-target-error="#alert-container"
                hx-disabled-elt="#period, #amount, #set-budget-button"
                class="space-y-4"
            {
                div {
                    label for="period" class=(FORM_LABEL_STYLE) { "Budget Period" }

                    select name="period" id="period" class=(FORM_SELECT_STYLE) {
                        option value="weekly" { "Weekly" }
                        option value="monthly" selected { "Monthly" }
                        option value="yearly" { "Yearly" }
                    }
                }

                div {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Budget Amount (₹)" }

                    input
                        type="number"
                        name="amount"
                        id="amount"
                        placeholder="Enter budget amount"
                        min="0"
                        step="0.01"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button
                    type="submit"
                    id="set-budget-button"
                    class=(BUTTON_PRIMARY_STYLE)
                {
                    "Set Budget"
                }
            }
        }
    }
}

/// A route handler for creating a budget record.
///
/// The selected period is resolved against the current time in the
/// configured timezone and the resulting date range is sent to the backend.
/// On success the client is redirected to the dashboard so the summary is
/// recomputed; a budget analysis refresh is kicked off in the background and
/// its outcome is only logged. On failure an alert is returned and the
/// dashboard is left untouched.
pub async fn create_budget_endpoint(
    State(state): State<BudgetState>,
    Extension(token): Extension<ApiToken>,
    Form(form): Form<BudgetForm>,
) -> Response {
    if !(form.amount > 0.0) {
        return AlertView::error("Invalid Amount", "Please enter a valid budget amount")
            .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let now = match local_now(&state.local_timezone) {
        Some(now) => now,
        None => {
            return Error::InvalidTimezoneError(state.local_timezone.clone())
                .into_alert_response();
        }
    };

    let (start_date, end_date) = form.period.resolve(now);
    let new_budget = NewBudget {
        monthly_budget: form.amount,
        start_date,
        end_date,
    };

    match state.api.create_budget(&token, &new_budget).await {
        Ok(budget) => {
            tracing::info!(
                "Set a {} budget of {} (budget ID {})",
                form.period.label(),
                form.amount,
                budget.budget_id
            );

            // The budget is saved at this point; the analysis refresh is
            // best-effort and its failure only gets logged.
            let api = state.api.clone();
            tokio::spawn(async move {
                if let Err(error) = api.generate_analysis(&token, "budget").await {
                    tracing::debug!("Could not refresh budget analysis: {error}");
                }
            });

            (
                HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not create budget: {error}");
            error.into_alert_response()
        }
    }
}
