//! Dashboard HTTP handlers and view rendering.
//!
//! The dashboard handler fetches the four backend collections concurrently,
//! derives the summary, and renders the page. The fetch is all-or-nothing:
//! if any one collection fails, the whole refresh fails and the error page
//! is shown instead of a partial summary.

use std::cmp::Reverse;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::{ApiClient, ApiToken, Transaction},
    budget::budget_form_view,
    dashboard::{
        cards::summary_cards_view,
        charts::{build_dashboard_charts, charts_script, charts_view},
        progress::{budget_analysis_card, budget_progress_card, budget_warning_banner},
        summary::{Summary, budget_percent_used, compute_summary},
    },
    endpoints,
    html::{CARD_STYLE, HeadElement, base, format_currency, link},
    navigation::NavBar,
};

/// How many transactions the "Recent Activity" card shows.
const RECENT_ACTIVITY_COUNT: usize = 3;

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the backend API.
    pub api: ApiClient,
    /// The savings goal target to display when no goal defines one.
    pub default_savings_target: f64,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            default_savings_target: state.default_savings_target,
        }
    }
}

/// Display a page with an overview of the user's finances.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(token): Extension<ApiToken>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW);

    // The four collections are fetched concurrently so one slow endpoint
    // does not serialize behind another. A single failure fails the whole
    // refresh; no summary is derived from a subset of the collections.
    let (accounts, budgets, transactions, savings_goals) = tokio::try_join!(
        state.api.accounts(&token),
        state.api.budgets(&token),
        state.api.transactions(&token),
        state.api.savings_goals(&token),
    )
    .inspect_err(|error| tracing::error!("Could not fetch dashboard data: {error}"))?;

    let summary = compute_summary(
        &accounts,
        &budgets,
        &transactions,
        &savings_goals,
        state.default_savings_target,
    );
    let percent_used = budget_percent_used(summary.total_expenses, summary.active_budget_amount);

    if transactions.is_empty() && accounts.is_empty() {
        return Ok(dashboard_no_data_view(nav_bar).into_response());
    }

    Ok(dashboard_view(nav_bar, &summary, percent_used, &transactions).into_response())
}

/// Renders the dashboard page when nothing has been linked or recorded yet.
fn dashboard_no_data_view(nav_bar: NavBar) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "recording a transaction");
    let accounts_link = link(endpoints::ACCOUNTS_VIEW, "linking a bank account");

    let content = html!(
        (nav_bar)

        div class="flex flex-col items-center px-6 py-8 mx-auto text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold"
            {
                "Nothing here yet..."
            }

            p
            {
                "Your financial overview will show up here once there is some
                data. Get started by " (new_transaction_link) " or
                by " (accounts_link) "."
            }
        }
    );

    base("Dashboard", &[], &content)
}

/// Renders the "Recent Activity" card with the newest transactions.
fn recent_activity_view(transactions: &[Transaction]) -> Markup {
    let mut recent: Vec<&Transaction> = transactions.iter().collect();
    recent.sort_by_key(|transaction| Reverse(transaction.date));
    recent.truncate(RECENT_ACTIVITY_COUNT);

    html!(
        section class=(CARD_STYLE) {
            div class="flex items-center justify-between mb-4" {
                h2 class="text-lg font-semibold" { "Recent Activity" }
                a
                    href=(endpoints::TRANSACTIONS_VIEW)
                    class="text-sm text-blue-600 hover:text-blue-500 dark:text-blue-500"
                {
                    "View All"
                }
            }

            @if recent.is_empty() {
                p class="text-sm text-gray-600 dark:text-gray-400" {
                    "No transactions yet."
                }
            }

            div class="space-y-3" {
                @for transaction in &recent {
                    div class="flex items-center justify-between py-2 border-b
                        border-gray-200 dark:border-gray-700 last:border-0"
                    {
                        div {
                            div class="font-medium" { (transaction.description) }
                            div class="text-xs text-gray-600 dark:text-gray-400" {
                                (transaction.category) " • " (transaction.payment_method)
                            }
                        }

                        @let amount_style = if transaction.amount > 0.0 {
                            "font-semibold text-green-600 dark:text-green-400"
                        } else {
                            "font-semibold"
                        };
                        div class=(amount_style) {
                            @if transaction.amount > 0.0 { "+" }
                            (format_currency(transaction.amount))
                        }
                    }
                }
            }
        }
    )
}

/// Renders the main dashboard page.
fn dashboard_view(
    nav_bar: NavBar,
    summary: &Summary,
    percent_used: f64,
    transactions: &[Transaction],
) -> Markup {
    let nav_bar = nav_bar.into_html();
    let charts = build_dashboard_charts(summary);

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            @if let Some(banner) = budget_warning_banner(percent_used) {
                (banner)
            }

            (summary_cards_view(summary))

            div class="grid grid-cols-1 lg:grid-cols-3 gap-4 w-full" {
                div class="lg:col-span-2" {
                    (charts_view(&charts))
                }

                div class="space-y-4" {
                    (budget_progress_card(summary, percent_used))

                    @if let Some(analysis) = budget_analysis_card(summary, percent_used) {
                        (analysis)
                    }

                    (budget_form_view())

                    (recent_activity_view(transactions))
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}
