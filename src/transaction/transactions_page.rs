//! The page for displaying a user's transactions.

use std::cmp::Reverse;

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error,
    api::{ApiClient, ApiToken, Transaction},
    endpoints,
    html::{TABLE_CELL_STYLE, TABLE_ROW_STYLE, base, format_currency, link},
    navigation::NavBar,
};

/// Display format for transaction dates, e.g. "14 May 2024".
const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day] [month repr:short] [year]");

/// The state needed for displaying the transactions page.
#[derive(Debug, Clone)]
pub struct TransactionsState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for TransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// Display the user's transactions, newest first.
pub async fn get_transactions_page(
    State(state): State<TransactionsState>,
    Extension(token): Extension<ApiToken>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);

    let mut transactions = state
        .api
        .transactions(&token)
        .await
        .inspect_err(|error| tracing::error!("Could not fetch transactions: {error}"))?;
    transactions.sort_by_key(|transaction| Reverse(transaction.date));

    Ok(transactions_view(nav_bar, &transactions).into_response())
}

fn format_date(date: OffsetDateTime) -> String {
    date.format(DATE_FORMAT)
        .unwrap_or_else(|_| date.date().to_string())
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let amount_style = if transaction.amount > 0.0 {
        "text-green-600 dark:text-green-400 font-semibold"
    } else {
        "text-red-600 dark:text-red-400 font-semibold"
    };

    html!(
        tr class=(TABLE_ROW_STYLE) {
            td class=(TABLE_CELL_STYLE) { (format_date(transaction.date)) }
            td class=(TABLE_CELL_STYLE) { (transaction.description) }
            td class=(TABLE_CELL_STYLE) {
                span
                    class="inline-flex items-center px-2.5 py-0.5 text-xs
                        font-semibold text-blue-800 bg-blue-100 rounded-full
                        dark:bg-blue-900 dark:text-blue-300"
                {
                    (transaction.category)
                }
            }
            td class=(TABLE_CELL_STYLE) { (transaction.payment_method) }
            td class={(TABLE_CELL_STYLE) " text-right"} {
                span class=(amount_style) {
                    @if transaction.amount > 0.0 { "+" }
                    (format_currency(transaction.amount))
                }
            }
        }
    )
}

fn transactions_view(nav_bar: NavBar, transactions: &[Transaction]) -> Markup {
    let nav_bar = nav_bar.into_html();
    let new_transaction_link = link(endpoints::NEW_TRANSACTION_VIEW, "Add Transaction");

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-xl
            text-gray-900 dark:text-white"
        {
            div class="flex items-center justify-between mb-4" {
                h2 class="text-xl font-bold" { "Transactions" }
                (new_transaction_link)
            }

            @if transactions.is_empty() {
                p class="text-gray-600 dark:text-gray-400" {
                    "No transactions yet. Add your first one to start tracking
                    your spending."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow" {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                        thead
                            class="text-xs text-gray-700 uppercase bg-gray-50
                                dark:bg-gray-700 dark:text-gray-400"
                        {
                            tr {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Description" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "Payment Method" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                            }
                        }
                        tbody {
                            @for transaction in transactions {
                                (transaction_row(transaction))
                            }
                        }
                    }
                }
            }
        }
    );

    base("Transactions", &[], &content)
}
