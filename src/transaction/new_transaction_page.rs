//! The page for recording a new transaction.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::{
    AppState,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base,
    },
    navigation::NavBar,
    timezone::local_now,
    transaction::{CATEGORIES, PAYMENT_METHODS},
};

/// The value format of an HTML date input.
const HTML_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The state needed for displaying the new-transaction page.
#[derive(Debug, Clone)]
pub struct NewTransactionState {
    /// The local timezone as a canonical timezone name, used to pre-fill
    /// today's date.
    pub local_timezone: String,
}

impl FromRef<AppState> for NewTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Display the form for recording a new transaction.
pub async fn get_new_transaction_page(State(state): State<NewTransactionState>) -> Response {
    let nav_bar = NavBar::new(endpoints::TRANSACTIONS_VIEW);

    let today = local_now(&state.local_timezone)
        .and_then(|now| now.date().format(HTML_DATE_FORMAT).ok())
        .unwrap_or_default();

    new_transaction_view(nav_bar, &today).into_response()
}

fn select_input(name: &str, label: &str, options: &[&str], placeholder: &str) -> Markup {
    html!(
        div {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) required class=(FORM_SELECT_STYLE) {
                option value="" disabled selected { (placeholder) }
                @for option in options {
                    option value=(option) { (option) }
                }
            }
        }
    )
}

fn new_transaction_view(nav_bar: NavBar, today: &str) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE) {
            div class="w-full max-w-md" {
                h2 class="text-xl font-bold mb-4" { "Add Transaction" }

                form
                    hx-post=(endpoints::TRANSACTIONS_API)
                    hx-target-error="#alert-container"
                    class="space-y-4"
                {
                    div {
                        label for="amount" class=(FORM_LABEL_STYLE) { "Amount (₹)" }

                        input
                            type="number"
                            name="amount"
                            id="amount"
                            step="0.01"
                            placeholder="Enter amount (use negative for expenses)"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    (select_input("category", "Category", &CATEGORIES, "Select category"))

                    div {
                        label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                        input
                            type="text"
                            name="description"
                            id="description"
                            placeholder="What was this for?"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    (select_input(
                        "payment_method",
                        "Payment Method",
                        &PAYMENT_METHODS,
                        "Select payment method",
                    ))

                    div {
                        label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                        input
                            type="date"
                            name="date"
                            id="date"
                            value=(today)
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }

                    button type="submit" class=(BUTTON_PRIMARY_STYLE) {
                        "Add Transaction"
                    }
                }
            }
        }
    );

    base("Add Transaction", &[], &content)
}
