//! The page for listing linked bank accounts and linking a new one.

use axum::{
    Extension,
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    AppState, Error,
    api::{Account, ApiClient, ApiToken},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        TABLE_CELL_STYLE, TABLE_ROW_STYLE, base, format_currency,
    },
    navigation::NavBar,
};

/// The state needed for displaying the accounts page.
#[derive(Debug, Clone)]
pub struct AccountsState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for AccountsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// Mask an account number down to its last four characters for display.
fn masked_account_number(account_number: &str) -> String {
    let length = account_number.chars().count();
    if length <= 4 {
        return account_number.to_owned();
    }

    let last_four: String = account_number.chars().skip(length - 4).collect();
    format!("•••• {last_four}")
}

/// Display the user's linked bank accounts.
pub async fn get_accounts_page(
    State(state): State<AccountsState>,
    Extension(token): Extension<ApiToken>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::ACCOUNTS_VIEW);

    let accounts = state
        .api
        .accounts(&token)
        .await
        .inspect_err(|error| tracing::error!("Could not fetch accounts: {error}"))?;

    Ok(accounts_view(nav_bar, &accounts).into_response())
}

fn link_account_form() -> Markup {
    html!(
        section class=(CARD_STYLE) {
            h2 class="text-lg font-semibold mb-4" { "Link a Bank Account" }

            form
                hx-post=(endpoints::ACCOUNTS_API)
                hx-target-error="#alert-container"
                class="space-y-4"
            {
                div {
                    label for="account_number" class=(FORM_LABEL_STYLE) { "Account Number" }

                    input
                        type="text"
                        name="account_number"
                        id="account_number"
                        inputmode="numeric"
                        placeholder="Enter your account number"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) {
                    "Link Account"
                }
            }
        }
    )
}

fn accounts_view(nav_bar: NavBar, accounts: &[Account]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-md
            text-gray-900 dark:text-white space-y-6"
        {
            h2 class="text-xl font-bold" { "Accounts" }

            @if accounts.is_empty() {
                p class="text-gray-600 dark:text-gray-400" {
                    "No bank accounts linked yet."
                }
            } @else {
                div class="overflow-x-auto rounded-lg shadow" {
                    table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                        thead
                            class="text-xs text-gray-700 uppercase bg-gray-50
                                dark:bg-gray-700 dark:text-gray-400"
                        {
                            tr {
                                th scope="col" class=(TABLE_CELL_STYLE) { "Account Number" }
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Balance" }
                            }
                        }
                        tbody {
                            @for account in accounts {
                                tr class=(TABLE_ROW_STYLE) {
                                    td class=(TABLE_CELL_STYLE) {
                                        (masked_account_number(&account.account_number))
                                    }
                                    td class={(TABLE_CELL_STYLE) " text-right"} {
                                        (format_currency(account.current_balance))
                                    }
                                }
                            }
                        }
                    }
                }
            }

            (link_account_form())
        }
    );

    base("Accounts", &[], &content)
}
