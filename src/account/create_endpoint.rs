//! Defines the endpoint for linking a new bank account.

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;

use crate::{
    AppState,
    alert::AlertView,
    api::{ApiClient, ApiToken, NewAccount},
    endpoints,
};

/// The state needed to link an account.
#[derive(Debug, Clone)]
pub struct CreateAccountState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for CreateAccountState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The form data for linking an account.
#[derive(Debug, Deserialize)]
pub struct AccountForm {
    /// The account number as entered by the user.
    pub account_number: String,
}

/// A route handler for linking a new bank account, redirects to the accounts
/// view on success.
///
/// Linked accounts always start at a zero balance; the balance only moves
/// through the backend.
pub async fn create_account_endpoint(
    State(state): State<CreateAccountState>,
    Extension(token): Extension<ApiToken>,
    Form(form): Form<AccountForm>,
) -> Response {
    let account_number = form.account_number.trim();
    if account_number.is_empty() || !account_number.chars().all(|c| c.is_ascii_digit()) {
        return AlertView::error(
            "Invalid Account Number",
            "Please enter a valid account number (digits only)",
        )
        .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let new_account = NewAccount {
        account_number: account_number.to_owned(),
        current_balance: 0.0,
    };

    match state.api.create_account(&token, &new_account).await {
        Ok(account) => {
            tracing::info!("Linked account with ID {}", account.account_id);
            (
                HxRedirect(endpoints::ACCOUNTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => {
            tracing::error!("Could not link account: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_account_tests {
    use axum::{Json, Router, http::StatusCode, middleware, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;

    use crate::{
        api::{ApiClient, ApiToken},
        endpoints,
        test_utils::spawn_stub_backend,
    };

    use super::{CreateAccountState, create_account_endpoint};

    async fn insert_test_token(
        mut request: axum::extract::Request,
        next: axum::middleware::Next,
    ) -> axum::response::Response {
        request
            .extensions_mut()
            .insert(ApiToken("test-token".to_owned()));
        next.run(request).await
    }

    fn get_test_server(api_base_url: &str) -> TestServer {
        let state = CreateAccountState {
            api: ApiClient::new(api_base_url),
        };
        let app = Router::new()
            .route(endpoints::ACCOUNTS_API, post(create_account_endpoint))
            .layer(middleware::from_fn(insert_test_token))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn can_link_an_account() {
        let app = Router::new().route(
            "/accounts/",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["account_number"], "123456789012");
                // Linking always starts the balance at zero.
                assert_eq!(body["current_balance"], 0.0);
                Json(serde_json::json!({
                    "account_id": 1,
                    "account_number": body["account_number"],
                    "current_balance": 0.0
                }))
            }),
        );
        let base_url = spawn_stub_backend(app).await;
        let server = get_test_server(&base_url);
        let form = [("account_number", "123456789012")];

        let response = server.post(endpoints::ACCOUNTS_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::ACCOUNTS_VIEW);
    }

    #[tokio::test]
    async fn non_numeric_account_number_is_rejected() {
        let app = Router::new();
        let base_url = spawn_stub_backend(app).await;
        let server = get_test_server(&base_url);
        let form = [("account_number", "not-a-number")];

        let response = server.post(endpoints::ACCOUNTS_API).form(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text_contains("valid account number");
    }
}
