//! Defines the endpoint for recording a new transaction.

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error,
    alert::AlertView,
    api::{ApiClient, ApiToken, NewTransaction},
    endpoints,
    timezone::get_local_offset,
};

/// The state needed to record a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The client for the backend API.
    pub api: ApiClient,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The form data for recording a transaction.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// The signed amount (positive = income, negative = expense).
    pub amount: f64,
    /// The category label selected in the form.
    pub category: String,
    /// What the transaction was for.
    pub description: String,
    /// How the transaction was paid.
    pub payment_method: String,
    /// The date of the transaction.
    pub date: Date,
}

fn validation_error(details: &str) -> Response {
    AlertView::error("Invalid Transaction", details)
        .into_response_with_status(StatusCode::BAD_REQUEST)
}

/// A route handler for recording a new transaction, redirects to the
/// transactions view on success.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    Extension(token): Extension<ApiToken>,
    Form(form): Form<TransactionForm>,
) -> Response {
    if form.amount == 0.0 || !form.amount.is_finite() {
        return validation_error("Please enter a valid amount");
    }
    if form.category.trim().is_empty() {
        return validation_error("Category is required");
    }
    if form.description.trim().is_empty() {
        return validation_error("Description is required");
    }
    if form.payment_method.trim().is_empty() {
        return validation_error("Payment method is required");
    }

    let offset = match get_local_offset(&state.local_timezone) {
        Some(offset) => offset,
        None => {
            return Error::InvalidTimezoneError(state.local_timezone.clone())
                .into_alert_response();
        }
    };

    let new_transaction = NewTransaction {
        amount: form.amount,
        category: form.category.trim().to_owned(),
        description: form.description.trim().to_owned(),
        date: form.date.midnight().assume_offset(offset),
        payment_method: form.payment_method.trim().to_owned(),
    };

    match state.api.create_transaction(&token, &new_transaction).await {
        Ok(_) => (
            HxRedirect(endpoints::TRANSACTIONS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("Could not create transaction: {error}");
            error.into_alert_response()
        }
    }
}

#[cfg(test)]
mod create_transaction_tests {
    use axum::{Json, Router, http::StatusCode, middleware, routing::post};
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;

    use crate::{
        api::{ApiClient, ApiToken},
        endpoints,
        test_utils::spawn_stub_backend,
    };

    use super::{CreateTransactionState, create_transaction_endpoint};

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
        let state = CreateTransactionState {
            api: ApiClient::new(api_base_url),
            local_timezone: "Etc/UTC".to_owned(),
        };
        let app = Router::new()
            .route(
                endpoints::TRANSACTIONS_API,
                post(create_transaction_endpoint),
            )
            .layer(middleware::from_fn(insert_test_token))
            .with_state(state);

        TestServer::new(app)
    }

    async fn stub_backend() -> String {
        let app = Router::new().route(
            "/transactions/",
            post(|Json(body): Json<serde_json::Value>| async move {
                assert_eq!(body["amount"], -450.5);
                assert_eq!(body["category"], "Food");
                assert_eq!(body["description"], "Groceries");
                assert_eq!(body["payment_method"], "UPI");
                assert_eq!(body["date"], "2024-05-14T00:00:00Z");
                Json(serde_json::json!({
                    "transaction_id": 1,
                    "amount": body["amount"],
                    "category": body["category"],
                    "description": body["description"],
                    "date": body["date"],
                    "payment_method": body["payment_method"]
                }))
            }),
        );

        spawn_stub_backend(app).await
    }

    #[tokio::test]
    async fn can_record_a_transaction() {
        let base_url = stub_backend().await;
        let server = get_test_server(&base_url);
        let form = [
            ("amount", "-450.5"),
            ("category", "Food"),
            ("description", "Groceries"),
            ("payment_method", "UPI"),
            ("date", "2024-05-14"),
        ];

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::TRANSACTIONS_VIEW);
    }

    #[tokio::test]
    async fn zero_amount_is_rejected() {
        let base_url = stub_backend().await;
        let server = get_test_server(&base_url);
        let form = [
            ("amount", "0"),
            ("category", "Food"),
            ("description", "Groceries"),
            ("payment_method", "UPI"),
            ("date", "2024-05-14"),
        ];

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text_contains("Please enter a valid amount");
    }

    #[tokio::test]
    async fn blank_description_is_rejected() {
        let base_url = stub_backend().await;
        let server = get_test_server(&base_url);
        let form = [
            ("amount", "-450.5"),
            ("category", "Food"),
            ("description", "   "),
            ("payment_method", "UPI"),
            ("date", "2024-05-14"),
        ];

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_text_contains("Description is required");
    }

    #[tokio::test]
    async fn backend_failure_returns_an_alert() {
        let app = Router::new().route(
            "/transactions/",
            post(|| async {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(serde_json::json!({"message": "boom"})),
                )
            }),
        );
        let base_url = spawn_stub_backend(app).await;
        let server = get_test_server(&base_url);
        let form = [
            ("amount", "-450.5"),
            ("category", "Food"),
            ("description", "Groceries"),
            ("payment_method", "UPI"),
            ("date", "2024-05-14"),
        ];

        let response = server.post(endpoints::TRANSACTIONS_API).form(&form).await;

        response.assert_status(StatusCode::BAD_GATEWAY);
        response.assert_text_contains("boom");
    }
}
