//! The HTTP client for the backend API.
//!
//! One [ApiClient] is created at start-up and shared by all handlers. The
//! underlying `reqwest::Client` pools connections, so cloning the wrapper is
//! cheap.

use reqwest::{RequestBuilder, Response};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    Error,
    api::{
        ApiToken, paths,
        models::{
            Account, AiAnalysis, Budget, ChatMessage, NewAccount, NewBudget, NewTransaction,
            NewUser, SavingsGoal, TokenResponse, Transaction, UserProfile,
        },
    },
};

/// A typed client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

/// The error body shape the backend uses. Registration errors use `detail`
/// (FastAPI's default), everything else uses `message`.
#[derive(Deserialize)]
struct ApiErrorBody {
    detail: Option<String>,
    message: Option<String>,
}

impl ApiClient {
    /// Create a client for the backend API at `base_url`,
    /// e.g. "http://localhost:8000".
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send `request` and deserialize the success response, mapping
    /// non-success responses to [Error::Api].
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        let response = request.send().await?;
        let response = error_for_status(response).await?;

        Ok(response.json().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &ApiToken) -> Result<T, Error> {
        self.send(self.http.get(self.url(path)).bearer_auth(token.as_str()))
            .await
    }

    /// Register a new user. This is the only call besides [Self::sign_in]
    /// that does not require a token.
    pub async fn register(&self, new_user: &NewUser) -> Result<UserProfile, Error> {
        self.send(self.http.post(self.url(paths::USERS)).json(new_user))
            .await
    }

    /// Exchange credentials for a bearer token.
    ///
    /// The backend implements the OAuth2 password flow, which expects a
    /// form-encoded body with a `username` field even though users sign in
    /// with their email address.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<TokenResponse, Error> {
        let form = [("username", email), ("password", password)];

        self.send(self.http.post(self.url(paths::TOKEN)).form(&form))
            .await
    }

    /// Get the signed-in user's profile.
    pub async fn current_user(&self, token: &ApiToken) -> Result<UserProfile, Error> {
        self.get(paths::ME, token).await
    }

    /// Get all bank accounts linked by the signed-in user.
    pub async fn accounts(&self, token: &ApiToken) -> Result<Vec<Account>, Error> {
        self.get(paths::ACCOUNTS, token).await
    }

    /// Link a new bank account.
    pub async fn create_account(
        &self,
        token: &ApiToken,
        new_account: &NewAccount,
    ) -> Result<Account, Error> {
        self.send(
            self.http
                .post(self.url(paths::ACCOUNTS))
                .bearer_auth(token.as_str())
                .json(new_account),
        )
        .await
    }

    /// Get all budget records for the signed-in user.
    pub async fn budgets(&self, token: &ApiToken) -> Result<Vec<Budget>, Error> {
        self.get(paths::BUDGETS, token).await
    }

    /// Create a new budget record. The dashboard treats the most recently
    /// created record as the active budget.
    pub async fn create_budget(
        &self,
        token: &ApiToken,
        new_budget: &NewBudget,
    ) -> Result<Budget, Error> {
        self.send(
            self.http
                .post(self.url(paths::BUDGETS))
                .bearer_auth(token.as_str())
                .json(new_budget),
        )
        .await
    }

    /// Get all transactions for the signed-in user.
    pub async fn transactions(&self, token: &ApiToken) -> Result<Vec<Transaction>, Error> {
        self.get(paths::TRANSACTIONS, token).await
    }

    /// Record a new transaction.
    pub async fn create_transaction(
        &self,
        token: &ApiToken,
        new_transaction: &NewTransaction,
    ) -> Result<Transaction, Error> {
        self.send(
            self.http
                .post(self.url(paths::TRANSACTIONS))
                .bearer_auth(token.as_str())
                .json(new_transaction),
        )
        .await
    }

    /// Get all savings goals for the signed-in user.
    pub async fn savings_goals(&self, token: &ApiToken) -> Result<Vec<SavingsGoal>, Error> {
        self.get(paths::SAVINGS_GOALS, token).await
    }

    /// Get all previously generated AI analyses, newest first as returned by
    /// the backend.
    pub async fn analyses(&self, token: &ApiToken) -> Result<Vec<AiAnalysis>, Error> {
        self.get(paths::AI_ANALYSIS, token).await
    }

    /// Ask the backend to generate a new AI analysis of the given type,
    /// e.g. "general" or "budget".
    pub async fn generate_analysis(
        &self,
        token: &ApiToken,
        analysis_type: &str,
    ) -> Result<AiAnalysis, Error> {
        self.send(
            self.http
                .post(self.url(paths::AI_ANALYSIS))
                .query(&[("analysis_type", analysis_type)])
                .bearer_auth(token.as_str()),
        )
        .await
    }

    /// Get the chat history for the signed-in user, oldest first.
    pub async fn chat_history(&self, token: &ApiToken) -> Result<Vec<ChatMessage>, Error> {
        self.get(paths::CHAT, token).await
    }

    /// Send a chat message to the AI assistant and get its reply.
    pub async fn send_chat_message(
        &self,
        token: &ApiToken,
        content: &str,
    ) -> Result<ChatMessage, Error> {
        self.send(
            self.http
                .post(self.url(paths::CHAT))
                .bearer_auth(token.as_str())
                .json(&serde_json::json!({ "content": content })),
        )
        .await
    }
}

/// Map a non-success response to [Error::Api], preferring the error text the
/// backend put in the response body.
async fn error_for_status(response: Response) -> Result<Response, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status
        .canonical_reason()
        .unwrap_or("An unknown error occurred")
        .to_owned();
    let message = match response.json::<ApiErrorBody>().await {
        Ok(body) => body.detail.or(body.message).unwrap_or(fallback),
        Err(_) => fallback,
    };

    Err(Error::Api {
        status: status.as_u16(),
        message,
    })
}
