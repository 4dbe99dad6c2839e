//! The client for the backend API.
//!
//! All persistence, authentication, and AI computation live behind an
//! external HTTP service. This module owns the typed client for that
//! service: the request plumbing, the entity models, and the lenient
//! timestamp parsing the backend's responses require.
//!
//! The session token is an explicit value ([ApiToken]) passed into every
//! authenticated call rather than ambient state, so handlers and tests can
//! choose exactly which session a request runs under.

mod client;
mod models;
pub(crate) mod timestamp;

pub use client::ApiClient;
pub(crate) use models::{
    Account, AiAnalysis, Budget, ChatMessage, NewAccount, NewBudget, NewTransaction, NewUser,
    SavingsGoal, TokenResponse, Transaction, UserProfile,
};

/// A bearer token issued by the backend API at sign-in.
///
/// Cloning is cheap enough for the request extension machinery, which clones
/// the token once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiToken(pub String);

impl ApiToken {
    /// The token as the string to place in the `Authorization` header.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The backend API paths, matching the collaborator's route table.
pub(crate) mod paths {
    /// Register a new user.
    pub const USERS: &str = "/users/";
    /// Exchange credentials for a bearer token (OAuth2 password flow).
    pub const TOKEN: &str = "/token";
    /// The current user's profile.
    pub const ME: &str = "/users/me";
    /// The signed-in user's bank accounts.
    pub const ACCOUNTS: &str = "/accounts/";
    /// The signed-in user's budgets.
    pub const BUDGETS: &str = "/budgets/";
    /// The signed-in user's transactions.
    pub const TRANSACTIONS: &str = "/transactions/";
    /// The signed-in user's savings goals.
    pub const SAVINGS_GOALS: &str = "/savings-goals/";
    /// AI analyses (list and generate).
    pub const AI_ANALYSIS: &str = "/ai-analysis/";
    /// Chat with the AI assistant (history and send).
    pub const CHAT: &str = "/chat/";
}
