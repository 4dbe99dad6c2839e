//! The entity models exchanged with the backend API.
//!
//! These mirror the backend's response and request schemas. Numeric fields
//! default to zero when the backend omits them, mirroring the behaviour of
//! the web clients this backend was built for.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::api::timestamp;

/// A bank account linked by the user.
///
/// Accounts are only used as a fallback income source on the dashboard and
/// for display on the accounts page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Account {
    /// The backend's identifier for this account.
    pub account_id: i64,
    /// The account number as entered by the user.
    pub account_number: String,
    /// The current balance of the account.
    #[serde(default)]
    pub current_balance: f64,
    /// When the account was linked.
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A spending budget.
///
/// Multiple budget records may exist; the record with the latest
/// `created_at` is the active one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Budget {
    /// The backend's identifier for this budget.
    pub budget_id: i64,
    /// The budget amount for the covered period.
    #[serde(default)]
    pub monthly_budget: f64,
    /// The first instant the budget covers.
    #[serde(default, with = "timestamp::option")]
    pub start_date: Option<OffsetDateTime>,
    /// The last instant the budget covers.
    #[serde(default, with = "timestamp::option")]
    pub end_date: Option<OffsetDateTime>,
    /// When the budget record was created. Records without a timestamp sort
    /// as oldest when selecting the active budget.
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A single income or expense record.
///
/// The sign of `amount` carries the meaning: positive amounts are income,
/// negative amounts are expenses. There is no status field, transactions are
/// final once recorded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Transaction {
    /// The backend's identifier for this transaction.
    pub transaction_id: i64,
    /// The signed amount (positive = income, negative = expense).
    #[serde(default)]
    pub amount: f64,
    /// A free-text category label, e.g. "Food".
    pub category: String,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction occurred.
    #[serde(with = "timestamp")]
    pub date: OffsetDateTime,
    /// How the transaction was paid, e.g. "UPI".
    pub payment_method: String,
}

/// A savings goal with a target and current progress.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SavingsGoal {
    /// The backend's identifier for this goal.
    pub goal_id: i64,
    /// The user's name for the goal.
    pub goal_name: String,
    /// The amount the user is saving towards.
    #[serde(default)]
    pub target_amount: f64,
    /// The amount saved so far.
    #[serde(default)]
    pub current_amount: f64,
    /// When the user wants to reach the target.
    #[serde(default, with = "timestamp::option")]
    pub deadline: Option<OffsetDateTime>,
}

/// A stored AI analysis generated by the backend.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AiAnalysis {
    /// The backend's identifier for this analysis.
    pub analysis_id: i64,
    /// The kind of analysis, e.g. "general" or "budget".
    pub analysis_type: String,
    /// The generated analysis text.
    pub result: String,
    /// When the analysis was generated.
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<OffsetDateTime>,
}

/// A single message in the AI chat, from either side of the conversation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatMessage {
    /// The backend's identifier for this message.
    #[serde(default)]
    pub message_id: i64,
    /// 1 when the user sent the message, 0 when the assistant replied.
    #[serde(default)]
    pub is_user: i64,
    /// The message text.
    pub content: String,
    /// When the message was recorded.
    #[serde(default, with = "timestamp::option")]
    pub created_at: Option<OffsetDateTime>,
}

impl ChatMessage {
    /// Whether the message was sent by the user (as opposed to the assistant).
    pub fn is_from_user(&self) -> bool {
        self.is_user != 0
    }
}

/// The signed-in user's profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    /// The backend's identifier for the user.
    pub user_id: i64,
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
}

/// The bearer token issued at sign-in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TokenResponse {
    /// The opaque bearer token.
    pub access_token: String,
    /// The token type, always "bearer" for this backend.
    pub token_type: String,
}

/// The request body for registering a new user.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    /// The user's display name.
    pub name: String,
    /// The user's email address.
    pub email: String,
    /// The user's chosen password, sent in the clear over TLS.
    pub password: String,
}

/// The request body for linking a bank account.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    /// The account number as entered by the user.
    pub account_number: String,
    /// The starting balance. Linking always starts at zero.
    pub current_balance: f64,
}

/// The request body for creating a budget record.
#[derive(Debug, Clone, Serialize)]
pub struct NewBudget {
    /// The budget amount for the covered period.
    pub monthly_budget: f64,
    /// The first instant the budget covers.
    #[serde(with = "timestamp")]
    pub start_date: OffsetDateTime,
    /// The last instant the budget covers.
    #[serde(with = "timestamp")]
    pub end_date: OffsetDateTime,
}

/// The request body for recording a transaction.
#[derive(Debug, Clone, Serialize)]
pub struct NewTransaction {
    /// The signed amount (positive = income, negative = expense).
    pub amount: f64,
    /// A free-text category label.
    pub category: String,
    /// What the transaction was for.
    pub description: String,
    /// When the transaction occurred.
    #[serde(with = "timestamp")]
    pub date: OffsetDateTime,
    /// How the transaction was paid.
    pub payment_method: String,
}

#[cfg(test)]
mod model_tests {
    use time::macros::datetime;

    use super::{Budget, ChatMessage, Transaction};

    #[test]
    fn transaction_deserialises_naive_timestamp() {
        let json = r#"{
            "transaction_id": 3,
            "amount": -450.5,
            "category": "Food",
            "description": "Groceries",
            "date": "2024-05-14T00:00:00",
            "payment_method": "UPI"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.amount, -450.5);
        assert_eq!(transaction.date, datetime!(2024-05-14 00:00:00).assume_utc());
    }

    #[test]
    fn transaction_missing_amount_defaults_to_zero() {
        let json = r#"{
            "transaction_id": 3,
            "category": "Food",
            "description": "Groceries",
            "date": "2024-05-14T00:00:00",
            "payment_method": "Cash"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.amount, 0.0);
    }

    #[test]
    fn budget_tolerates_missing_created_at() {
        let json = r#"{"budget_id": 1, "monthly_budget": 40000.0}"#;

        let budget: Budget = serde_json::from_str(json).unwrap();

        assert_eq!(budget.monthly_budget, 40000.0);
        assert_eq!(budget.created_at, None);
    }

    #[test]
    fn chat_message_sender() {
        let user_message: ChatMessage =
            serde_json::from_str(r#"{"message_id": 1, "is_user": 1, "content": "hi"}"#).unwrap();
        let assistant_message: ChatMessage =
            serde_json::from_str(r#"{"message_id": 2, "is_user": 0, "content": "hello"}"#).unwrap();

        assert!(user_message.is_from_user());
        assert!(!assistant_message.is_from_user());
    }
}
