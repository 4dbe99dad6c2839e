//! The URIs served by this application.
//!
//! These are the front end's own routes. The backend API paths live in
//! [crate::api] since they belong to the external collaborator.

/// The root route which redirects to the dashboard or sign-in page.
pub const ROOT: &str = "/";
/// The landing page for signed-in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The page for displaying a user's transactions.
pub const TRANSACTIONS_VIEW: &str = "/transactions";
/// The page for recording a new transaction.
pub const NEW_TRANSACTION_VIEW: &str = "/transactions/new";
/// The page for listing and linking bank accounts.
pub const ACCOUNTS_VIEW: &str = "/accounts";
/// The page for generating and reviewing AI analyses.
pub const ANALYSIS_VIEW: &str = "/analysis";
/// The page for chatting with the AI assistant.
pub const CHAT_VIEW: &str = "/chat";
/// The route for getting the sign-in page.
pub const SIGN_IN_VIEW: &str = "/sign_in";
/// The route for getting the sign-up page.
pub const SIGN_UP_VIEW: &str = "/sign_up";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route to request a cup of coffee (experimental).
pub const COFFEE: &str = "/api/coffee";
/// The route for signing in a user.
pub const SIGN_IN_API: &str = "/api/sign_in";
/// The route for signing up a new user.
pub const SIGN_UP_API: &str = "/api/sign_up";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to record a transaction.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route to link a bank account.
pub const ACCOUNTS_API: &str = "/api/accounts";
/// The route to set a budget.
pub const BUDGETS_API: &str = "/api/budgets";
/// The route to generate an AI analysis.
pub const ANALYSIS_API: &str = "/api/analysis";
/// The route to send a chat message to the AI assistant.
pub const CHAT_API: &str = "/api/chat";
