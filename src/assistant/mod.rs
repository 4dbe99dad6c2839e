//! The AI-backed assistant features: analysis generation and chat.
//!
//! Both features are thin wrappers over the backend: the backend stores the
//! history and talks to the AI model; this module renders the results and
//! filters out the placeholder messages the backend stores when its AI
//! integration is unavailable.

mod analysis;
mod chat;

pub use analysis::{generate_analysis_endpoint, get_analysis_page};
pub use chat::{get_chat_page, send_chat_message_endpoint};
