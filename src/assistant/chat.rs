//! The chat page for talking to the AI assistant.
//!
//! Sending a message posts it to the backend, which stores both sides of the
//! conversation; the endpoint then re-fetches the history and swaps the
//! message list in place.

use axum::{
    Extension, Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    alert::AlertView,
    api::{ApiClient, ApiToken, ChatMessage},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, base},
    navigation::NavBar,
};

/// Message content the backend stores when its AI integration is
/// unavailable. These messages are hidden from the conversation.
const ERROR_PLACEHOLDERS: [&str; 3] = [
    "API key not configured",
    "Error processing message",
    "AI service unavailable",
];

/// The state needed for the chat page and endpoint.
#[derive(Debug, Clone)]
pub struct ChatState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for ChatState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

fn is_placeholder(content: &str) -> bool {
    ERROR_PLACEHOLDERS
        .iter()
        .any(|placeholder| content.contains(placeholder))
}

async fn fetch_conversation(
    api: &ApiClient,
    token: &ApiToken,
) -> Result<Vec<ChatMessage>, Error> {
    let mut messages = api.chat_history(token).await?;
    messages.retain(|message| !is_placeholder(&message.content));

    Ok(messages)
}

/// Display the chat page with the conversation so far.
pub async fn get_chat_page(
    State(state): State<ChatState>,
    Extension(token): Extension<ApiToken>,
) -> Result<Response, Error> {
    let nav_bar = NavBar::new(endpoints::CHAT_VIEW);

    let messages = fetch_conversation(&state.api, &token)
        .await
        .inspect_err(|error| tracing::error!("Could not fetch chat history: {error}"))?;

    Ok(chat_view(nav_bar, &messages).into_response())
}

fn message_bubble(message: &ChatMessage) -> Markup {
    let (row_style, bubble_style) = if message.is_from_user() {
        (
            "flex justify-end",
            "p-3 max-w-[80%] rounded-lg bg-blue-600 text-white",
        )
    } else {
        (
            "flex justify-start",
            "p-3 max-w-[80%] rounded-lg bg-white dark:bg-gray-800 border
             border-gray-200 dark:border-gray-700",
        )
    };

    html!(
        div class=(row_style) {
            div class=(bubble_style) {
                @for line in message.content.lines() {
                    @if !line.trim().is_empty() {
                        p class="text-sm" { (line) }
                    }
                }
            }
        }
    )
}

/// The message list fragment, also returned by the send endpoint for the
/// HTMX swap.
fn messages_view(messages: &[ChatMessage]) -> Markup {
    html!(
        @if messages.is_empty() {
            p class="text-sm text-gray-600 dark:text-gray-400" {
                "Ask the assistant anything about your finances."
            }
        }

        @for message in messages {
            (message_bubble(message))
        }
    )
}

fn chat_view(nav_bar: NavBar, messages: &[ChatMessage]) -> Markup {
    let nav_bar = nav_bar.into_html();

    let content = html!(
        (nav_bar)

        div class="flex flex-col px-2 lg:px-6 lg:py-8 mx-auto max-w-screen-md
            text-gray-900 dark:text-white"
        {
            h2 class="text-xl font-bold mb-4" { "Chat" }

            div
                id="chat-messages"
                class="flex flex-col gap-3 mb-4 min-h-[300px]"
            {
                (messages_view(messages))
            }

            form
                hx-post=(endpoints::CHAT_API)
                hx-target="#chat-messages"
                hx-swap="innerHTML"
                hx-target-error="#alert-container"
                hx-disabled-elt="#content, #send-button"
                class="flex gap-2"
            {
                input
                    type="text"
                    name="content"
                    id="content"
                    placeholder="Type your message..."
                    autocomplete="off"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);

                button
                    type="submit"
                    id="send-button"
                    class=(format!("{BUTTON_PRIMARY_STYLE} max-w-24"))
                {
                    "Send"
                }
            }
        }
    );

    base("Chat", &[], &content)
}

/// The form data for sending a chat message.
#[derive(Debug, Deserialize)]
pub struct ChatForm {
    /// The message text.
    pub content: String,
}

/// A route handler that sends a chat message and returns the refreshed
/// message list fragment.
pub async fn send_chat_message_endpoint(
    State(state): State<ChatState>,
    Extension(token): Extension<ApiToken>,
    Form(form): Form<ChatForm>,
) -> Response {
    let content = form.content.trim();
    if content.is_empty() {
        return AlertView::error("Empty Message", "Please type a message first")
            .into_response_with_status(StatusCode::BAD_REQUEST);
    }

    let reply = match state.api.send_chat_message(&token, content).await {
        Ok(reply) => reply,
        Err(error) => {
            tracing::error!("Could not send chat message: {error}");
            return error.into_alert_response();
        }
    };

    if is_placeholder(&reply.content) {
        return AlertView::error(
            "Assistant unavailable",
            "The AI service is not configured. Please contact support.",
        )
        .into_response_with_status(StatusCode::SERVICE_UNAVAILABLE);
    }

    match fetch_conversation(&state.api, &token).await {
        Ok(messages) => messages_view(&messages).into_response(),
        Err(error) => {
            tracing::error!("Could not refresh chat history: {error}");
            error.into_alert_response()
        }
    }
}
