//! The sign-up page and registration endpoint.
//!
//! Registration is delegated to the backend API; this module only validates
//! that the form is coherent (matching passwords, nothing blank) before
//! forwarding it.

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    api::{ApiClient, NewUser},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, auth_card, base, labelled_input, loading_spinner},
};

/// The state needed to register a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            api: state.api.clone(),
        }
    }
}

/// The raw data entered by the user in the sign-up form.
#[derive(Clone, Deserialize)]
pub struct SignUpData {
    /// The user's display name.
    pub name: String,
    /// The email address to register.
    pub email: String,
    /// The chosen password.
    pub password: String,
    /// The password again, to catch typos.
    pub confirm_password: String,
}

struct SignUpFormErrors<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

impl Default for SignUpFormErrors<'_> {
    fn default() -> Self {
        Self {
            name: None,
            email: None,
            password: None,
            confirm_password: None,
        }
    }
}

fn sign_up_form(name: &str, email: &str, errors: &SignUpFormErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_UP_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #email, #password, #confirm_password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("text", "name", "Name", name, errors.name))
            (labelled_input("email", "email", "Email", email, errors.email))
            (labelled_input("password", "password", "Password", "", errors.password))
            (labelled_input(
                "password",
                "confirm_password",
                "Confirm password",
                "",
                errors.confirm_password,
            ))

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Already have an account? "
                a
                    href=(endpoints::SIGN_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Sign in here"
                }
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let form = sign_up_form("", "", &SignUpFormErrors::default());
    let content = auth_card("Create your account", &form);
    base("Sign Up", &[], &content).into_response()
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the sign-in page. Validation
/// failures and backend rejections re-render the form with an error message
/// next to the offending field.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    Form(user_data): Form<SignUpData>,
) -> Response {
    let mut errors = SignUpFormErrors::default();

    if user_data.name.trim().is_empty() {
        errors.name = Some("Name is required");
    }
    if user_data.email.trim().is_empty() {
        errors.email = Some("Email is required");
    }
    if user_data.password.is_empty() {
        errors.password = Some("Password is required");
    } else if user_data.password != user_data.confirm_password {
        errors.confirm_password = Some("Passwords do not match");
    }

    if errors.name.is_some()
        || errors.email.is_some()
        || errors.password.is_some()
        || errors.confirm_password.is_some()
    {
        return sign_up_form(&user_data.name, &user_data.email, &errors).into_response();
    }

    let new_user = NewUser {
        name: user_data.name.trim().to_owned(),
        email: user_data.email.trim().to_owned(),
        password: user_data.password.clone(),
    };

    match state.api.register(&new_user).await {
        Ok(_) => (
            HxRedirect(endpoints::SIGN_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::Api { status, message }) if (400..500).contains(&status) => {
            // e.g. "Email already registered"
            errors.email = Some(&message);
            sign_up_form(&user_data.name, &user_data.email, &errors).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while registering: {error}");
            errors.email = Some("An internal error occurred. Please try again later.");
            sign_up_form(&user_data.name, &user_data.email, &errors).into_response()
        }
    }
}

#[cfg(test)]
mod sign_up_tests {
    use axum::{
        Json, Router,
        http::StatusCode,
        routing::post,
    };
    use axum_htmx::HX_REDIRECT;
    use axum_test::TestServer;

    use crate::{api::ApiClient, endpoints, test_utils::spawn_stub_backend};

    use super::{SignUpState, post_sign_up};

    async fn stub_backend_url() -> String {
        let app = Router::new().route(
            "/users/",
            post(|Json(body): Json<serde_json::Value>| async move {
                if body["email"] == "taken@example.com" {
                    Err((
                        StatusCode::BAD_REQUEST,
                        Json(serde_json::json!({"detail": "Email already registered"})),
                    ))
                } else {
                    Ok(Json(serde_json::json!({
                        "user_id": 1,
                        "name": body["name"],
                        "email": body["email"],
                        "is_active": true,
                        "created_at": "2024-05-01T00:00:00"
                    })))
                }
            }),
        );

        spawn_stub_backend(app).await
    }

    async fn get_test_server() -> TestServer {
        let state = SignUpState {
            api: ApiClient::new(&stub_backend_url().await),
        };
        let app = Router::new()
            .route(endpoints::SIGN_UP_API, post(post_sign_up))
            .with_state(state);

        TestServer::new(app)
    }

    #[tokio::test]
    async fn sign_up_redirects_to_sign_in_on_success() {
        let server = get_test_server().await;
        let form = [
            ("name", "Test User"),
            ("email", "test@example.com"),
            ("password", "hunter2"),
            ("confirm_password", "hunter2"),
        ];

        let response = server.post(endpoints::SIGN_UP_API).form(&form).await;

        assert_eq!(response.status_code(), StatusCode::SEE_OTHER);
        assert_eq!(response.header(HX_REDIRECT), endpoints::SIGN_IN_VIEW);
    }

    #[tokio::test]
    async fn sign_up_rejects_mismatched_passwords_without_calling_backend() {
        let server = get_test_server().await;
        let form = [
            ("name", "Test User"),
            ("email", "test@example.com"),
            ("password", "hunter2"),
            ("confirm_password", "hunter3"),
        ];

        let response = server.post(endpoints::SIGN_UP_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Passwords do not match");
    }

    #[tokio::test]
    async fn sign_up_surfaces_backend_rejection() {
        let server = get_test_server().await;
        let form = [
            ("name", "Test User"),
            ("email", "taken@example.com"),
            ("password", "hunter2"),
            ("confirm_password", "hunter2"),
        ];

        let response = server.post(endpoints::SIGN_UP_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Email already registered");
    }

    #[tokio::test]
    async fn sign_up_requires_all_fields() {
        let server = get_test_server().await;
        let form = [
            ("name", ""),
            ("email", ""),
            ("password", ""),
            ("confirm_password", ""),
        ];

        let response = server.post(endpoints::SIGN_UP_API).form(&form).await;

        response.assert_status_ok();
        response.assert_text_contains("Name is required");
        response.assert_text_contains("Email is required");
        response.assert_text_contains("Password is required");
    }
}
