//! This file defines the routes for displaying the sign-in page and handling sign-in requests.
//! The backend API verifies the credentials and issues the bearer token.

use axum::{
    Form,
    extract::{FromRef, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{
    AppState, Error,
    api::ApiClient,
    auth::{Session, invalidate_session_cookie, normalize_redirect_url, set_session_cookie},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, auth_card, base, labelled_input, loading_spinner},
};

fn sign_in_form(email: &str, error_message: Option<&str>, redirect_url: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::SIGN_IN_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            @if let Some(redirect_url) = redirect_url {
                input type="hidden" name="redirect_url" value=(redirect_url);
            }

            (labelled_input("email", "email", "Email", email, None))
            (labelled_input("password", "password", "Password", "", error_message))

            div class="flex items-center gap-x-3"
            {
                input
                    type="checkbox"
                    name="remember_me"
                    id="remember_me"
                    tabindex="0"
                    class="rounded-xs";

                label
                    for="remember_me"
                    class="block text-sm font-medium text-gray-900 dark:text-white"
                {
                    "Keep me signed in for one week"
                }
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Sign in"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Don't have an account? "
                a
                    href=(endpoints::SIGN_UP_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Sign up here"
                }
            }
        }
    }
}

fn parse_redirect_url(raw_url: Option<&str>, source: &str) -> Option<String> {
    match raw_url.and_then(|url| normalize_redirect_url(url)) {
        Some(redirect_url) => Some(redirect_url),
        None => {
            if let Some(redirect_url) = raw_url {
                tracing::warn!("Invalid redirect URL from {source}: {redirect_url}");
            }
            None
        }
    }
}

/// Display the sign-in page.
pub async fn get_sign_in_page(Query(query): Query<RedirectQuery>) -> Response {
    let redirect_url = parse_redirect_url(query.redirect_url.as_deref(), "sign-in query");
    let sign_in_form = sign_in_form("", None, redirect_url.as_deref());
    let content = auth_card("Sign in to your account", &sign_in_form);
    base("Sign In", &[], &content).into_response()
}

/// How long the session should last if the user selects "remember me" at sign-in.
const REMEMBER_ME_SESSION_DURATION: Duration = Duration::days(7);

pub const INVALID_CREDENTIALS_ERROR_MSG: &str = "Invalid email or password.";

/// The state needed to perform a sign-in.
#[derive(Debug, Clone)]
pub struct SignInState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,
    /// The client for the backend API.
    pub api: ApiClient,
}

impl FromRef<AppState> for SignInState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
            cookie_duration: state.cookie_duration,
            api: state.api.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<SignInState> for Key {
    fn from_ref(state: &SignInState) -> Self {
        state.cookie_key.clone()
    }
}

/// Handler for sign-in requests via the POST method.
///
/// On a successful sign-in the backend's bearer token is stored in the
/// session cookie and the client is redirected to the dashboard page.
/// Otherwise, the form is returned with an error message explaining the
/// problem.
pub async fn post_sign_in(
    State(state): State<SignInState>,
    jar: PrivateCookieJar,
    Form(user_data): Form<SignInData>,
) -> Response {
    let redirect_url = parse_redirect_url(user_data.redirect_url.as_deref(), "sign-in form");
    let redirect_url = redirect_url.as_deref();

    let token = match state.api.sign_in(&user_data.email, &user_data.password).await {
        Ok(token) => token,
        Err(Error::Api { status, .. }) if (400..500).contains(&status) => {
            return sign_in_form(
                &user_data.email,
                Some(INVALID_CREDENTIALS_ERROR_MSG),
                redirect_url,
            )
            .into_response();
        }
        Err(error) => {
            tracing::error!("Unhandled error while signing in: {error}");
            return sign_in_form(
                &user_data.email,
                Some("An internal error occurred. Please try again later."),
                redirect_url,
            )
            .into_response();
        }
    };

    let session_duration = if user_data.remember_me.is_some() {
        REMEMBER_ME_SESSION_DURATION
    } else {
        state.cookie_duration
    };
    let session = Session {
        access_token: token.access_token,
        expires_at: OffsetDateTime::now_utc() + session_duration,
    };

    let redirect_url = redirect_url.unwrap_or(endpoints::DASHBOARD_VIEW);

    set_session_cookie(jar.clone(), &session)
        .map(|updated_jar| {
            (
                StatusCode::SEE_OTHER,
                HxRedirect(redirect_url.to_owned()),
                updated_jar,
            )
        })
        .map_err(|err| {
            tracing::error!("Error setting session cookie: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                HxRedirect(endpoints::INTERNAL_ERROR_VIEW.to_owned()),
                invalidate_session_cookie(jar),
            )
        })
        .into_response()
}

#[derive(Deserialize)]
pub struct RedirectQuery {
    pub redirect_url: Option<String>,
}

/// The raw data entered by the user in the sign-in form.
///
/// The credentials are passed through to the backend as-is; the backend is
/// the authority on whether they are valid.
#[derive(Clone, Serialize, Deserialize)]
pub struct SignInData {
    /// The email address the user registered with.
    pub email: String,

    /// Password entered during sign-in.
    pub password: String,

    /// Whether to extend the initial session duration.
    ///
    /// This value comes from a checkbox, so it either has a string value or is not set
    /// (see the [MDN docs](https://developer.mozilla.org/en-US/docs/Web/HTML/Element/input/checkbox#value_2)).
    /// The `Some` variant should be interpreted as `true` irregardless of the
    /// string value, and the `None` variant should be interpreted as `false`.
    pub remember_me: Option<String>,

    /// Optional URL to redirect to after signing in.
    /// Only accepted from the sign-in form submission.
    pub redirect_url: Option<String>,
}
