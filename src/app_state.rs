//! Implements a struct that holds the state of the web server.

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{api::ApiClient, auth::DEFAULT_SESSION_DURATION};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// The duration for which session cookies are valid.
    pub cookie_duration: Duration,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The client for the backend API.
    pub api: ApiClient,

    /// The savings goal target to display when no goal defines one.
    pub default_savings_target: f64,
}

impl AppState {
    /// Create a new [AppState] with a client for the backend API at
    /// `api_base_url`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g.
    /// "Asia/Kolkata".
    pub fn new(
        api_base_url: &str,
        cookie_secret: &str,
        local_timezone: &str,
        default_savings_target: f64,
    ) -> Self {
        Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_SESSION_DURATION,
            local_timezone: local_timezone.to_owned(),
            api: ApiClient::new(api_base_url),
            default_savings_target,
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret` string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
