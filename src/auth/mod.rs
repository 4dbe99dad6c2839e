//! Session handling and the sign-in, sign-up, and log-out flows.
//!
//! The backend API owns credentials and issues bearer tokens; this module
//! only stores the issued token in an encrypted, signed private cookie and
//! puts it back into each request as an explicit [crate::api::ApiToken]
//! extension for handlers to use.

mod cookie;
mod log_out;
mod middleware;
mod redirect;
mod session;
mod sign_in;
mod sign_up;

pub use cookie::{DEFAULT_SESSION_DURATION, invalidate_session_cookie, set_session_cookie};
pub use log_out::get_log_out;
pub use middleware::{auth_guard, auth_guard_hx};
pub use sign_in::{get_sign_in_page, post_sign_in};
pub use sign_up::{get_sign_up_page, post_sign_up};

pub(crate) use redirect::{build_sign_in_redirect_url, normalize_redirect_url};
pub(crate) use session::Session;

#[cfg(test)]
pub(crate) use cookie::COOKIE_SESSION;

#[cfg(test)]
pub(crate) use middleware::AuthState;
