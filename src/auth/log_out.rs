//! The log-out endpoint.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::PrivateCookieJar;

use crate::{auth::invalidate_session_cookie, endpoints};

/// Invalidate the session cookie and redirect to the sign-in page.
///
/// The bearer token itself is not revoked; the backend expires it on its own
/// schedule. Dropping the cookie is what signs the browser out.
pub async fn get_log_out(jar: PrivateCookieJar) -> Response {
    let jar = invalidate_session_cookie(jar);

    (jar, Redirect::to(endpoints::SIGN_IN_VIEW)).into_response()
}
