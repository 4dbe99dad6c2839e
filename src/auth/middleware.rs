//! Authentication middleware that validates the session cookie, extends the
//! session, and redirects signed-out users to the sign-in page.

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::{StatusCode, header::SET_COOKIE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::{PrivateCookieJar, cookie::Key};
use axum_htmx::HxRedirect;
use time::Duration;

use crate::{
    AppState,
    api::ApiToken,
    auth::{
        build_sign_in_redirect_url,
        cookie::{extend_session_duration_if_needed, get_session_from_cookies},
        redirect::build_sign_in_redirect_url_from_target,
    },
    endpoints,
};

/// How much runway a session is topped up to on every authenticated request.
const SESSION_EXTENSION: Duration = Duration::minutes(5);

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            cookie_key: state.cookie_key.clone(),
        }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AuthState> for Key {
    fn from_ref(state: &AuthState) -> Self {
        state.cookie_key.clone()
    }
}

/// Middleware function that checks for a valid session cookie.
/// The backend bearer token is placed into the request and then the request
/// executed normally if the session is valid, otherwise a redirect to the
/// sign-in page is returned using `get_redirect`.
///
/// **Note**: Route handlers can use the function argument
/// `Extension(token): Extension<ApiToken>` to receive the bearer token.
#[inline]
async fn auth_guard_internal(
    state: AuthState,
    request: Request,
    next: Next,
    get_redirect: impl Fn(&str) -> Response,
) -> Response {
    let sign_in_redirect_url = build_sign_in_redirect_url(&request).unwrap_or_else(|| {
        if request.uri().path().starts_with("/api") {
            tracing::warn!(
                "Missing or invalid HTMX headers for /api request. Falling back to dashboard."
            );
        } else {
            tracing::warn!("Invalid redirect URL from request URI. Falling back to dashboard.");
        }

        build_sign_in_redirect_url_from_target(endpoints::DASHBOARD_VIEW)
            .unwrap_or_else(|| endpoints::SIGN_IN_VIEW.to_owned())
    });

    let (mut parts, body) = request.into_parts();
    let jar = match PrivateCookieJar::from_request_parts(&mut parts, &state).await {
        Ok(jar) => jar,
        Err(err) => {
            tracing::error!("Error getting cookie jar: {err:?}. Redirecting to sign-in page.");
            return get_redirect(&sign_in_redirect_url);
        }
    };
    let session = match get_session_from_cookies(&jar) {
        Ok(session) => session,
        Err(_) => return get_redirect(&sign_in_redirect_url),
    };

    parts.extensions.insert(ApiToken(session.access_token));
    let request = Request::from_parts(parts, body);
    let response = next.run(request).await;

    let (mut parts, body) = response.into_parts();
    let jar = match extend_session_duration_if_needed(jar.clone(), SESSION_EXTENSION) {
        Ok(updated_jar) => updated_jar,
        Err(err) => {
            tracing::error!("Error extending session duration: {err:?}. Rolling back cookie jar.");
            jar
        }
    };
    for (key, val) in jar.into_response().headers().iter() {
        if key != SET_COOKIE {
            continue;
        }

        parts.headers.append(key, val.to_owned());
    }

    Response::from_parts(parts, body)
}

/// Middleware function that checks for a valid session cookie.
/// The backend bearer token is placed into the request and then the request
/// executed normally if the session is valid, otherwise a redirect to the
/// sign-in page is returned.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        Redirect::to(redirect_url).into_response()
    })
    .await
}

/// Middleware function that checks for a valid session cookie.
/// The backend bearer token is placed into the request and then the request
/// executed normally if the session is valid, otherwise an HTMX redirect to
/// the sign-in page is returned.
pub async fn auth_guard_hx(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    auth_guard_internal(state, request, next, |redirect_url| {
        (HxRedirect(redirect_url.to_owned()), StatusCode::OK).into_response()
    })
    .await
}

#[cfg(test)]
mod auth_guard_tests {
    use axum::{
        Extension, Router,
        middleware,
        response::Html,
        routing::{get, post},
    };
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };
    use axum_test::TestServer;
    use sha2::Digest;
    use time::{Duration, OffsetDateTime};

    use crate::{
        api::ApiToken,
        auth::{AuthState, COOKIE_SESSION, Session, auth_guard, auth_guard_hx, set_session_cookie},
        endpoints,
    };

    async fn protected_handler(Extension(token): Extension<ApiToken>) -> Html<String> {
        Html(format!("<h1>token: {}</h1>", token.as_str()))
    }

    async fn stub_sign_in_route(jar: PrivateCookieJar) -> PrivateCookieJar {
        let session = Session {
            access_token: "stub-token".to_owned(),
            expires_at: OffsetDateTime::now_utc() + Duration::minutes(30),
        };

        set_session_cookie(jar, &session).expect("could not set session cookie")
    }

    const TEST_SIGN_IN_ROUTE: &str = "/stub_sign_in";
    const TEST_PROTECTED_ROUTE: &str = "/protected";
    const TEST_API_ROUTE: &str = "/api/protected";

    fn get_test_state() -> AuthState {
        let hash = sha2::Sha512::digest("nafstenoas");
        AuthState {
            cookie_key: Key::from(&hash),
        }
    }

    fn get_test_server() -> TestServer {
        let state = get_test_state();

        let app = Router::new()
            .route(TEST_PROTECTED_ROUTE, get(protected_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard))
            .route(TEST_SIGN_IN_ROUTE, post(stub_sign_in_route))
            .with_state(state.clone());

        TestServer::new(app)
    }

    fn get_test_server_hx() -> TestServer {
        let state = get_test_state();

        let app = Router::new()
            .route(TEST_API_ROUTE, get(protected_handler))
            .route_layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx))
            .with_state(state.clone());

        TestServer::new(app)
    }

    #[tokio::test]
    async fn get_protected_route_with_valid_session() {
        let server = get_test_server();
        let response = server.post(TEST_SIGN_IN_ROUTE).await;

        response.assert_status_ok();
        let session_cookie = response.cookie(COOKIE_SESSION);

        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(session_cookie)
            .await;

        response.assert_status_ok();
        // The bearer token from the session is handed to the route handler.
        response.assert_text_contains("stub-token");
    }

    #[tokio::test]
    async fn auth_guard_refreshes_session_cookie() {
        let server = get_test_server();
        let response = server.post(TEST_SIGN_IN_ROUTE).await;

        response.assert_status_ok();
        let jar = response.cookies();

        let response = server.get(TEST_PROTECTED_ROUTE).add_cookies(jar).await;
        let jar = response.cookies();
        assert!(
            jar.get(COOKIE_SESSION).is_some(),
            "expected session cookie to be set by auth guard"
        );
    }

    #[tokio::test]
    async fn get_protected_route_with_no_session_redirects_to_sign_in() {
        let server = get_test_server();
        let response = server.get(TEST_PROTECTED_ROUTE).await;

        response.assert_status_see_other();
        let expected_query =
            serde_urlencoded::to_string([("redirect_url", TEST_PROTECTED_ROUTE)]).unwrap();
        let expected_location = format!("{}?{}", endpoints::SIGN_IN_VIEW, expected_query);
        assert_eq!(response.header("location"), expected_location);
    }

    #[tokio::test]
    async fn get_protected_route_with_garbage_cookie_redirects_to_sign_in() {
        let server = get_test_server();
        let response = server
            .get(TEST_PROTECTED_ROUTE)
            .add_cookie(Cookie::build((COOKIE_SESSION, "FOOBAR")).build())
            .await;

        response.assert_status_see_other();
        let expected_query =
            serde_urlencoded::to_string([("redirect_url", TEST_PROTECTED_ROUTE)]).unwrap();
        let expected_location = format!("{}?{}", endpoints::SIGN_IN_VIEW, expected_query);
        assert_eq!(response.header("location"), expected_location);
    }

    #[tokio::test]
    async fn api_route_uses_hx_current_url_for_redirect() {
        let server = get_test_server_hx();
        let current_url = "/transactions?page=2";
        let response = server
            .get(TEST_API_ROUTE)
            .add_header("HX-Request", "true")
            .add_header("HX-Current-URL", current_url)
            .await;

        response.assert_status_ok();
        let expected_query = serde_urlencoded::to_string([("redirect_url", current_url)]).unwrap();
        let expected_location = format!("{}?{}", endpoints::SIGN_IN_VIEW, expected_query);
        assert_eq!(response.header("hx-redirect"), expected_location);
    }
}
