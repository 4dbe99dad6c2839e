//! Defines functions for storing the session in a private cookie.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime};

use crate::{Error, auth::Session};

pub(crate) const COOKIE_SESSION: &str = "session";

/// The default duration for which session cookies are valid.
pub const DEFAULT_SESSION_DURATION: Duration = Duration::minutes(30);

/// Add the session cookie to the cookie jar, indicating that a user is
/// signed in.
///
/// The cookie's expiry is taken from `session.expires_at`.
///
/// Returns the cookie jar with the cookie added.
///
/// # Errors
///
/// Returns [Error::SessionEncoding] if the session cannot be serialized.
pub fn set_session_cookie(
    jar: PrivateCookieJar,
    session: &Session,
) -> Result<PrivateCookieJar, Error> {
    let value =
        serde_json::to_string(session).map_err(|error| Error::SessionEncoding(error.to_string()))?;

    Ok(jar.add(
        Cookie::build((COOKIE_SESSION, value))
            .expires(session.expires_at)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    ))
}

/// Set the session cookie to an invalid value and set its max age to zero,
/// which should delete the cookie on the client side.
pub fn invalidate_session_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.add(
        Cookie::build((COOKIE_SESSION, "deleted"))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true),
    )
}

/// Get the session from the cookie jar.
///
/// # Errors
///
/// - [Error::SessionMissing] if there is no session cookie.
/// - [Error::SessionInvalid] if the cookie cannot be parsed or the session
///   has expired.
pub(crate) fn get_session_from_cookies(jar: &PrivateCookieJar) -> Result<Session, Error> {
    let cookie = jar.get(COOKIE_SESSION).ok_or(Error::SessionMissing)?;
    let session: Session =
        serde_json::from_str(cookie.value_trimmed()).map_err(|_| Error::SessionInvalid)?;

    if session.expires_at <= OffsetDateTime::now_utc() {
        return Err(Error::SessionInvalid);
    }

    Ok(session)
}

/// Extend the session expiry to the later of its current value and UTC now
/// plus `duration`, rewriting the cookie when the expiry moved.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned. Errors are the
/// same as [get_session_from_cookies] plus [Error::SessionEncoding].
pub(crate) fn extend_session_duration_if_needed(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let mut session = get_session_from_cookies(&jar)?;

    let new_expiry = OffsetDateTime::now_utc()
        .checked_add(duration)
        .ok_or(Error::SessionInvalid)?;

    session.expires_at = max(session.expires_at, new_expiry);

    set_session_cookie(jar, &session)
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, auth::Session};

    use super::{
        COOKIE_SESSION, extend_session_duration_if_needed, get_session_from_cookies,
        invalidate_session_cookie, set_session_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"foobar");
        let key = Key::from(&hash);

        PrivateCookieJar::new(key)
    }

    fn test_session(duration: Duration) -> Session {
        Session {
            access_token: "abc123".to_owned(),
            expires_at: OffsetDateTime::now_utc() + duration,
        }
    }

    /// Test helper macro to assert that two date times are within one second
    /// of each other. Used instead of a function so that the file and line
    /// number of the caller is included in the error message instead of the
    /// helper.
    macro_rules! assert_date_time_close {
        ($left:expr, $right:expr) => {
            assert!(
                ($left - $right).abs() < Duration::seconds(1),
                "got date time {:?}, want {:?}",
                $left,
                $right
            );
        };
    }

    #[test]
    fn can_set_and_get_session() {
        let session = test_session(Duration::minutes(30));

        let jar = set_session_cookie(get_jar(), &session).unwrap();
        let got = get_session_from_cookies(&jar).unwrap();

        assert_eq!(got, session);

        let cookie = jar.get(COOKIE_SESSION).unwrap();
        assert_eq!(cookie.expires_datetime(), Some(session.expires_at));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
    }

    #[test]
    fn missing_cookie_is_an_error() {
        assert_eq!(
            get_session_from_cookies(&get_jar()),
            Err(Error::SessionMissing)
        );
    }

    #[test]
    fn expired_session_is_invalid() {
        let session = test_session(Duration::minutes(-1));
        let jar = set_session_cookie(get_jar(), &session).unwrap();

        assert_eq!(get_session_from_cookies(&jar), Err(Error::SessionInvalid));
    }

    #[test]
    fn can_extend_session_duration() {
        let session = test_session(Duration::minutes(5));
        let jar = set_session_cookie(get_jar(), &session).unwrap();

        let jar = extend_session_duration_if_needed(jar, Duration::minutes(10)).unwrap();
        let got = get_session_from_cookies(&jar).unwrap();

        assert_date_time_close!(got.expires_at, OffsetDateTime::now_utc() + Duration::minutes(10));
    }

    #[test]
    fn session_duration_does_not_shrink() {
        let session = test_session(Duration::minutes(30));
        let jar = set_session_cookie(get_jar(), &session).unwrap();

        // The session expires in 30 minutes, so extending it by 5 seconds
        // should not change the expiry.
        let jar = extend_session_duration_if_needed(jar, Duration::seconds(5)).unwrap();
        let got = get_session_from_cookies(&jar).unwrap();

        assert_eq!(got.expires_at, session.expires_at);
    }

    #[test]
    fn invalidate_session_cookie_succeeds() {
        let session = test_session(Duration::minutes(30));
        let jar = set_session_cookie(get_jar(), &session).unwrap();

        let jar = invalidate_session_cookie(jar);
        let cookie = jar.get(COOKIE_SESSION).unwrap();

        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.expires_datetime(), Some(OffsetDateTime::UNIX_EPOCH));
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));

        assert_eq!(get_session_from_cookies(&jar), Err(Error::SessionInvalid));
    }
}
