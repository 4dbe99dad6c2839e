//! Resolution of the configured timezone name to concrete offsets and times.

use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset for a canonical timezone name, e.g. "Asia/Kolkata".
///
/// Returns `None` when the name is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The current date-time in the given canonical timezone.
///
/// Budget period resolution takes the current time as an argument; handlers
/// use this to produce it so that calendar boundaries match the user's
/// configured timezone rather than UTC.
pub fn local_now(canonical_timezone: &str) -> Option<OffsetDateTime> {
    get_local_offset(canonical_timezone).map(|offset| OffsetDateTime::now_utc().to_offset(offset))
}
