//! Serde support for the backend's timestamp strings.
//!
//! The backend emits timestamps in two shapes: RFC 3339 with an offset
//! ("2024-03-01T09:30:00+00:00") and offset-less ISO-8601
//! ("2024-03-01T09:30:00" or with fractional seconds), the latter assumed to
//! be UTC. Serialization always uses RFC 3339, which is what the backend
//! expects for request bodies.

use serde::{Deserialize, Deserializer, Serializer, de};
use time::{
    OffsetDateTime, PrimitiveDateTime,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

const NAIVE_WITH_SUBSECONDS: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]");

const NAIVE: &[BorrowedFormatItem] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Parse a backend timestamp string, assuming UTC when no offset is present.
pub(crate) fn parse(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &Rfc3339).or_else(|error| {
        PrimitiveDateTime::parse(value, NAIVE_WITH_SUBSECONDS)
            .or_else(|_| PrimitiveDateTime::parse(value, NAIVE))
            .map(PrimitiveDateTime::assume_utc)
            .map_err(|_| error)
    })
}

pub(crate) fn serialize<S>(datetime: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = datetime
        .format(&Rfc3339)
        .map_err(serde::ser::Error::custom)?;
    serializer.serialize_str(&formatted)
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse(&value).map_err(de::Error::custom)
}

/// Serde support for `Option<OffsetDateTime>` fields such as `created_at`,
/// which older backend records may omit entirely.
pub(crate) mod option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::OffsetDateTime;

    pub(crate) fn serialize<S>(
        datetime: &Option<OffsetDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match datetime {
            Some(datetime) => super::serialize(datetime, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        match value {
            Some(value) => super::parse(&value)
                .map(Some)
                .map_err(serde::de::Error::custom),
            None => Ok(None),
        }
    }
}
