//! Resolution of a budget period keyword into concrete date bounds.
//!
//! The budget form submits a period keyword; this module maps it, together
//! with an injected "now", to the `[start, end]` range sent to the backend
//! when creating the budget record. Injecting `now` keeps the resolution
//! testable; nothing here reads the wall clock.

use serde::Deserialize;
use time::{Date, Duration, Month, OffsetDateTime};

/// The budget period selected in the budget form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// A rolling seven-day window starting now.
    Weekly,
    /// The current calendar month.
    Monthly,
    /// The current calendar year.
    Yearly,
    /// Any unrecognized form value. Falls back to a rolling thirty-day
    /// window rather than rejecting the request.
    #[serde(other)]
    Other,
}

impl BudgetPeriod {
    /// A short label for user-facing messages, e.g. "monthly".
    pub fn label(self) -> &'static str {
        match self {
            BudgetPeriod::Weekly => "weekly",
            BudgetPeriod::Monthly => "monthly",
            BudgetPeriod::Yearly => "yearly",
            BudgetPeriod::Other => "custom",
        }
    }

    /// Resolve the period to concrete start and end instants relative to
    /// `now`.
    ///
    /// Weekly is a rolling window from the instant of invocation, not
    /// calendar-aligned. Monthly and yearly snap to calendar boundaries of
    /// `now`'s month and year. The end instant for calendar periods is the
    /// start of the period's last day, matching what the backend stores.
    pub fn resolve(self, now: OffsetDateTime) -> (OffsetDateTime, OffsetDateTime) {
        match self {
            BudgetPeriod::Weekly => (now, now + Duration::days(7)),
            BudgetPeriod::Monthly => {
                let first = first_of_month(now.date());
                let last = last_of_month(now.date());
                (midnight(first, now), midnight(last, now))
            }
            BudgetPeriod::Yearly => {
                let year = now.date().year();
                let first = Date::from_calendar_date(year, Month::January, 1)
                    .expect("January 1 exists in every year");
                let last = Date::from_calendar_date(year, Month::December, 31)
                    .expect("December 31 exists in every year");
                (midnight(first, now), midnight(last, now))
            }
            BudgetPeriod::Other => (now, now + Duration::days(30)),
        }
    }
}

fn first_of_month(date: Date) -> Date {
    date.replace_day(1).expect("day 1 exists in every month")
}

fn last_of_month(date: Date) -> Date {
    let last_day = date.month().length(date.year());
    date.replace_day(last_day)
        .expect("month length is a valid day of the same month")
}

/// The start of `date` in the same offset as `now`.
fn midnight(date: Date, now: OffsetDateTime) -> OffsetDateTime {
    date.midnight().assume_offset(now.offset())
}

#[cfg(test)]
mod period_tests {
    use time::{Duration, macros::datetime};

    use super::BudgetPeriod;

    #[test]
    fn weekly_is_a_rolling_window_of_exactly_seven_days() {
        let now = datetime!(2024-02-15 14:37:05).assume_utc();

        let (start, end) = BudgetPeriod::Weekly.resolve(now);

        assert_eq!(start, now);
        assert_eq!((end - start).whole_seconds(), 604_800);
    }

    #[test]
    fn monthly_covers_the_current_calendar_month() {
        let now = datetime!(2024-05-14 09:00:00).assume_utc();

        let (start, end) = BudgetPeriod::Monthly.resolve(now);

        assert_eq!(start, datetime!(2024-05-01 00:00:00).assume_utc());
        assert_eq!(end, datetime!(2024-05-31 00:00:00).assume_utc());
    }

    #[test]
    fn monthly_handles_leap_year_february() {
        let now = datetime!(2024-02-15 09:00:00).assume_utc();

        let (start, end) = BudgetPeriod::Monthly.resolve(now);

        assert_eq!(start, datetime!(2024-02-01 00:00:00).assume_utc());
        assert_eq!(end, datetime!(2024-02-29 00:00:00).assume_utc());
    }

    #[test]
    fn monthly_handles_non_leap_year_february() {
        let now = datetime!(2023-02-15 09:00:00).assume_utc();

        let (_, end) = BudgetPeriod::Monthly.resolve(now);

        assert_eq!(end, datetime!(2023-02-28 00:00:00).assume_utc());
    }

    #[test]
    fn yearly_covers_the_current_calendar_year() {
        let now = datetime!(2024-05-14 09:00:00).assume_utc();

        let (start, end) = BudgetPeriod::Yearly.resolve(now);

        assert_eq!(start, datetime!(2024-01-01 00:00:00).assume_utc());
        assert_eq!(end, datetime!(2024-12-31 00:00:00).assume_utc());
    }

    #[test]
    fn other_falls_back_to_a_rolling_thirty_day_window() {
        let now = datetime!(2024-05-14 09:00:00).assume_utc();

        let (start, end) = BudgetPeriod::Other.resolve(now);

        assert_eq!(start, now);
        assert_eq!(end - start, Duration::days(30));
    }

    #[test]
    fn calendar_periods_keep_the_offset_of_now() {
        let offset = time::UtcOffset::from_hms(5, 30, 0).unwrap();
        let now = datetime!(2024-05-14 09:00:00).assume_offset(offset);

        let (start, end) = BudgetPeriod::Monthly.resolve(now);

        assert_eq!(start.offset(), offset);
        assert_eq!(end.offset(), offset);
    }

    #[test]
    fn unknown_form_value_deserialises_to_other() {
        let period: BudgetPeriod = serde_json::from_str("\"fortnightly\"").unwrap();
        assert_eq!(period, BudgetPeriod::Other);

        let period: BudgetPeriod = serde_json::from_str("\"weekly\"").unwrap();
        assert_eq!(period, BudgetPeriod::Weekly);
    }
}
