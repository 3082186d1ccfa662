//! Calendar date utilities.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp::Ordering, fmt, marker::PhantomData, str::FromStr};

use derive_more::{Debug, Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::BorrowedFormatItem, macros::format_description};

/// Untyped calendar date.
pub type Date = DateOf;

/// [ISO 8601] format of a [`Date`].
///
/// [ISO 8601]: https://www.iso.org/iso-8601-date-and-time-format.html
static ISO_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]");

/// Human-readable day-month-year format of a [`Date`].
static HUMAN_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[day] [month repr:short] [year]");

/// Bare calendar date, without a time-of-day or timezone component.
#[derive(Debug)]
pub struct DateOf<Of: ?Sized = ()> {
    /// Inner representation of the date.
    inner: time::Date,

    /// Type parameter describing the kind of date.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateOf<Of> {
    /// Creates a new [`Date`] representing the current calendar date in UTC.
    #[must_use]
    pub fn today() -> Self {
        Self {
            inner: time::OffsetDateTime::now_utc().date(),
            _of: PhantomData,
        }
    }

    /// Creates a new [`Date`] from the provided [ISO 8601] string
    /// (`YYYY-MM-DD`).
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid [ISO 8601] date.
    ///
    /// [ISO 8601]: https://www.iso.org/iso-8601-date-and-time-format.html
    pub fn from_iso(input: &str) -> Result<Self, ParseError> {
        time::Date::parse(input, ISO_FORMAT)
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
            .map_err(ParseError)
    }

    /// Returns the [`Date`] as an [ISO 8601] string (`YYYY-MM-DD`).
    ///
    /// [ISO 8601]: https://www.iso.org/iso-8601-date-and-time-format.html
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_iso(&self) -> String {
        self.inner
            .format(ISO_FORMAT)
            .unwrap_or_else(|e| panic!("cannot format `Date` as ISO 8601: {e}"))
    }

    /// Returns the [`Date`] shifted forward by the provided number of calendar
    /// days.
    ///
    /// [`None`] is returned if the resulting date is out of range.
    #[must_use]
    pub fn checked_add_days(self, days: u16) -> Option<Self> {
        self.inner
            .checked_add(time::Duration::days(days.into()))
            .map(|inner| Self {
                inner,
                _of: PhantomData,
            })
    }

    /// Coerces one kind of [`Date`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateOf<NewOf> {
        DateOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

/// Error of parsing a [`Date`] from a string.
#[derive(Clone, Copy, Debug, Display, Error)]
pub struct ParseError(time::error::Parse);

impl<Of: ?Sized> Copy for DateOf<Of> {}
impl<Of: ?Sized> Clone for DateOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateOf<Of> {}
impl<Of: ?Sized> PartialEq for DateOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> fmt::Display for DateOf<Of> {
    /// Formats the [`Date`] in a human-readable day-month-year form
    /// (`05 Mar 2026`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self
            .inner
            .format(HUMAN_FORMAT)
            .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl<Of: ?Sized> FromStr for DateOf<Of> {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_iso(s)
    }
}

impl<Of: ?Sized> From<time::Date> for DateOf<Of> {
    fn from(inner: time::Date) -> Self {
        Self {
            inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> From<DateOf<Of>> for time::Date {
    fn from(date: DateOf<Of>) -> Self {
        date.inner
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateOf<Of> {
    accepts!(DATE);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        time::Date::from_sql(ty, raw).map(Into::into)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateOf<Of> {
    accepts!(DATE);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.inner.to_sql(ty, w)
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Calendar date.
    ///
    /// Accepts [ISO 8601] `YYYY-MM-DD` input and renders in a human-readable
    /// day-month-year form (`05 Mar 2026`).
    ///
    /// [ISO 8601]: https://www.iso.org/iso-8601-date-and-time-format.html
    #[graphql_scalar(with = Self, parse_token(String))]
    type Date = crate::Date;

    impl Date {
        fn to_output<S: ScalarValue>(date: &Date) -> Value<S> {
            Value::scalar(date.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Date` input scalar from non-string \
                         value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_iso(s).map_err(|e| {
                        format!("Cannot parse `Date` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use super::Date;

    #[test]
    fn parses_iso() {
        let date = Date::from_iso("2026-03-05").unwrap();
        assert_eq!(date.to_iso(), "2026-03-05");

        assert!(Date::from_iso("05-03-2026").is_err());
        assert!(Date::from_iso("2026-13-05").is_err());
        assert!(Date::from_iso("2026-02-30").is_err());
        assert!(Date::from_iso("not a date").is_err());
    }

    #[test]
    fn displays_human_format() {
        let date = Date::from_iso("2026-03-05").unwrap();
        assert_eq!(date.to_string(), "05 Mar 2026");

        let date = Date::from_iso("2025-12-31").unwrap();
        assert_eq!(date.to_string(), "31 Dec 2025");
    }

    #[test]
    fn adds_calendar_days() {
        let date = Date::from_iso("2026-03-05").unwrap();
        assert_eq!(
            date.checked_add_days(5).unwrap(),
            Date::from_iso("2026-03-10").unwrap(),
        );

        // Month and year boundaries.
        let date = Date::from_iso("2025-12-30").unwrap();
        assert_eq!(
            date.checked_add_days(3).unwrap(),
            Date::from_iso("2026-01-02").unwrap(),
        );

        // Leap year.
        let date = Date::from_iso("2028-02-28").unwrap();
        assert_eq!(
            date.checked_add_days(1).unwrap(),
            Date::from_iso("2028-02-29").unwrap(),
        );
    }

    #[test]
    fn orders_chronologically() {
        let earlier = Date::from_iso("2026-03-05").unwrap();
        let later = Date::from_iso("2026-04-01").unwrap();

        assert!(earlier < later);
        assert!(later >= earlier);
        assert_eq!(earlier, earlier.checked_add_days(0).unwrap());
    }
}
