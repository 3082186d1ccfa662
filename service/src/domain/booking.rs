//! [`Booking`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{define_kind, unit, DateOf, DateTimeOf, Money};
use derive_more::{Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{car, user};
#[cfg(doc)]
use crate::domain::{user::Role, Car, User};

/// Booking of a [`Car`] by a [`Role::Customer`] [`User`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the booked [`Car`].
    pub car_id: car::Id,

    /// ID of the [`Role::Customer`] [`User`] who booked the [`Car`].
    pub customer_id: user::Id,

    /// [`Date`] when the rent starts.
    ///
    /// [`Date`]: common::Date
    pub start_date: StartDate,

    /// Number of [`Days`] the [`Car`] is rented for.
    pub days: Days,

    /// [`Date`] when the rent ends.
    ///
    /// Always equals [`start_date`] plus [`days`], fixed at creation.
    ///
    /// [`Date`]: common::Date
    /// [`start_date`]: Booking::start_date
    /// [`days`]: Booking::days
    pub end_date: EndDate,

    /// Total cost of this [`Booking`].
    ///
    /// Always equals the [`Car`]'s rent at booking time multiplied by
    /// [`days`], fixed at creation even if the rent changes later.
    ///
    /// [`days`]: Booking::days
    pub total_cost: Money,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`Booking`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl FromStr for Id {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::from_str(s).map(Self)
    }
}

/// Number of days a [`Car`] is rented for.
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub struct Days(u16);

impl Days {
    /// Minimum allowed number of [`Days`].
    pub const MIN: u16 = 1;

    /// Maximum allowed number of [`Days`].
    pub const MAX: u16 = 30;

    /// Creates a new [`Days`] if the given `days` is within the allowed
    /// range.
    #[must_use]
    pub fn new(days: u16) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&days).then_some(Self(days))
    }

    /// Returns the number of days.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for Days {
    type Error = &'static str;

    fn try_from(days: i32) -> Result<Self, Self::Error> {
        u16::try_from(days)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Days`")
    }
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "The [`Booking`] is active."]
        Active = 1,

        #[doc = "The [`Booking`] is completed."]
        Completed = 2,

        #[doc = "The [`Booking`] is cancelled."]
        Cancelled = 3,
    }
}

/// Marker type indicating a [`Booking`] rent start.
#[derive(Clone, Copy, Debug)]
pub struct Start;

/// Marker type indicating a [`Booking`] rent end.
#[derive(Clone, Copy, Debug)]
pub struct End;

/// [`Date`] when a [`Booking`]'s rent starts.
///
/// [`Date`]: common::Date
pub type StartDate = DateOf<(Booking, Start)>;

/// [`Date`] when a [`Booking`]'s rent ends.
///
/// [`Date`]: common::Date
pub type EndDate = DateOf<(Booking, End)>;

/// [`DateTime`] when a [`Booking`] was created.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Days, Status};

    #[test]
    fn days_within_range() {
        assert!(Days::new(1).is_some());
        assert!(Days::new(15).is_some());
        assert!(Days::new(30).is_some());

        assert!(Days::new(0).is_none());
        assert!(Days::new(31).is_none());
    }

    #[test]
    fn days_from_raw_input() {
        assert_eq!(Days::try_from(5).unwrap().get(), 5);
        assert!(Days::try_from(0).is_err());
        assert!(Days::try_from(31).is_err());
        assert!(Days::try_from(-1).is_err());
    }

    #[test]
    fn status_maps_to_stable_numbers() {
        assert_eq!(Status::Active.u8(), 1);
        assert_eq!(Status::Completed.u8(), 2);
        assert_eq!(Status::Cancelled.u8(), 3);
    }
}
