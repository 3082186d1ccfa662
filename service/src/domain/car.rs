//! [`Car`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf, Money};
use derive_more::{AsRef, Display, From, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user;
#[cfg(doc)]
use crate::domain::{user::Role, User};

/// Car listed for rent by a [`Role::Agency`] [`User`].
#[derive(Clone, Debug)]
pub struct Car {
    /// ID of this [`Car`].
    pub id: Id,

    /// ID of the [`Role::Agency`] [`User`] owning this [`Car`].
    pub agency_id: user::Id,

    /// [`Model`] of this [`Car`].
    pub model: Model,

    /// Registration [`Number`] of this [`Car`].
    ///
    /// Unique across all [`Car`]s.
    pub number: Number,

    /// Seating capacity of this [`Car`].
    pub seats: Seats,

    /// Daily rent price of this [`Car`].
    pub rent_per_day: Money,

    /// Indicator whether this [`Car`] is available for booking.
    pub is_available: bool,

    /// [`DateTime`] when this [`Car`] was created.
    pub created_at: CreationDateTime,

    /// [`DateTime`] when this [`Car`] was last updated.
    pub updated_at: UpdateDateTime,
}

/// ID of a [`Car`].
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

/// Model of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Model(String);

impl Model {
    /// Creates a new [`Model`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `model` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    /// Creates a new [`Model`] if the given `model` is valid.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Option<Self> {
        let model = model.into();
        Self::check(&model).then_some(Self(model))
    }

    /// Checks whether the given `model` is a valid [`Model`].
    fn check(model: impl AsRef<str>) -> bool {
        let model = model.as_ref();
        model.trim() == model && !model.is_empty() && model.len() <= 100
    }
}

impl FromStr for Model {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Model`")
    }
}

/// Registration number of a [`Car`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Number(String);

impl Number {
    /// Creates a new [`Number`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `number` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(number: impl Into<String>) -> Self {
        Self(number.into())
    }

    /// Creates a new [`Number`] if the given `number` is valid.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        Self::check(&number).then_some(Self(number))
    }

    /// Checks whether the given `number` is a valid [`Number`].
    fn check(number: impl AsRef<str>) -> bool {
        let number = number.as_ref();
        number.trim() == number && !number.is_empty() && number.len() <= 20
    }
}

impl FromStr for Number {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Number`")
    }
}

/// Seating capacity of a [`Car`].
#[derive(Clone, Copy, Debug, Display, Eq, Ord, PartialEq, PartialOrd)]
pub struct Seats(u16);

impl Seats {
    /// Creates a new [`Seats`] if the given `capacity` is at least one.
    #[must_use]
    pub fn new(capacity: u16) -> Option<Self> {
        (capacity >= 1).then_some(Self(capacity))
    }

    /// Returns the capacity as a number.
    #[must_use]
    pub fn get(self) -> u16 {
        self.0
    }
}

impl TryFrom<i32> for Seats {
    type Error = &'static str;

    fn try_from(capacity: i32) -> Result<Self, Self::Error> {
        u16::try_from(capacity)
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Seats`")
    }
}

/// Request to take a [`Car`] off availability, conditional on it still
/// being available at write time.
///
/// Performing it yields whether the [`Car`] was actually held.
#[derive(Clone, Copy, Debug)]
pub struct Hold(pub Id);

/// [`DateTime`] when a [`Car`] was created.
pub type CreationDateTime = DateTimeOf<(Car, unit::Creation)>;

/// [`DateTime`] when a [`Car`] was last updated.
pub type UpdateDateTime = DateTimeOf<(Car, unit::Update)>;

#[cfg(test)]
mod spec {
    use super::{Model, Number, Seats};

    #[test]
    fn validates_model() {
        assert!(Model::new("Maruti Swift").is_some());

        assert!(Model::new("").is_none());
        assert!(Model::new(" padded ").is_none());
        assert!(Model::new("x".repeat(101)).is_none());
    }

    #[test]
    fn validates_number() {
        assert!(Number::new("MH12AB1234").is_some());
        assert!(Number::new("KA-01-HH-1234").is_some());

        assert!(Number::new("").is_none());
        assert!(Number::new("x".repeat(21)).is_none());
    }

    #[test]
    fn requires_at_least_one_seat() {
        assert!(Seats::new(1).is_some());
        assert!(Seats::new(7).is_some());
        assert!(Seats::new(0).is_none());

        assert_eq!(Seats::try_from(4).unwrap().get(), 4);
        assert!(Seats::try_from(0).is_err());
        assert!(Seats::try_from(-2).is_err());
    }
}
