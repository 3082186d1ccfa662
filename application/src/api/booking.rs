//! [`Booking`]-related definitions.

use common::{Date, DateTime, Money};
use derive_more::{Display, From, Into};
use juniper::{graphql_object, GraphQLEnum, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{api, Context};

/// Booking of a car made by a customer.
#[derive(Clone, Debug, From, Into)]
pub struct Booking(domain::Booking);

/// A `Booking` of a `Car`.
#[graphql_object(context = Context)]
impl Booking {
    /// Unique identifier of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// ID of the booked `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.carId",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn car_id(&self) -> api::car::Id {
        self.0.car_id.into()
    }

    /// First day of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.startDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn start_date(&self) -> Date {
        self.0.start_date.coerce()
    }

    /// Number of days this `Booking` lasts.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.days",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn days(&self) -> i32 {
        i32::from(self.0.days.get())
    }

    /// Last day of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.endDate",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn end_date(&self) -> Date {
        self.0.end_date.coerce()
    }

    /// Total cost of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.totalCost",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn total_cost(&self) -> Money {
        self.0.total_cost
    }

    /// Status of this `Booking`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.status",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn status(&self) -> Status {
        self.0.status.into()
    }

    /// `DateTime` when this `Booking` was made.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Booking.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// `Booking` of an agency's car, along with car and customer details.
#[derive(Clone, Debug, From, Into)]
pub struct LedgerEntry(read::booking::LedgerEntry);

/// A `Booking` of one of the agency's `Car`s.
#[graphql_object(context = Context, name = "AgencyBooking")]
impl LedgerEntry {
    /// The `Booking` itself.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.booking",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn booking(&self) -> Booking {
        self.0.booking.clone().into()
    }

    /// Model of the booked `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.carModel",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn car_model(&self) -> api::car::Model {
        self.0.car_model.clone().into()
    }

    /// Registration number of the booked `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.carNumber",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn car_number(&self) -> api::car::Number {
        self.0.car_number.clone().into()
    }

    /// Full name of the booking customer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.customerName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn customer_name(&self) -> api::user::Name {
        self.0.customer_name.clone().into()
    }

    /// Email of the booking customer.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.customerEmail",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn customer_email(&self) -> api::user::Email {
        self.0.customer_email.clone().into()
    }

    /// Phone of the booking customer, if provided.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AgencyBooking.customerPhone",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn customer_phone(&self) -> Option<api::user::Phone> {
        self.0.customer_phone.clone().map(Into::into)
    }
}

/// Unique identifier of a `Booking`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::booking::Id)]
#[into(domain::booking::Id)]
#[graphql(name = "BookingId", transparent)]
pub struct Id(Uuid);

/// Status of a `Booking`.
#[derive(Clone, Copy, Debug, Eq, GraphQLEnum, PartialEq)]
#[graphql(name = "BookingStatus")]
pub enum Status {
    /// `Booking` is currently in effect.
    Active,

    /// `Booking` has run its course.
    Completed,

    /// `Booking` was called off.
    Cancelled,
}

impl From<domain::booking::Status> for Status {
    fn from(status: domain::booking::Status) -> Self {
        match status {
            domain::booking::Status::Active => Self::Active,
            domain::booking::Status::Completed => Self::Completed,
            domain::booking::Status::Cancelled => Self::Cancelled,
        }
    }
}
