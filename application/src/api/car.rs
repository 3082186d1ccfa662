//! [`Car`]-related definitions.

use common::{DateTime, Money};
use derive_more::{AsRef, Display, From, Into};
use juniper::{graphql_object, GraphQLScalar};
use service::{domain, read};
use uuid::Uuid;

use crate::{
    api::{self, scalar},
    Context,
};

/// Car listed for rent by an agency.
#[derive(Clone, Debug, From, Into)]
pub struct Car(domain::Car);

/// A `Car` listed for rent.
#[graphql_object(context = Context)]
impl Car {
    /// Unique identifier of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.id",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn id(&self) -> Id {
        self.0.id.into()
    }

    /// Model of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.model",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn model(&self) -> Model {
        self.0.model.clone().into()
    }

    /// Registration number of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.number",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn number(&self) -> Number {
        self.0.number.clone().into()
    }

    /// Seating capacity of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.seats",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn seats(&self) -> i32 {
        i32::from(self.0.seats.get())
    }

    /// Daily rent price of this `Car`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.rentPerDay",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn rent_per_day(&self) -> Money {
        self.0.rent_per_day
    }

    /// Indicator whether this `Car` is available for booking.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.isAvailable",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn is_available(&self) -> bool {
        self.0.is_available
    }

    /// `DateTime` when this `Car` was listed.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "Car.createdAt",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn created_at(&self) -> DateTime {
        self.0.created_at.coerce()
    }
}

/// `Car` available for booking, along with the company name of the listing
/// agency.
#[derive(Clone, Debug, From, Into)]
pub struct Available(read::car::Available);

/// A `Car` available for booking.
#[graphql_object(context = Context, name = "AvailableCar")]
impl Available {
    /// The available `Car` itself.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AvailableCar.car",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn car(&self) -> Car {
        self.0.car.clone().into()
    }

    /// Company name of the listing agency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "AvailableCar.companyName",
            otel.name = api::Query::SPAN_NAME,
        ),
    )]
    pub fn company_name(&self) -> Option<api::user::CompanyName> {
        self.0.company_name.clone().map(Into::into)
    }
}

/// Unique identifier of a `Car`.
#[derive(
    Clone, Copy, Debug, Display, Eq, From, GraphQLScalar, Into, PartialEq,
)]
#[from(domain::car::Id)]
#[into(domain::car::Id)]
#[graphql(name = "CarId", transparent)]
pub struct Id(Uuid);

/// Model of a `Car`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CarModel",
    with = scalar::Via::<domain::car::Model>,
)]
pub struct Model(domain::car::Model);

/// Registration number of a `Car`.
#[derive(AsRef, Clone, Debug, Display, From, GraphQLScalar, Into)]
#[graphql(
    name = "CarNumber",
    with = scalar::Via::<domain::car::Number>,
)]
pub struct Number(domain::car::Number);
