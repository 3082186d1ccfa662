//! GraphQL [`Query`]s definitions.

use juniper::graphql_object;
use service::{domain::user::Role, query, Query as _};

use crate::{api, define_error, AsError, Context, Error};

/// Root of all GraphQL queries.
#[derive(Clone, Copy, Debug)]
pub struct Query;

impl Query {
    /// Name of the [`tracing::Span`] for the queries.
    pub(crate) const SPAN_NAME: &'static str = "GraphQL query";
}

#[graphql_object(context = Context)]
impl Query {
    /// Returns the currently authenticated `User`.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myUser",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_user(ctx: &Context) -> Result<api::User, Error> {
        let my_id = ctx.current_session().await?.user_id;
        ctx.service()
            .execute(query::user::ById::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?
            .ok_or_else(|| UserError::NotExists.into())
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Returns all `Car`s currently available for booking, newest first.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "availableCars",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn available_cars(
        ctx: &Context,
    ) -> Result<Vec<api::car::Available>, Error> {
        ctx.service()
            .execute(query::cars::Available::by(()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cars| cars.into_iter().map(Into::into).collect())
    }

    /// Returns the `Car`s listed by the currently authenticated agency,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_AGENCY` - the current `User` is not an agency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "myCars",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn my_cars(ctx: &Context) -> Result<Vec<api::Car>, Error> {
        let my_id = ctx.current_session_of(Role::Agency).await?.user_id;

        ctx.service()
            .execute(query::cars::ByAgency::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|cars| cars.into_iter().map(Into::into).collect())
    }

    /// Returns all bookings of the currently authenticated agency's `Car`s,
    /// newest first.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `NOT_AGENCY` - the current `User` is not an agency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "agencyBookings",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn agency_bookings(
        ctx: &Context,
    ) -> Result<Vec<api::booking::LedgerEntry>, Error> {
        let my_id = ctx.current_session_of(Role::Agency).await?.user_id;

        ctx.service()
            .execute(query::bookings::ForAgency::by(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(|entries| entries.into_iter().map(Into::into).collect())
    }
}

define_error! {
    enum UserError {
        #[code = "USER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "`User` with the specified ID does not exist"]
        NotExists,
    }
}
