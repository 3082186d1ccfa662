//! GraphQL [`Mutation`]s definitions.

use juniper::graphql_object;
use service::{command, domain::user::Role, Command as _};

use crate::{api, define_error, AsError, Context, Error, Session};

/// Root of all GraphQL mutations.
#[derive(Clone, Copy, Debug)]
pub struct Mutation;

impl Mutation {
    /// Name of the [`tracing::Span`] for the mutations.
    const SPAN_NAME: &'static str = "GraphQL mutation";
}

#[graphql_object(context = Context)]
impl Mutation {
    /// Registers a new `User` with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `EMAIL_OCCUPIED` - provided email is registered by another `User`;
    /// - `INVALID_INPUT` - provided details violate registration rules.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUser",
            email = %email,
            name = %name,
            otel.name = Self::SPAN_NAME,
            phone = ?phone,
            role = ?role,
        ),
    )]
    pub async fn create_user(
        role: api::user::Role,
        name: String,
        email: String,
        password: String,
        phone: Option<String>,
        company_name: Option<String>,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let user = ctx
            .service()
            .execute(command::CreateUser {
                role: role.into(),
                name,
                email,
                password: password.into(),
                phone,
                company_name,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByUserId(user.id))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Creates a new `UserSession` with the provided credentials.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `WRONG_CREDENTIALS` - provided credentials does not match any `User`
    ///                         with the provided role.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createUserSession",
            email = %email,
            otel.name = Self::SPAN_NAME,
            role = ?role,
        ),
    )]
    pub async fn create_user_session(
        role: api::user::Role,
        email: String,
        password: String,
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let output = ctx
            .service()
            .execute(command::CreateUserSession::ByCredentials {
                role: role.into(),
                email,
                password: password.into(),
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())?;

        ctx.set_current_session(Session {
            user_id: output.user.id.into(),
            role: output.user.role,
            token: output.token.clone(),
            expires_at: output.expires_at.coerce(),
        })
        .await;

        Ok(output.into())
    }

    /// Renews the current `UserSession`, issuing a fresh token.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "renewUserSession",
            otel.name = Self::SPAN_NAME,
        ),
    )]
    pub async fn renew_user_session(
        ctx: &Context,
    ) -> Result<api::user::session::CreateResult, Error> {
        let my_id = ctx.current_session().await?.user_id;

        ctx.service()
            .execute(command::CreateUserSession::ByUserId(my_id.into()))
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Lists a new `Car` for rent with the provided details.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NUMBER_OCCUPIED` - provided registration number is taken by
    ///                           another `Car`;
    /// - `INVALID_INPUT` - provided details violate listing rules;
    /// - `NOT_AGENCY` - the current `User` is not an agency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "createCar",
            model = %model,
            number = %number,
            otel.name = Self::SPAN_NAME,
            seats = %seats,
        ),
    )]
    pub async fn create_car(
        model: String,
        number: String,
        seats: i32,
        rent_per_day: String,
        ctx: &Context,
    ) -> Result<api::Car, Error> {
        let my_id = ctx.current_session_of(Role::Agency).await?.user_id;

        ctx.service()
            .execute(command::CreateCar {
                agency_id: my_id.into(),
                fields: command::create_car::CarFields {
                    model,
                    number,
                    seats,
                    rent_per_day,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Updates the details of the `Car` with the provided ID.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_EXISTS` - the `Car` with the provided ID does not exist or
    ///                      belongs to another agency;
    /// - `CAR_NUMBER_OCCUPIED` - provided registration number is taken by
    ///                           another `Car`;
    /// - `INVALID_INPUT` - provided details violate listing rules;
    /// - `NOT_AGENCY` - the current `User` is not an agency.
    #[tracing::instrument(
        skip_all,
        fields(
            gql.name = "updateCar",
            id = %id,
            model = %model,
            number = %number,
            otel.name = Self::SPAN_NAME,
            seats = %seats,
        ),
    )]
    pub async fn update_car(
        id: api::car::Id,
        model: String,
        number: String,
        seats: i32,
        rent_per_day: String,
        ctx: &Context,
    ) -> Result<api::Car, Error> {
        let my_id = ctx.current_session_of(Role::Agency).await?.user_id;

        ctx.service()
            .execute(command::UpdateCar {
                id: id.into(),
                agency_id: my_id.into(),
                fields: command::create_car::CarFields {
                    model,
                    number,
                    seats,
                    rent_per_day,
                },
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }

    /// Reserves the `Car` with the provided ID for the requested period.
    ///
    /// # Errors
    ///
    /// Possible error codes:
    /// - `CAR_NOT_EXISTS` - the `Car` with the provided ID does not exist;
    /// - `CAR_UNAVAILABLE` - the `Car` with the provided ID is no longer
    ///                       available for booking;
    /// - `INVALID_INPUT` - provided details violate reservation rules;
    /// - `NOT_CUSTOMER` - the current `User` is not a customer.
    #[tracing::instrument(
        skip_all,
        fields(
            car_id = %car_id,
            days = %days,
            gql.name = "reserveCar",
            otel.name = Self::SPAN_NAME,
            start_date = %start_date,
        ),
    )]
    pub async fn reserve_car(
        car_id: api::car::Id,
        start_date: String,
        days: i32,
        ctx: &Context,
    ) -> Result<api::Booking, Error> {
        let my_id = ctx.current_session_of(Role::Customer).await?.user_id;

        ctx.service()
            .execute(command::ReserveCar {
                customer_id: my_id.into(),
                car_id: car_id.into(),
                start_date,
                days,
            })
            .await
            .map_err(AsError::into_error)
            .map_err(ctx.error())
            .map(Into::into)
    }
}

impl AsError for command::create_user::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "EMAIL_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Provided email is registered by another `User`"]
                EmailOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(Error::EmailOccupied.into()),
            Self::HashPassword(_) => None,
            Self::InvalidInput(v) => Some(crate::Error::invalid_input(v)),
        }
    }
}

impl AsError for command::create_user_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "WRONG_CREDENTIALS"]
                #[status = FORBIDDEN]
                #[message = "Provided credentials does not match any `User`"]
                WrongCredentials,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::JsonWebTokenEncodeError(_) => None,
            Self::UserNotExists(_) | Self::WrongCredentials => {
                Some(Error::WrongCredentials.into())
            }
        }
    }
}

impl AsError for command::create_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Provided registration number is taken by another \
                             `Car`"]
                NumberOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::NumberOccupied(_) => Some(Error::NumberOccupied.into()),
            Self::InvalidInput(v) => Some(crate::Error::invalid_input(v)),
        }
    }
}

impl AsError for command::update_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,

                #[code = "CAR_NUMBER_OCCUPIED"]
                #[status = CONFLICT]
                #[message = "Provided registration number is taken by another \
                             `Car`"]
                NumberOccupied,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CarNotExists(_) => Some(Error::CarNotExists.into()),
            Self::NumberOccupied(_) => Some(Error::NumberOccupied.into()),
            Self::InvalidInput(v) => Some(crate::Error::invalid_input(v)),
        }
    }
}

impl AsError for command::reserve_car::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        define_error! {
            enum Error {
                #[code = "CAR_NOT_EXISTS"]
                #[status = NOT_FOUND]
                #[message = "`Car` with the provided ID does not exist"]
                CarNotExists,

                #[code = "CAR_UNAVAILABLE"]
                #[status = CONFLICT]
                #[message = "`Car` with the provided ID is no longer available \
                             for booking"]
                CarUnavailable,
            }
        }

        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CarNotExists(_) => Some(Error::CarNotExists.into()),
            Self::CarUnavailable(_) => Some(Error::CarUnavailable.into()),
            Self::InvalidInput(v) => Some(crate::Error::invalid_input(v)),
        }
    }
}
