//! [`Command`] for listing a new [`Car`].

use std::str::FromStr as _;

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime, Money,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Role;
use crate::{
    domain::{car, user, Car},
    infra::{database, Database},
    Service,
};

use super::{Command, Violations};

/// [`Command`] for listing a new [`Car`] owned by a [`Role::Agency`]
/// [`User`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct CreateCar {
    /// ID of the [`Role::Agency`] [`User`] listing the [`Car`].
    ///
    /// [`User`]: crate::domain::User
    pub agency_id: user::Id,

    /// Raw field inputs of a new [`Car`].
    pub fields: CarFields,
}

/// Raw [`Car`] field inputs shared by fleet mutations.
///
/// Kept raw so every violated rule is collected into a single [`Violations`]
/// list instead of failing on the first one.
#[derive(Clone, Debug)]
pub struct CarFields {
    /// Raw [`car::Model`] input.
    pub model: String,

    /// Raw [`car::Number`] input.
    pub number: String,

    /// Raw [`car::Seats`] input.
    pub seats: i32,

    /// Raw daily rent price input.
    pub rent_per_day: String,
}

/// [`CarFields`] parsed into domain types.
#[derive(Clone, Debug)]
pub struct ParsedFields {
    /// [`car::Model`] of the [`Car`].
    pub model: car::Model,

    /// [`car::Number`] of the [`Car`].
    pub number: car::Number,

    /// [`car::Seats`] of the [`Car`].
    pub seats: car::Seats,

    /// Daily rent price of the [`Car`].
    pub rent_per_day: Money,
}

impl CarFields {
    /// Parses these [`CarFields`] into domain types, collecting every
    /// violated rule.
    ///
    /// # Errors
    ///
    /// With the full list of [`Violations`] if any field is malformed.
    pub fn parse(self) -> Result<ParsedFields, Violations<Violation>> {
        use Violation as V;

        let mut violations = Vec::new();

        let model = car::Model::new(self.model);
        if model.is_none() {
            violations.push(V::ModelRequired);
        }

        let number = car::Number::new(self.number);
        if number.is_none() {
            violations.push(V::NumberRequired);
        }

        let seats = car::Seats::try_from(self.seats).ok();
        if seats.is_none() {
            violations.push(V::SeatsInvalid);
        }

        let rent_per_day = Money::from_str(&self.rent_per_day)
            .ok()
            .filter(Money::is_positive);
        if rent_per_day.is_none() {
            violations.push(V::RentInvalid);
        }

        match (
            Violations::new(violations),
            model.zip(number).zip(seats).zip(rent_per_day),
        ) {
            (None, Some((((model, number), seats), rent_per_day))) => {
                Ok(ParsedFields {
                    model,
                    number,
                    seats,
                    rent_per_day,
                })
            }
            (violations, _) => Err(violations
                .unwrap_or_else(|| Violations::of(V::ModelRequired))),
        }
    }
}

impl<Db> Command<CreateCar> for Service<Db>
where
    Db: for<'n> Database<
            Select<By<Option<Car>, &'n car::Number>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Car>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateCar { agency_id, fields } = cmd;

        let ParsedFields {
            model,
            number,
            seats,
            rent_per_day,
        } = fields
            .parse()
            .map_err(E::InvalidInput)
            .map_err(tracerr::wrap!())?;

        let c = self
            .database()
            .execute(Select(By::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if c.is_some() {
            return Err(tracerr::new!(E::NumberOccupied(number)));
        }

        let now = DateTime::now();
        let car = Car {
            id: car::Id::new(),
            agency_id,
            model,
            number,
            seats,
            rent_per_day,
            is_available: true,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(car.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(Some("cars_number_key")) {
                    tracerr::new!(E::NumberOccupied(car.number.clone()))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(car)
    }
}

/// Error of [`CreateCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`car::Number`] is already taken by another [`Car`].
    #[display("`{_0}` vehicle number is already taken")]
    NumberOccupied(#[error(not(source))] car::Number),

    /// Provided input violates listing rules.
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] Violations<Violation>),
}

/// Violation of a [`Car`] field input rule.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// [`car::Model`] input is missing or malformed.
    #[display("Vehicle model is required.")]
    ModelRequired,

    /// [`car::Number`] input is missing or malformed.
    #[display("Vehicle number is required.")]
    NumberRequired,

    /// [`car::Seats`] input is not a positive seat count.
    #[display("Valid seating capacity is required.")]
    SeatsInvalid,

    /// Daily rent price input is not a positive amount.
    #[display("Valid rent per day is required.")]
    RentInvalid,
}

#[cfg(test)]
mod spec {
    use super::{CarFields, Violation};

    fn valid_fields() -> CarFields {
        CarFields {
            model: "Maruti Swift".into(),
            number: "MH12AB1234".into(),
            seats: 5,
            rent_per_day: "1500.00".into(),
        }
    }

    #[test]
    fn parses_valid_fields() {
        let parsed = valid_fields().parse().unwrap();

        assert_eq!(parsed.model.to_string(), "Maruti Swift");
        assert_eq!(parsed.number.to_string(), "MH12AB1234");
        assert_eq!(parsed.seats.get(), 5);
        assert_eq!(parsed.rent_per_day.to_string(), "₹1500.00");
    }

    #[test]
    fn collects_every_violation_at_once() {
        let fields = CarFields {
            model: String::new(),
            number: String::new(),
            seats: 0,
            rent_per_day: "free".into(),
        };

        let violations = fields.parse().unwrap_err();
        assert_eq!(
            violations.as_slice(),
            &[
                Violation::ModelRequired,
                Violation::NumberRequired,
                Violation::SeatsInvalid,
                Violation::RentInvalid,
            ],
        );
    }

    #[test]
    fn rejects_non_positive_rent() {
        let mut fields = valid_fields();
        fields.rent_per_day = "0".into();
        assert_eq!(
            fields.parse().unwrap_err().as_slice(),
            &[Violation::RentInvalid],
        );

        let mut fields = valid_fields();
        fields.rent_per_day = "-10".into();
        assert_eq!(
            fields.parse().unwrap_err().as_slice(),
            &[Violation::RentInvalid],
        );
    }

    #[test]
    fn rejects_zero_seats() {
        let mut fields = valid_fields();
        fields.seats = 0;
        assert_eq!(
            fields.parse().unwrap_err().as_slice(),
            &[Violation::SeatsInvalid],
        );
    }
}
