//! [`Command`] for editing an existing [`Car`].

use common::{
    operations::{By, Commit, Lock, Select, Transact, Transacted, Update},
    DateTime,
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

use super::{
    create_car::{CarFields, ParsedFields, Violation},
    Command, Violations,
};

/// [`Command`] for editing an existing [`Car`].
///
/// Ownership is re-verified on every execution: a [`Car`] that is absent or
/// owned by another agency yields the same [`ExecutionError::CarNotExists`]
/// outcome. Availability of the [`Car`] is never touched.
#[derive(Clone, Debug)]
pub struct UpdateCar {
    /// ID of the [`Car`] to edit.
    pub id: car::Id,

    /// ID of the [`Role::Agency`] [`User`] performing the edit.
    ///
    /// [`User`]: crate::domain::User
    pub agency_id: user::Id,

    /// Raw field inputs replacing the current ones.
    pub fields: CarFields,
}

impl<Db> Command<UpdateCar> for Service<Db>
where
    Db: Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + for<'n> Database<
            Select<By<Option<Car>, &'n car::Number>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<Update<Car>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Car;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: UpdateCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateCar {
            id,
            agency_id,
            fields,
        } = cmd;

        let ParsedFields {
            model,
            number,
            seats,
            rent_per_day,
        } = fields
            .parse()
            .map_err(E::InvalidInput)
            .map_err(tracerr::wrap!())?;

        let mut car = self
            .database()
            .execute(Select(By::<Option<Car>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .filter(|c| c.agency_id == agency_id)
            .ok_or(E::CarNotExists(id))
            .map_err(tracerr::wrap!())?;

        // The uniqueness check excludes the `Car` being edited itself.
        let occupied = self
            .database()
            .execute(Select(By::new(&number)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some_and(|c| c.id != id);
        if occupied {
            return Err(tracerr::new!(E::NumberOccupied(number)));
        }

        car.model = model;
        car.number = number;
        car.seats = seats;
        car.rent_per_day = rent_per_day;
        car.updated_at = DateTime::now().coerce();

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(car.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Update(car.clone()))
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

/// Error of [`UpdateCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Car`] does not exist or is not owned by the requesting agency.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`car::Number`] is already taken by another [`Car`].
    #[display("`{_0}` vehicle number is already taken")]
    NumberOccupied(#[error(not(source))] car::Number),

    /// Provided input violates listing rules.
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] Violations<Violation>),
}
