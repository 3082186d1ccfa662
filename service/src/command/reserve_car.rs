//! [`Command`] for reserving a [`Car`].

use common::{
    operations::{By, Commit, Insert, Lock, Perform, Select, Transact, Transacted},
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::Role;
use crate::{
    domain::{booking, car, user, Booking, Car},
    infra::{database, Database},
    Service,
};

use super::{Command, Violations};

/// [`Command`] for reserving a [`Car`] by a [`Role::Customer`] [`User`].
///
/// On success the [`Booking`] insertion and the availability flip of the
/// [`Car`] happen in one transaction: either both are committed or neither
/// is. The flip itself is conditional on the [`Car`] still being available
/// at write time, so of two concurrent reservations of the same [`Car`]
/// exactly one succeeds and the other fails with
/// [`ExecutionError::CarUnavailable`].
///
/// [`User`]: crate::domain::User
#[derive(Clone, Debug)]
pub struct ReserveCar {
    /// ID of the [`Role::Customer`] [`User`] reserving the [`Car`].
    ///
    /// [`User`]: crate::domain::User
    pub customer_id: user::Id,

    /// ID of the [`Car`] to reserve.
    pub car_id: car::Id,

    /// Raw rent start date input ([ISO 8601] `YYYY-MM-DD`).
    ///
    /// [ISO 8601]: https://www.iso.org/iso-8601-date-and-time-format.html
    pub start_date: String,

    /// Raw number-of-days input.
    pub days: i32,
}

impl ReserveCar {
    /// Checks the structural rules of a reservation request, collecting
    /// every violated one.
    ///
    /// # Errors
    ///
    /// With the full list of [`Violations`] if the start date is malformed
    /// or in the past, or the number of days is out of range.
    fn check_request(
        start_date: &str,
        days: i32,
    ) -> Result<(booking::StartDate, booking::Days), Violations<Violation>>
    {
        use Violation as V;

        let mut violations = Vec::new();

        let start_date = match Date::from_iso(start_date) {
            Ok(date) if date < Date::today() => {
                violations.push(V::StartDateInPast);
                None
            }
            Ok(date) => Some(date.coerce()),
            Err(_) => {
                violations.push(V::StartDateInvalid);
                None
            }
        };

        let days = booking::Days::try_from(days).ok();
        if days.is_none() {
            violations.push(V::DaysOutOfRange);
        }

        match (Violations::new(violations), start_date.zip(days)) {
            (None, Some(parsed)) => Ok(parsed),
            (violations, _) => Err(violations
                .unwrap_or_else(|| Violations::of(V::StartDateInvalid))),
        }
    }
}

impl<Db> Command<ReserveCar> for Service<Db>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Lock<By<Car, car::Id>>, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<Car>, car::Id>>,
            Ok = Option<Car>,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Perform<car::Hold>, Ok = bool, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: ReserveCar) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let ReserveCar {
            customer_id,
            car_id,
            start_date,
            days,
        } = cmd;

        let (start_date, days) = ReserveCar::check_request(&start_date, days)
            .map_err(E::InvalidInput)
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent actions upon the same `Car`.
        tx.execute(Lock(By::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let car = tx
            .execute(Select(By::<Option<Car>, _>::new(car_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::CarNotExists(car_id))
            .map_err(tracerr::wrap!())?;
        if !car.is_available {
            return Err(tracerr::new!(E::CarUnavailable(car_id)));
        }

        let end_date = start_date
            .checked_add_days(days.get())
            .ok_or(E::InvalidInput(Violations::of(Violation::StartDateInvalid)))
            .map_err(tracerr::wrap!())?;

        // Rent is captured at booking time and never recomputed, even if the
        // `Car`'s rent changes later.
        let booking = Booking {
            id: booking::Id::new(),
            car_id: car.id,
            customer_id,
            start_date,
            days,
            end_date: end_date.coerce(),
            total_cost: car.rent_per_day * days.get(),
            status: booking::Status::Active,
            created_at: DateTime::now().coerce(),
        };
        tx.execute(Insert(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        // The flip only succeeds if the `Car` is still available at write
        // time. A miss means another reservation won the race, and dropping
        // the uncommitted transaction rolls the `Booking` insertion back.
        let held = tx
            .execute(Perform(car::Hold(car.id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !held {
            return Err(tracerr::new!(E::CarUnavailable(car.id)));
        }

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(booking)
    }
}

/// Error of [`ReserveCar`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Car`] with the provided ID does not exist.
    #[display("`Car(id: {_0})` does not exist")]
    CarNotExists(#[error(not(source))] car::Id),

    /// [`Car`] is not available for booking anymore.
    #[display("`Car(id: {_0})` is no longer available")]
    #[from(ignore)]
    CarUnavailable(#[error(not(source))] car::Id),

    /// Provided input violates reservation rules.
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] Violations<Violation>),
}

/// Violation of a [`ReserveCar`] input rule.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// Start date input is missing or malformed.
    #[display("Valid start date is required.")]
    StartDateInvalid,

    /// Start date input is earlier than the current calendar date.
    #[display("Start date cannot be in the past.")]
    StartDateInPast,

    /// Number-of-days input is outside the allowed range.
    #[display("Number of days must be between 1 and 30.")]
    DaysOutOfRange,
}

#[cfg(test)]
mod spec {
    use std::sync::{Arc, Mutex};

    use common::{
        operations::{By, Commit, Insert, Lock, Perform, Select, Transact},
        Date, DateTime, Money,
    };
    use tracerr::Traced;

    use crate::{
        domain::{booking, car, user, Booking, Car},
        infra::{database, Database},
        Command as _, Config, Service,
    };

    use super::{ExecutionError, ReserveCar, Violation};

    fn iso(date: Date) -> String {
        date.to_iso()
    }

    /// In-memory stand-in for the Postgres client, shared between the
    /// non-transactional and transactional halves of a reservation.
    #[derive(Clone, Debug, Default)]
    struct FakeDb(Arc<Mutex<State>>);

    #[derive(Debug, Default)]
    struct State {
        car: Option<Car>,
        hold_succeeds: bool,
        locked: Vec<car::Id>,
        inserted: Vec<Booking>,
        committed: bool,
    }

    impl Database<Transact> for FakeDb {
        type Ok = Self;
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
            Ok(self.clone())
        }
    }

    impl Database<Lock<By<Car, car::Id>>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Lock(by): Lock<By<Car, car::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().locked.push(by.into_inner());
            Ok(())
        }
    }

    impl Database<Select<By<Option<Car>, car::Id>>> for FakeDb {
        type Ok = Option<Car>;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Select<By<Option<Car>, car::Id>>,
        ) -> Result<Self::Ok, Self::Err> {
            Ok(self.0.lock().unwrap().car.clone())
        }
    }

    impl Database<Insert<Booking>> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            Insert(b): Insert<Booking>,
        ) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().inserted.push(b);
            Ok(())
        }
    }

    impl Database<Perform<car::Hold>> for FakeDb {
        type Ok = bool;
        type Err = Traced<database::Error>;

        async fn execute(
            &self,
            _: Perform<car::Hold>,
        ) -> Result<Self::Ok, Self::Err> {
            let mut state = self.0.lock().unwrap();
            let held = state.hold_succeeds;
            if held {
                if let Some(c) = state.car.as_mut() {
                    c.is_available = false;
                }
            }
            Ok(held)
        }
    }

    impl Database<Commit> for FakeDb {
        type Ok = ();
        type Err = Traced<database::Error>;

        async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
            self.0.lock().unwrap().committed = true;
            Ok(())
        }
    }

    fn service(db: FakeDb) -> Service<FakeDb> {
        Service::new(
            Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    b"test-secret",
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    b"test-secret",
                ),
            },
            db,
        )
    }

    fn listed_car(rent_per_day: &str, is_available: bool) -> Car {
        let now = DateTime::now();
        Car {
            id: car::Id::new(),
            agency_id: user::Id::new(),
            model: "Maruti Swift".parse().unwrap(),
            number: "MH12AB1234".parse().unwrap(),
            seats: car::Seats::try_from(4).unwrap(),
            rent_per_day: rent_per_day.parse().unwrap(),
            is_available,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        }
    }

    #[test]
    fn books_an_available_car_in_one_transaction() {
        let db = FakeDb::default();
        let car = listed_car("1500.00", true);
        let car_id = car.id;
        {
            let mut state = db.0.lock().unwrap();
            state.car = Some(car);
            state.hold_succeeds = true;
        }
        let customer_id = user::Id::new();
        let today = Date::today();

        let reserved = futures::executor::block_on(
            service(db.clone()).execute(ReserveCar {
                customer_id,
                car_id,
                start_date: iso(today),
                days: 5,
            }),
        )
        .unwrap();

        assert_eq!(reserved.car_id, car_id);
        assert_eq!(reserved.customer_id, customer_id);
        assert_eq!(reserved.days.get(), 5);
        assert_eq!(
            reserved.end_date.coerce::<()>(),
            today.checked_add_days(5).unwrap(),
        );
        assert_eq!(reserved.total_cost, "7500.00".parse::<Money>().unwrap());
        assert_eq!(reserved.status, booking::Status::Active);

        let state = db.0.lock().unwrap();
        assert_eq!(state.locked, vec![car_id]);
        assert_eq!(state.inserted.len(), 1);
        assert!(state.committed);
        assert!(!state.car.as_ref().unwrap().is_available);
    }

    #[test]
    fn never_commits_when_the_hold_misses() {
        let db = FakeDb::default();
        let car = listed_car("1500.00", true);
        let car_id = car.id;
        {
            let mut state = db.0.lock().unwrap();
            state.car = Some(car);
            state.hold_succeeds = false;
        }

        let err = futures::executor::block_on(
            service(db.clone()).execute(ReserveCar {
                customer_id: user::Id::new(),
                car_id,
                start_date: iso(Date::today()),
                days: 5,
            }),
        )
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::CarUnavailable(_)));
        let state = db.0.lock().unwrap();
        assert!(!state.committed);
    }

    #[test]
    fn rejects_a_missing_car() {
        let db = FakeDb::default();

        let err = futures::executor::block_on(
            service(db.clone()).execute(ReserveCar {
                customer_id: user::Id::new(),
                car_id: car::Id::new(),
                start_date: iso(Date::today()),
                days: 5,
            }),
        )
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::CarNotExists(_)));
        let state = db.0.lock().unwrap();
        assert!(state.inserted.is_empty());
        assert!(!state.committed);
    }

    #[test]
    fn rejects_an_unavailable_car_before_inserting() {
        let db = FakeDb::default();
        let car = listed_car("1500.00", false);
        let car_id = car.id;
        db.0.lock().unwrap().car = Some(car);

        let err = futures::executor::block_on(
            service(db.clone()).execute(ReserveCar {
                customer_id: user::Id::new(),
                car_id,
                start_date: iso(Date::today()),
                days: 5,
            }),
        )
        .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::CarUnavailable(_)));
        let state = db.0.lock().unwrap();
        assert!(state.inserted.is_empty());
        assert!(!state.committed);
    }

    #[test]
    fn accepts_today_and_future_start_dates() {
        let today = Date::today();

        let (start, days) =
            ReserveCar::check_request(&iso(today), 5).unwrap();
        assert_eq!(start.coerce::<()>(), today);
        assert_eq!(days.get(), 5);

        let future = today.checked_add_days(14).unwrap();
        assert!(ReserveCar::check_request(&iso(future), 30).is_ok());
    }

    #[test]
    fn rejects_past_start_date() {
        let violations =
            ReserveCar::check_request("2020-01-01", 5).unwrap_err();
        assert_eq!(violations.as_slice(), &[Violation::StartDateInPast]);
    }

    #[test]
    fn rejects_malformed_start_date() {
        let violations =
            ReserveCar::check_request("not-a-date", 5).unwrap_err();
        assert_eq!(violations.as_slice(), &[Violation::StartDateInvalid]);
    }

    #[test]
    fn rejects_days_out_of_range_without_mutating_anything() {
        let today = Date::today();

        let violations =
            ReserveCar::check_request(&iso(today), 0).unwrap_err();
        assert_eq!(violations.as_slice(), &[Violation::DaysOutOfRange]);

        let violations =
            ReserveCar::check_request(&iso(today), 31).unwrap_err();
        assert_eq!(violations.as_slice(), &[Violation::DaysOutOfRange]);
    }

    #[test]
    fn collects_every_violation_at_once() {
        let violations =
            ReserveCar::check_request("garbage", 0).unwrap_err();
        assert_eq!(
            violations.as_slice(),
            &[Violation::StartDateInvalid, Violation::DaysOutOfRange],
        );
    }
}
