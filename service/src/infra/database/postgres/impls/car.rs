//! [`Car`]-related [`Database`] implementations.

use common::operations::{By, Insert, Lock, Perform, Select, Update};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{car, user, Car},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

/// Builds a [`Car`] out of the provided [`Row`].
fn from_row(row: &Row) -> Car {
    Car {
        id: row.get("id"),
        agency_id: row.get("agency_id"),
        model: row.get("model"),
        number: row.get("number"),
        seats: car::Seats::try_from(row.get::<_, i32>("seats"))
            .expect("enforced by `CHECK (seats >= 1)`"),
        rent_per_day: row.get("rent_per_day"),
        is_available: row.get("is_available"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<Car>, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, agency_id, \
                   model, number, seats, \
                   rent_per_day, is_available, \
                   created_at, updated_at \
            FROM cars \
            WHERE id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'n, C> Database<Select<By<Option<Car>, &'n car::Number>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Car>, &'n car::Number>>,
    ) -> Result<Self::Ok, Self::Err> {
        let number = by.into_inner();

        const SQL: &str = "\
            SELECT id, agency_id, \
                   model, number, seats, \
                   rent_per_day, is_available, \
                   created_at, updated_at \
            FROM cars \
            WHERE number = $1::VARCHAR \
            LIMIT 1";
        self.query_opt(SQL, &[&number])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Select<By<Vec<Car>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<Car>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Car>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let agency_id = by.into_inner();

        const SQL: &str = "\
            SELECT id, agency_id, \
                   model, number, seats, \
                   rent_per_day, is_available, \
                   created_at, updated_at \
            FROM cars \
            WHERE agency_id = $1::UUID \
            ORDER BY created_at DESC";
        Ok(self
            .query(SQL, &[&agency_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(from_row)
            .collect())
    }
}

impl<C> Database<Select<By<Vec<read::car::Available>, ()>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::car::Available>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(_): Select<By<Vec<read::car::Available>, ()>>,
    ) -> Result<Self::Ok, Self::Err> {
        const SQL: &str = "\
            SELECT c.id, c.agency_id, \
                   c.model, c.number, c.seats, \
                   c.rent_per_day, c.is_available, \
                   c.created_at, c.updated_at, \
                   u.company_name \
            FROM cars AS c \
            JOIN users AS u ON u.id = c.agency_id \
            WHERE c.is_available \
            ORDER BY c.created_at DESC";
        Ok(self
            .query(SQL, &[])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::car::Available {
                car: from_row(row),
                company_name: row.get("company_name"),
            })
            .collect())
    }
}

impl<C> Database<Insert<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(car): Insert<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            agency_id,
            model,
            number,
            seats,
            rent_per_day,
            is_available,
            created_at,
            updated_at,
        } = car;
        let seats = i32::from(seats.get());

        const SQL: &str = "\
            INSERT INTO cars (\
                id, agency_id, \
                model, number, seats, \
                rent_per_day, is_available, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, \
                $3::VARCHAR, $4::VARCHAR, $5::INT4, \
                $6::NUMERIC, $7::BOOLEAN, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &agency_id,
                &model,
                &number,
                &seats,
                &rent_per_day,
                &is_available,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Update<Car>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(car): Update<Car>,
    ) -> Result<Self::Ok, Self::Err> {
        let Car {
            id,
            agency_id: _,
            model,
            number,
            seats,
            rent_per_day,
            // Availability is owned by the booking flow, so updates never
            // touch it.
            is_available: _,
            created_at: _,
            updated_at,
        } = car;
        let seats = i32::from(seats.get());

        const SQL: &str = "\
            UPDATE cars \
            SET model = $2::VARCHAR, \
                number = $3::VARCHAR, \
                seats = $4::INT4, \
                rent_per_day = $5::NUMERIC, \
                updated_at = $6::TIMESTAMPTZ \
            WHERE id = $1::UUID";
        self.exec(
            SQL,
            &[&id, &model, &number, &seats, &rent_per_day, &updated_at],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Lock<By<Car, car::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Lock(by): Lock<By<Car, car::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Avoid subtle change for SQL.
        let id: car::Id = by.into_inner();

        const SQL: &str = "\
            INSERT INTO cars_lock \
            VALUES ($1::UUID) \
            ON CONFLICT (id) DO NOTHING";
        self.query(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(drop)
    }
}

impl<C> Database<Perform<car::Hold>> for Postgres<C>
where
    C: Connection,
{
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Perform(hold): Perform<car::Hold>,
    ) -> Result<Self::Ok, Self::Err> {
        let car::Hold(id) = hold;

        const SQL: &str = "\
            UPDATE cars \
            SET is_available = FALSE \
            WHERE id = $1::UUID \
              AND is_available";
        self.exec(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|affected| affected == 1)
    }
}
