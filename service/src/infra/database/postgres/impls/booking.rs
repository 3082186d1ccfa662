//! [`Booking`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tracerr::Traced;

use crate::{
    domain::{booking, user, Booking},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
    read,
};

impl<C> Database<Insert<Booking>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(b): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        let Booking {
            id,
            car_id,
            customer_id,
            start_date,
            days,
            end_date,
            total_cost,
            status,
            created_at,
        } = b;
        let days = i32::from(days.get());

        const SQL: &str = "\
            INSERT INTO bookings (\
                id, car_id, customer_id, \
                start_date, days, end_date, \
                total_cost, status, \
                created_at\
            ) \
            VALUES (\
                $1::UUID, $2::UUID, $3::UUID, \
                $4::DATE, $5::INT4, $6::DATE, \
                $7::NUMERIC, $8::INT2, \
                $9::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &car_id,
                &customer_id,
                &start_date,
                &days,
                &end_date,
                &total_cost,
                &status,
                &created_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}

impl<C> Database<Select<By<Vec<read::booking::LedgerEntry>, user::Id>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Vec<read::booking::LedgerEntry>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::booking::LedgerEntry>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let agency_id = by.into_inner();

        const SQL: &str = "\
            SELECT b.id, b.car_id, b.customer_id, \
                   b.start_date, b.days, b.end_date, \
                   b.total_cost, b.status, \
                   b.created_at, \
                   c.model AS car_model, \
                   c.number AS car_number, \
                   u.name AS customer_name, \
                   u.email AS customer_email, \
                   u.phone AS customer_phone \
            FROM bookings AS b \
            JOIN cars AS c ON c.id = b.car_id \
            JOIN users AS u ON u.id = b.customer_id \
            WHERE c.agency_id = $1::UUID \
            ORDER BY b.created_at DESC";
        Ok(self
            .query(SQL, &[&agency_id])
            .await
            .map_err(tracerr::wrap!())?
            .iter()
            .map(|row| read::booking::LedgerEntry {
                booking: Booking {
                    id: row.get("id"),
                    car_id: row.get("car_id"),
                    customer_id: row.get("customer_id"),
                    start_date: row.get("start_date"),
                    days: booking::Days::try_from(row.get::<_, i32>("days"))
                        .expect("enforced by `CHECK (days BETWEEN 1 AND 30)`"),
                    end_date: row.get("end_date"),
                    total_cost: row.get("total_cost"),
                    status: row.get("status"),
                    created_at: row.get("created_at"),
                },
                car_model: row.get("car_model"),
                car_number: row.get("car_number"),
                customer_name: row.get("customer_name"),
                customer_email: row.get("customer_email"),
                customer_phone: row.get("customer_phone"),
            })
            .collect())
    }
}
