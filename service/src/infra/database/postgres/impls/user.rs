//! [`User`]-related [`Database`] implementations.

use common::operations::{By, Insert, Select};
use tokio_postgres::Row;
use tracerr::Traced;

use crate::{
    domain::{user, User},
    infra::{
        database::{self, postgres::Connection, Postgres},
        Database,
    },
};

/// Builds a [`User`] out of the provided [`Row`].
fn from_row(row: &Row) -> User {
    User {
        id: row.get("id"),
        role: row.get("role"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        name: row.get("name"),
        phone: row.get("phone"),
        company_name: row.get("company_name"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

impl<C> Database<Select<By<Option<User>, user::Id>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();

        const SQL: &str = "\
            SELECT id, role, \
                   email, password_hash, \
                   name, phone, company_name, \
                   created_at, updated_at \
            FROM users \
            WHERE id = $1::UUID \
            LIMIT 1";
        self.query_opt(SQL, &[&id])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'e, C> Database<Select<By<Option<User>, &'e user::Email>>> for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'e user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();

        const SQL: &str = "\
            SELECT id, role, \
                   email, password_hash, \
                   name, phone, company_name, \
                   created_at, updated_at \
            FROM users \
            WHERE email = $1::VARCHAR \
            LIMIT 1";
        self.query_opt(SQL, &[&email])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<'e, C> Database<Select<By<Option<User>, (&'e user::Email, user::Role)>>>
    for Postgres<C>
where
    C: Connection,
{
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, (&'e user::Email, user::Role)>>,
    ) -> Result<Self::Ok, Self::Err> {
        let (email, role) = by.into_inner();

        const SQL: &str = "\
            SELECT id, role, \
                   email, password_hash, \
                   name, phone, company_name, \
                   created_at, updated_at \
            FROM users \
            WHERE email = $1::VARCHAR \
              AND role = $2::INT2 \
            LIMIT 1";
        self.query_opt(SQL, &[&email, &role])
            .await
            .map_err(tracerr::wrap!())
            .map(|row| row.as_ref().map(from_row))
    }
}

impl<C> Database<Insert<User>> for Postgres<C>
where
    C: Connection,
{
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        let User {
            id,
            role,
            email,
            password_hash,
            name,
            phone,
            company_name,
            created_at,
            updated_at,
        } = user;

        const SQL: &str = "\
            INSERT INTO users (\
                id, role, \
                email, password_hash, \
                name, phone, company_name, \
                created_at, updated_at\
            ) \
            VALUES (\
                $1::UUID, $2::INT2, \
                $3::VARCHAR, $4::VARCHAR, \
                $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, \
                $8::TIMESTAMPTZ, $9::TIMESTAMPTZ\
            )";
        self.exec(
            SQL,
            &[
                &id,
                &role,
                &email,
                &password_hash,
                &name,
                &phone,
                &company_name,
                &created_at,
                &updated_at,
            ],
        )
        .await
        .map_err(tracerr::wrap!())
        .map(drop)
    }
}
