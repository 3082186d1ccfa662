//! [`Command`] for registering a new [`User`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret as _, SecretString};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::user::{CompanyName, Email, Name, Password, Phone, Role};
use crate::{
    domain::{user, User},
    infra::{database, Database},
    Service,
};

use super::{Command, Violations};

/// [`Command`] for registering a new [`User`].
///
/// Field inputs are taken raw, so every violated rule is collected into a
/// single [`Violations`] list instead of failing on the first one.
#[derive(Clone, Debug)]
pub struct CreateUser {
    /// [`Role`] of a new [`User`].
    pub role: user::Role,

    /// Raw [`Name`] input of a new [`User`].
    pub name: String,

    /// Raw [`Email`] input of a new [`User`].
    pub email: String,

    /// Raw [`Password`] input of a new [`User`].
    pub password: SecretString,

    /// Raw [`Phone`] input of a new [`User`], if provided.
    pub phone: Option<String>,

    /// Raw [`CompanyName`] input of a new [`User`].
    ///
    /// Required for [`Role::Agency`], ignored for [`Role::Customer`].
    pub company_name: Option<String>,
}

impl<Db> Command<CreateUser> for Service<Db>
where
    Db: for<'e> Database<
            Select<By<Option<User>, &'e user::Email>>,
            Ok = Option<User>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<User>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = User;
    type Err = Traced<ExecutionError>;

    async fn execute(&self, cmd: CreateUser) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;
        use Violation as V;

        let CreateUser {
            role,
            name,
            email,
            password,
            phone,
            company_name,
        } = cmd;

        let mut violations = Vec::new();

        let name = user::Name::new(name);
        if name.is_none() {
            violations.push(V::NameRequired);
        }

        let email = user::Email::new(email);
        if email.is_none() {
            violations.push(V::EmailInvalid);
        }

        let password = user::Password::new(password.expose_secret());
        if password.is_none() {
            violations.push(V::PasswordTooShort);
        }

        let phone = match phone {
            Some(raw) => {
                let parsed = user::Phone::new(raw);
                if parsed.is_none() {
                    violations.push(V::PhoneInvalid);
                }
                parsed
            }
            None => None,
        };

        let company_name = match role {
            user::Role::Agency => {
                let parsed = company_name.and_then(user::CompanyName::new);
                if parsed.is_none() {
                    violations.push(V::CompanyNameRequired);
                }
                parsed
            }
            user::Role::Customer => None,
        };

        if let Some(violations) = Violations::new(violations) {
            return Err(tracerr::new!(E::InvalidInput(violations)));
        }
        let Some(((name, email), password)) = name.zip(email).zip(password)
        else {
            // Unreachable: a missing field is always recorded as a violation
            // above.
            return Err(tracerr::new!(E::InvalidInput(Violations::of(
                V::NameRequired,
            ))));
        };

        let u = self
            .database()
            .execute(Select(By::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if u.is_some() {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let password_hash = user::PasswordHash::new(&password)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let user = User {
            id: user::Id::new(),
            role,
            email,
            password_hash,
            name,
            phone,
            company_name,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        tx.execute(Insert(user.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_unique_violation(Some("users_email_key")) {
                    tracerr::new!(E::EmailOccupied(user.email.clone()))
                } else {
                    tracerr::map_from_and_wrap!(=> E)(e)
                }
            })
            .map(drop)?;
        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(user)
    }
}

/// Error of [`CreateUser`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`user::Email`] is already registered.
    #[display("`{_0}` email is already registered")]
    EmailOccupied(#[error(not(source))] user::Email),

    /// Failed to hash the provided [`Password`].
    #[display("Failed to hash `Password`: {_0}")]
    #[from]
    HashPassword(bcrypt::BcryptError),

    /// Provided input violates registration rules.
    #[display("{_0}")]
    InvalidInput(#[error(not(source))] Violations<Violation>),
}

/// Violation of a [`CreateUser`] input rule.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Violation {
    /// [`Name`] input is missing or malformed.
    #[display("Full name is required.")]
    NameRequired,

    /// [`Email`] input is missing or malformed.
    #[display("Valid email is required.")]
    EmailInvalid,

    /// [`Password`] input is shorter than the allowed minimum.
    #[display("Password must be at least 6 characters long.")]
    PasswordTooShort,

    /// [`Phone`] input is malformed.
    #[display("Valid phone number is required.")]
    PhoneInvalid,

    /// [`CompanyName`] input is missing or malformed.
    #[display("Company name is required.")]
    CompanyNameRequired,
}
