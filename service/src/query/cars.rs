//! [`Query`] collection related to multiple [`Car`]s.

use common::operations::By;

use crate::{
    domain::{user, Car},
    read,
};
#[cfg(doc)]
use crate::{domain::user::Role, Query};

use super::DatabaseQuery;

/// Queries [`Car`]s owned by the [`Role::Agency`] [`User`] with the provided
/// ID, newest first.
///
/// [`User`]: crate::domain::User
pub type ByAgency = DatabaseQuery<By<Vec<Car>, user::Id>>;

/// Queries [`Car`]s currently available for booking, joined with the owning
/// agency's company name, newest first.
pub type Available = DatabaseQuery<By<Vec<read::car::Available>, ()>>;
