//! [`Query`] collection related to multiple [`Booking`]s.
//!
//! [`Booking`]: crate::domain::Booking

use common::operations::By;

use crate::{domain::user, read};
#[cfg(doc)]
use crate::{domain::user::Role, Query};

use super::DatabaseQuery;

/// Queries the booking ledger of the [`Role::Agency`] [`User`] with the
/// provided ID: all bookings of its cars joined with car and customer
/// details, newest first.
///
/// [`User`]: crate::domain::User
pub type ForAgency =
    DatabaseQuery<By<Vec<read::booking::LedgerEntry>, user::Id>>;
