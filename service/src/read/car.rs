//! [`Car`] read model definitions.

use crate::domain::{user, Car};
#[cfg(doc)]
use crate::domain::user::CompanyName;

/// [`Car`] available for booking, joined with the owning agency's
/// [`CompanyName`].
#[derive(Clone, Debug)]
pub struct Available {
    /// The available [`Car`] itself.
    pub car: Car,

    /// [`CompanyName`] of the owning agency.
    pub company_name: Option<user::CompanyName>,
}
