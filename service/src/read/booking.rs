//! [`Booking`] read model definitions.

use crate::domain::{car, user, Booking};

/// Agency-facing ledger entry: a [`Booking`] joined with details of the
/// booked [`Car`] and the booking customer.
///
/// [`Car`]: crate::domain::Car
#[derive(Clone, Debug)]
pub struct LedgerEntry {
    /// The [`Booking`] itself.
    pub booking: Booking,

    /// [`car::Model`] of the booked car.
    pub car_model: car::Model,

    /// [`car::Number`] of the booked car.
    pub car_number: car::Number,

    /// [`user::Name`] of the booking customer.
    pub customer_name: user::Name,

    /// [`user::Email`] of the booking customer.
    pub customer_email: user::Email,

    /// [`user::Phone`] of the booking customer, if provided.
    pub customer_phone: Option<user::Phone>,
}
