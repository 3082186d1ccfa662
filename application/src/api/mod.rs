//! GraphQL API definitions.

pub mod booking;
pub mod car;
mod mutation;
mod query;
pub mod scalar;
pub mod user;

use juniper::EmptySubscription;

use crate::{define_error, Context};

pub use self::{
    booking::Booking, car::Car, mutation::Mutation, query::Query, user::User,
};

/// GraphQL schema.
pub type Schema =
    juniper::RootNode<'static, Query, Mutation, EmptySubscription<Context>>;

define_error! {
    enum PrivilegeError {
        #[code = "NOT_CUSTOMER"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be a customer"]
        Customer,

        #[code = "NOT_AGENCY"]
        #[status = FORBIDDEN]
        #[message = "Authenticated `User` must be an agency"]
        Agency,
    }
}
