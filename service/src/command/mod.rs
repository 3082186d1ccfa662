//! [`Command`] definition.

pub mod authorize_user_session;
pub mod create_car;
pub mod create_user;
pub mod create_user_session;
pub mod reserve_car;
pub mod update_car;

use std::fmt;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::{
    authorize_user_session::AuthorizeUserSession, create_car::CreateCar,
    create_user::CreateUser, create_user_session::CreateUserSession,
    reserve_car::ReserveCar, update_car::UpdateCar,
};

/// Non-empty list of input rule violations collected by a [`Command`].
///
/// Violations are accumulated across all the checked fields rather than
/// short-circuiting on the first failed one, so the caller receives every
/// violated rule at once.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Violations<V>(Vec<V>);

impl<V> Violations<V> {
    /// Wraps the provided list of violations.
    ///
    /// [`None`] is returned if the list is empty.
    #[must_use]
    pub fn new(violations: Vec<V>) -> Option<Self> {
        (!violations.is_empty()).then_some(Self(violations))
    }

    /// Creates a new [`Violations`] list of a single violation.
    #[must_use]
    pub fn of(violation: V) -> Self {
        Self(vec![violation])
    }

    /// Returns the collected violations.
    #[must_use]
    pub fn as_slice(&self) -> &[V] {
        &self.0
    }
}

impl<V: fmt::Display> fmt::Display for Violations<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use derive_more::Display;

    use super::Violations;

    #[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
    enum Rule {
        #[display("First rule broken.")]
        First,

        #[display("Second rule broken.")]
        Second,
    }

    #[test]
    fn rejects_empty_list() {
        assert!(Violations::<Rule>::new(vec![]).is_none());
    }

    #[test]
    fn keeps_every_collected_violation() {
        let violations =
            Violations::new(vec![Rule::First, Rule::Second]).unwrap();

        assert_eq!(violations.as_slice(), &[Rule::First, Rule::Second]);
        assert_eq!(
            violations.to_string(),
            "First rule broken. Second rule broken.",
        );
    }

    #[test]
    fn of_single_violation() {
        let violations = Violations::of(Rule::Second);
        assert_eq!(violations.as_slice(), &[Rule::Second]);
    }
}
