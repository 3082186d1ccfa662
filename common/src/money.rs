//! [`Money`]-related definitions.

use std::{fmt, ops, str::FromStr};

#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use rust_decimal::Decimal;

/// Symbol of the single supported currency.
pub const CURRENCY_SYMBOL: char = '₹';

/// Non-negative amount of money in the single supported currency.
#[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Money(Decimal);

impl Money {
    /// Creates a new [`Money`] if the given `amount` is not negative.
    #[must_use]
    pub fn new(amount: Decimal) -> Option<Self> {
        (amount >= Decimal::ZERO).then_some(Self(amount))
    }

    /// Returns the amount of this [`Money`].
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.0
    }

    /// Indicates whether this [`Money`] amount is greater than zero.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl fmt::Display for Money {
    /// Formats the [`Money`] with the currency symbol and exactly two decimal
    /// places (`₹1500.00`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{CURRENCY_SYMBOL}{:.2}", self.0)
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = s.strip_prefix(CURRENCY_SYMBOL).unwrap_or(s);
        let amount =
            Decimal::from_str(amount).map_err(|_| "invalid amount")?;
        Self::new(amount).ok_or("negative amount")
    }
}

impl ops::Mul<u16> for Money {
    type Output = Self;

    fn mul(self, rhs: u16) -> Self::Output {
        Self(self.0 * Decimal::from(rhs))
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! Module providing integration with [`juniper`] crate.

    use std::str::FromStr as _;

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money amount with the currency symbol and two decimal places
    /// (`₹1500.00`); the symbol is optional on input.
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            input
                .as_string_value()
                .ok_or_else(|| {
                    format!(
                        "Cannot parse `Money` input scalar from \
                         non-string value: {input}",
                    )
                })
                .and_then(|s| {
                    Self::from_str(s).map_err(|e| {
                        format!("Cannot parse `Money` input scalar: {e}")
                    })
                })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use rust_decimal::Decimal;

    use super::Money;

    fn money(s: &str) -> Money {
        Money::new(s.parse().unwrap()).unwrap()
    }

    #[test]
    fn rejects_negative_amounts() {
        assert!(Money::new(Decimal::new(-1, 2)).is_none());
        assert!(Money::new(Decimal::ZERO).is_some());
        assert!(Money::new(Decimal::new(150_000, 2)).is_some());
    }

    #[test]
    fn from_str() {
        assert_eq!(Money::from_str("1500.00").unwrap(), money("1500"));
        assert_eq!(Money::from_str("₹1500.00").unwrap(), money("1500"));
        assert_eq!(Money::from_str("123.45").unwrap(), money("123.45"));

        assert!(Money::from_str("-5").is_err());
        assert!(Money::from_str("abc").is_err());
        assert!(Money::from_str("").is_err());
    }

    #[test]
    fn displays_two_decimal_places() {
        assert_eq!(money("1500").to_string(), "₹1500.00");
        assert_eq!(money("1500.5").to_string(), "₹1500.50");
        assert_eq!(money("123.45").to_string(), "₹123.45");
        assert_eq!(money("0").to_string(), "₹0.00");
    }

    #[test]
    fn multiplies_by_day_count() {
        assert_eq!(money("1500.00") * 5, money("7500.00"));
        assert_eq!(money("99.99") * 3, money("299.97"));
        assert_eq!(money("100") * 1, money("100"));
    }

    #[test]
    fn is_positive() {
        assert!(money("0.01").is_positive());
        assert!(!money("0").is_positive());
    }
}
