//! [`Money`]-related definitions.

use std::fmt;

use rust_decimal::Decimal;

use crate::define_kind;

/// Decimal amount in a [`Currency`].
///
/// Serialized as `{"amount": "300.00", "currency": "USD"}`, with the amount
/// kept as a string to not lose precision.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Money {
    /// Decimal amount.
    pub amount: Decimal,

    /// [`Currency`] of the [`Money::amount`].
    pub currency: Currency,
}

impl Money {
    /// Creates a new [`Money`].
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Returns this [`Money`] multiplied by `n`, e.g. a nightly rate
    /// multiplied by a number of nights.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn times(self, n: u32) -> Option<Self> {
        self.amount
            .checked_mul(Decimal::from(n))
            .map(|amount| Self::new(amount, self.currency))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.amount, self.currency)
    }
}

define_kind! {
    #[doc = "ISO 4217 currency of [`Money`]."]
    enum Currency {
        #[doc = "United States dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Georgian lari."]
        Gel = 3,
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn money(amount: &str, currency: Currency) -> Money {
        Money::new(amount.parse().unwrap(), currency)
    }

    #[test]
    fn multiplies_by_nights() {
        let nightly = money("100", Currency::Usd);

        assert_eq!(nightly.times(2), Some(money("200", Currency::Usd)));
        assert_eq!(nightly.times(0), Some(money("0", Currency::Usd)));
        assert_eq!(
            money("89.90", Currency::Eur).times(3),
            Some(money("269.70", Currency::Eur)),
        );
    }

    #[test]
    fn detects_overflow() {
        assert_eq!(Money::new(Decimal::MAX, Currency::Gel).times(2), None);
    }

    #[test]
    fn displays_with_cents() {
        assert_eq!(money("300", Currency::Usd).to_string(), "300.00 USD");
        assert_eq!(money("12.5", Currency::Gel).to_string(), "12.50 GEL");
    }
}
