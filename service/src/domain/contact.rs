//! Contact details of [`Customer`]s and [`Hotel`]s.

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;

#[cfg(doc)]
use crate::domain::{Customer, Hotel};

/// Lowercased email address.
///
/// Follows the address syntax browsers accept in `<input type="email">`.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Email(String);

impl Email {
    /// Longest address deliverable over SMTP.
    const MAX_LEN: usize = 254;

    /// Parses an [`Email`] out of the provided `address`, lowercasing it so
    /// the same mailbox cannot be registered twice.
    #[must_use]
    pub fn new(address: impl Into<String>) -> Option<Self> {
        static FORMAT: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(concat!(
                r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+",
                r"@[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?",
                r"(?:\.[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?)+$",
            ))
            .expect("valid regex")
        });

        let address = address.into().to_lowercase();
        (address.len() <= Self::MAX_LEN && FORMAT.is_match(&address))
            .then_some(Self(address))
    }
}

impl FromStr for Email {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Email`")
    }
}

/// Phone number in an international or a local notation, e.g.
/// `+995 32 212-34-56` or `(555) 123-4567`.
///
/// Stored as entered.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Phone(String);

impl Phone {
    /// Allowed count of digits, E.164 numbers having at most 15 of them.
    const DIGITS: std::ops::RangeInclusive<usize> = 7..=15;

    /// Parses a [`Phone`] out of the provided `number`.
    ///
    /// Only digits, spaces, dashes, dots and parentheses are allowed, with an
    /// optional leading `+`.
    #[must_use]
    pub fn new(number: impl Into<String>) -> Option<Self> {
        let number = number.into();
        let rest = number.strip_prefix('+').unwrap_or(&number);
        let well_formed = rest
            .chars()
            .all(|c| c.is_ascii_digit() || " -.()".contains(c));
        let digits = rest.chars().filter(char::is_ascii_digit).count();
        (well_formed && Self::DIGITS.contains(&digits))
            .then_some(Self(number))
    }
}

impl FromStr for Phone {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Phone`")
    }
}
