//! [`Review`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{booking, define_id, define_text};
#[cfg(doc)]
use super::{Booking, Hotel};

/// Feedback about a [`Hotel`] left by a customer who booked a room there.
#[derive(Clone, Debug)]
pub struct Review {
    /// ID of this [`Review`].
    pub id: Id,

    /// ID of the [`Booking`] this [`Review`] is attached to.
    pub booking_id: booking::Id,

    /// [`Rating`] given in this [`Review`].
    pub rating: Rating,

    /// [`Comment`] of this [`Review`].
    pub comment: Comment,

    /// [`DateTime`] when this [`Review`] was left.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Review`]."]
    Id
}

define_text! {
    #[doc = "Text of a [`Review`]."]
    Comment(max = 2000)
}

/// Rating of a [`Hotel`] in a [`Review`], from 1 to 5.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Rating(i16);

impl Rating {
    /// Creates a new [`Rating`] if the given `value` is in `1..=5` range.
    #[must_use]
    pub fn new(value: i16) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }
}

impl FromStr for Rating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().ok().and_then(Self::new).ok_or("invalid `Rating`")
    }
}

/// [`DateTime`] when a [`Review`] was left.
pub type CreationDateTime = DateTimeOf<(Review, unit::Creation)>;
