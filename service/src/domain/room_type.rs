//! [`RoomType`] definitions.

use std::str::FromStr;

use common::Money;
use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{define_id, define_text};

/// Kind of a room defining its nightly price and capacity.
#[derive(Clone, Debug)]
pub struct RoomType {
    /// ID of this [`RoomType`].
    pub id: Id,

    /// [`Name`] of this [`RoomType`].
    pub name: Name,

    /// [`Description`] of this [`RoomType`].
    pub description: Option<Description>,

    /// Price of a single night in a room of this [`RoomType`].
    pub base_price: Money,

    /// [`Capacity`] of a room of this [`RoomType`].
    pub capacity: Capacity,
}

define_id! {
    #[doc = "ID of a [`RoomType`]."]
    Id
}

define_text! {
    #[doc = "Name of a [`RoomType`]."]
    Name(max = 100)
}

define_text! {
    #[doc = "Description of a [`RoomType`]."]
    Description(max = 500)
}

/// Maximum number of guests a room can host.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Capacity(i16);

impl Capacity {
    /// Creates a new [`Capacity`] if the given number of `guests` is
    /// positive.
    #[must_use]
    pub fn new(guests: i16) -> Option<Self> {
        (guests > 0).then_some(Self(guests))
    }

    /// Indicates whether this [`Capacity`] is enough to host the provided
    /// number of `guests`.
    #[must_use]
    pub fn fits(self, guests: Capacity) -> bool {
        self >= guests
    }
}

impl FromStr for Capacity {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `Capacity`")
    }
}
