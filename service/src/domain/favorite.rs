//! [`Favorite`] definitions.

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};

use super::{customer, hotel};
#[cfg(doc)]
use super::{Customer, Hotel};

/// [`Hotel`] marked by a [`Customer`] to come back to later.
#[derive(Clone, Debug)]
pub struct Favorite {
    /// ID of the [`Customer`] who marked the [`Hotel`].
    pub customer_id: customer::Id,

    /// ID of the marked [`Hotel`].
    pub hotel_id: hotel::Id,

    /// [`DateTime`] when the [`Hotel`] was marked.
    pub added_at: CreationDateTime,
}

impl Favorite {
    /// Returns the [`Key`] of this [`Favorite`].
    #[must_use]
    pub const fn key(&self) -> Key {
        Key {
            customer_id: self.customer_id,
            hotel_id: self.hotel_id,
        }
    }
}

/// Key identifying a [`Favorite`], as a [`Hotel`] is marked by the same
/// [`Customer`] at most once.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Key {
    /// ID of the [`Customer`].
    pub customer_id: customer::Id,

    /// ID of the [`Hotel`].
    pub hotel_id: hotel::Id,
}

/// [`DateTime`] when a [`Favorite`] was added.
pub type CreationDateTime = DateTimeOf<(Favorite, unit::Creation)>;
