//! [`Room`]-related read definitions.

use derive_more::Deref;

use crate::domain::{booking::Stay, room, Amenity, Room, RoomType};

/// [`Room`] along with its [`RoomType`] and [`Amenity`]s.
#[derive(Clone, Debug)]
pub struct Details {
    /// [`Room`] itself.
    pub room: Room,

    /// [`RoomType`] of the [`Room`].
    pub room_type: RoomType,

    /// [`Amenity`]s the [`Room`] is equipped with.
    pub amenities: Vec<Amenity>,
}

/// Indicator whether a [`Room`] has no active bookings overlapping a
/// [`Stay`].
#[derive(Clone, Copy, Debug, Deref, Eq, Hash, PartialEq)]
pub struct IsAvailable(pub bool);

impl PartialEq<bool> for IsAvailable {
    fn eq(&self, other: &bool) -> bool {
        self.0 == *other
    }
}

/// Selector of [`IsAvailable`] for a [`Room`] and a [`Stay`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Availability {
    /// ID of the [`Room`] to check.
    pub room_id: room::Id,

    /// [`Stay`] to check the [`Room`] for.
    pub stay: Stay,
}

pub mod list {
    //! [`Room`]s list definitions.

    use crate::domain::{booking::Stay, hotel, room_type::Capacity};
    #[cfg(doc)]
    use crate::domain::{Hotel, Room};

    use super::Details;

    /// Filter of [`Room`]s listing, ordered by their numbers.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Hotel`] to list [`Room`]s of.
        pub hotel_id: Option<hotel::Id>,

        /// [`Stay`] the listed [`Room`]s must be free for.
        ///
        /// When set, [`Room`]s closed for booking are skipped as well.
        pub available_for: Option<Stay>,

        /// Number of guests the listed [`Room`]s must be able to host.
        pub guests: Option<Capacity>,
    }

    impl Filter {
        /// Checks whether the provided [`Room`] [`Details`] match the static
        /// part of this [`Filter`].
        ///
        /// [`Filter::available_for`] is only checked against the [`Room`]'s
        /// availability flag here, as bookings are not known to [`Details`].
        #[must_use]
        pub fn matches(&self, details: &Details) -> bool {
            self.hotel_id.map_or(true, |id| details.room.hotel_id == id)
                && (self.available_for.is_none() || details.room.is_available)
                && self
                    .guests
                    .map_or(true, |g| details.room_type.capacity.fits(g))
        }
    }
}
