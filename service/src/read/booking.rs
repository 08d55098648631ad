//! [`Booking`]-related read definitions.

use crate::domain::{customer, hotel, Booking, Hotel, Room, RoomType};
#[cfg(doc)]
use crate::domain::Customer;

/// [`Booking`] along with the booked [`Room`] and its [`Hotel`].
#[derive(Clone, Debug)]
pub struct Details {
    /// [`Booking`] itself.
    pub booking: Booking,

    /// Booked [`Room`].
    pub room: Room,

    /// [`RoomType`] of the booked [`Room`].
    pub room_type: RoomType,

    /// [`Hotel`] the booked [`Room`] belongs to.
    pub hotel: Hotel,
}

/// Selector of the latest active [`Booking`] made by a [`Customer`] in a
/// [`Hotel`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct StayedAt {
    /// ID of the [`Customer`] who made the [`Booking`].
    pub customer_id: customer::Id,

    /// ID of the [`Hotel`] the [`Booking`] was made in.
    pub hotel_id: hotel::Id,
}

pub mod list {
    //! [`Booking`]s list definitions.

    use crate::domain::customer;
    #[cfg(doc)]
    use crate::domain::{Booking, Customer};

    /// Filter of [`Booking`]s listing, ordered from the newest to the oldest.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct Filter {
        /// ID of the [`Customer`] to list [`Booking`]s of.
        pub customer_id: Option<customer::Id>,
    }
}
