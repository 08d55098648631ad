//! [`Room`] definitions.

use super::{amenity, define_id, define_text, hotel, room_type};
#[cfg(doc)]
use super::{Amenity, Hotel, RoomType};

/// Bookable room of a [`Hotel`].
#[derive(Clone, Debug)]
pub struct Room {
    /// ID of this [`Room`].
    pub id: Id,

    /// ID of the [`Hotel`] this [`Room`] belongs to.
    pub hotel_id: hotel::Id,

    /// ID of the [`RoomType`] of this [`Room`].
    pub type_id: room_type::Id,

    /// [`Number`] of this [`Room`] in its [`Hotel`].
    pub number: Number,

    /// Floor this [`Room`] is located on.
    pub floor: Option<i16>,

    /// Indicator whether this [`Room`] is open for booking at all.
    ///
    /// Doesn't reflect existing bookings.
    pub is_available: bool,

    /// IDs of [`Amenity`]s this [`Room`] is equipped with.
    pub amenities: Vec<amenity::Id>,
}

define_id! {
    #[doc = "ID of a [`Room`]."]
    Id
}

define_text! {
    #[doc = "Number (label) of a [`Room`], like `101` or `B-12`."]
    Number(max = 20)
}
