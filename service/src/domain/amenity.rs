//! [`Amenity`] definitions.

use super::{define_id, define_text};

/// Facility a room is equipped with (Wi-Fi, balcony, minibar).
#[derive(Clone, Debug)]
pub struct Amenity {
    /// ID of this [`Amenity`].
    pub id: Id,

    /// [`Name`] of this [`Amenity`].
    pub name: Name,

    /// [`Description`] of this [`Amenity`].
    pub description: Option<Description>,
}

define_id! {
    #[doc = "ID of an [`Amenity`]."]
    Id
}

define_text! {
    #[doc = "Name of an [`Amenity`]."]
    Name(max = 100)
}

define_text! {
    #[doc = "Description of an [`Amenity`]."]
    Description(max = 500)
}
