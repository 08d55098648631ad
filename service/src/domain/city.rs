//! [`City`] definitions.

use super::{define_id, define_text};

/// City hotels are located in.
#[derive(Clone, Debug)]
pub struct City {
    /// ID of this [`City`].
    pub id: Id,

    /// [`Name`] of this [`City`].
    pub name: Name,

    /// [`Name`] of the country this [`City`] is located in.
    pub country: Name,
}

define_id! {
    #[doc = "ID of a [`City`]."]
    Id
}

define_text! {
    #[doc = "Name of a [`City`] or a country."]
    Name(max = 100)
}
