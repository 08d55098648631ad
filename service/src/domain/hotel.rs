//! [`Hotel`] definitions.

use std::str::FromStr;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{Display, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};

use super::{city, contact, define_id, define_text};

/// Hotel with bookable rooms.
#[derive(Clone, Debug)]
pub struct Hotel {
    /// ID of this [`Hotel`].
    pub id: Id,

    /// [`Name`] of this [`Hotel`].
    pub name: Name,

    /// [`StarRating`] of this [`Hotel`].
    pub star_rating: StarRating,

    /// [`Description`] of this [`Hotel`].
    pub description: Option<Description>,

    /// Phone number of this [`Hotel`].
    pub phone: Option<contact::Phone>,

    /// Email address of this [`Hotel`].
    pub email: Option<contact::Email>,

    /// URL of this [`Hotel`] main image.
    pub image_url: Option<ImageUrl>,

    /// [`Street`] address of this [`Hotel`].
    pub street: Street,

    /// ID of the city this [`Hotel`] is located in.
    pub city_id: city::Id,

    /// [`DateTime`] when this [`Hotel`] was created.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Hotel`]."]
    Id
}

define_text! {
    #[doc = "Name of a [`Hotel`]."]
    Name(max = 200)
}

define_text! {
    #[doc = "Description of a [`Hotel`]."]
    Description(max = 4000)
}

define_text! {
    #[doc = "Street address of a [`Hotel`]."]
    Street(max = 300)
}

define_text! {
    #[doc = "URL of a [`Hotel`] image."]
    ImageUrl(max = 2048)
}

/// Official star rating of a [`Hotel`], from 1 to 5.
#[derive(
    Clone, Copy, Debug, Display, Eq, Hash, Into, Ord, PartialEq, PartialOrd,
)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct StarRating(i16);

impl StarRating {
    /// Lowest possible [`StarRating`].
    pub const MIN: Self = Self(1);

    /// Highest possible [`StarRating`].
    pub const MAX: Self = Self(5);

    /// Creates a new [`StarRating`] if the given number of `stars` is in
    /// `1..=5` range.
    #[must_use]
    pub fn new(stars: i16) -> Option<Self> {
        (Self::MIN.0..=Self::MAX.0)
            .contains(&stars)
            .then_some(Self(stars))
    }
}

impl FromStr for StarRating {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse()
            .ok()
            .and_then(Self::new)
            .ok_or("invalid `StarRating`")
    }
}

/// [`DateTime`] when a [`Hotel`] was created.
pub type CreationDateTime = DateTimeOf<(Hotel, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::StarRating;

    #[test]
    fn star_rating_is_bounded() {
        assert!(StarRating::new(0).is_none());
        assert!(StarRating::new(6).is_none());
        assert_eq!(StarRating::new(1), Some(StarRating::MIN));
        assert_eq!(StarRating::new(5), Some(StarRating::MAX));
        assert!("4".parse::<StarRating>().is_ok());
        assert!("four".parse::<StarRating>().is_err());
    }
}
