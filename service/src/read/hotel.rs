//! [`Hotel`]-related read definitions.

use common::Money;

use crate::domain::{City, Hotel};

use super::room;

/// [`Hotel`] as it appears in search results.
#[derive(Clone, Debug)]
pub struct Summary {
    /// [`Hotel`] itself.
    pub hotel: Hotel,

    /// [`City`] the [`Hotel`] is located in.
    pub city: City,

    /// The lowest nightly price among the [`Hotel`]'s rooms.
    ///
    /// [`None`] if the [`Hotel`] has no rooms.
    pub min_price: Option<Money>,
}

impl Summary {
    /// Creates a new [`Summary`] of the provided [`Hotel`] and its `rooms`.
    #[must_use]
    pub fn new(hotel: Hotel, city: City, rooms: &[room::Details]) -> Self {
        Self {
            hotel,
            city,
            min_price: rooms
                .iter()
                .map(|r| r.room_type.base_price)
                .min_by(|a, b| a.amount.cmp(&b.amount)),
        }
    }
}

/// [`Hotel`] with all its rooms.
#[derive(Clone, Debug)]
pub struct Details {
    /// [`Hotel`] itself.
    pub hotel: Hotel,

    /// [`City`] the [`Hotel`] is located in.
    pub city: City,

    /// Rooms of the [`Hotel`], ordered by their numbers.
    pub rooms: Vec<room::Details>,
}

pub mod search {
    //! [`Hotel`]s search definitions.

    use std::{cmp::Ordering, str::FromStr as _};

    use common::pagination::{self, Order};
    use rust_decimal::Decimal;
    use strum::{Display, EnumString};

    use crate::{
        domain::{
            amenity, city,
            hotel::StarRating,
            room_type::{self, Capacity},
        },
        read::room,
    };
    #[cfg(doc)]
    use crate::domain::Hotel;

    use super::Summary;

    /// Default number of [`Hotel`]s on a [`Page`].
    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    /// Arguments of a [`Page`] selection.
    pub type Arguments = pagination::Arguments;

    /// Page of found [`Hotel`]s.
    pub type Page = pagination::Page<Summary>;

    /// Selector of a [`Page`].
    pub type Selector = pagination::Selector<Filter, Sort>;

    /// Filter of [`Hotel`]s search.
    ///
    /// Every provided criterion must hold. Room-related criteria are
    /// existential: a [`Hotel`] matches if any of its rooms does, and each
    /// criterion may be satisfied by a different room.
    #[derive(Clone, Debug, Default)]
    pub struct Filter {
        /// ID of the city to search [`Hotel`]s in.
        pub city_id: Option<city::Id>,

        /// Minimal [`StarRating`] of a [`Hotel`].
        pub min_stars: Option<StarRating>,

        /// Maximal [`StarRating`] of a [`Hotel`].
        pub max_stars: Option<StarRating>,

        /// A room must cost at least this amount per night.
        pub min_price: Option<Decimal>,

        /// A room must cost at most this amount per night.
        pub max_price: Option<Decimal>,

        /// A room must have at least one of these amenities.
        pub amenities: Vec<amenity::Id>,

        /// An open room must host at least this number of guests.
        pub guests: Option<Capacity>,

        /// An open room must be of this room type.
        pub room_type_id: Option<room_type::Id>,
    }

    impl Filter {
        /// Checks whether the provided [`Hotel`] [`Summary`] with its `rooms`
        /// matches this [`Filter`].
        #[must_use]
        pub fn matches(
            &self,
            summary: &Summary,
            rooms: &[room::Details],
        ) -> bool {
            let hotel = &summary.hotel;
            let price = |r: &room::Details| r.room_type.base_price.amount;

            self.city_id.map_or(true, |id| hotel.city_id == id)
                && self.min_stars.map_or(true, |s| hotel.star_rating >= s)
                && self.max_stars.map_or(true, |s| hotel.star_rating <= s)
                && self
                    .min_price
                    .map_or(true, |p| rooms.iter().any(|r| price(r) >= p))
                && self
                    .max_price
                    .map_or(true, |p| rooms.iter().any(|r| price(r) <= p))
                && (self.amenities.is_empty()
                    || rooms.iter().any(|r| {
                        r.room
                            .amenities
                            .iter()
                            .any(|a| self.amenities.contains(a))
                    }))
                && self.guests.map_or(true, |g| {
                    rooms.iter().any(|r| {
                        r.room.is_available && r.room_type.capacity.fits(g)
                    })
                })
                && self.room_type_id.map_or(true, |id| {
                    rooms
                        .iter()
                        .any(|r| r.room.is_available && r.room.type_id == id)
                })
        }
    }

    /// Key to sort found [`Hotel`]s by.
    #[derive(
        Clone, Copy, Debug, Default, Display, EnumString, Eq, Hash, PartialEq,
    )]
    #[strum(serialize_all = "lowercase", ascii_case_insensitive)]
    pub enum SortBy {
        /// Sort by [`StarRating`].
        #[default]
        Rating,

        /// Sort by the lowest nightly room price, [`Hotel`]s without rooms
        /// go last.
        Price,

        /// Sort by name.
        Name,
    }

    impl SortBy {
        /// Parses a [`SortBy`] falling back to the [`SortBy::Rating`] for
        /// unknown keys.
        #[must_use]
        pub fn parse_or_default(key: &str) -> Self {
            Self::from_str(key.trim()).unwrap_or_default()
        }
    }

    /// Sorting of found [`Hotel`]s.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct Sort {
        /// Key to sort by.
        pub by: SortBy,

        /// [`Order`] to sort in.
        pub order: Order,
    }

    impl Default for Sort {
        fn default() -> Self {
            Self {
                by: SortBy::Rating,
                order: Order::Descending,
            }
        }
    }

    impl Sort {
        /// Compares the provided [`Summary`]s according to this [`Sort`].
        ///
        /// Ties are broken by [`Hotel`] IDs in ascending order, so the
        /// resulting order is total and stable across pages.
        #[must_use]
        pub fn compare(&self, a: &Summary, b: &Summary) -> Ordering {
            let by_key = match self.by {
                SortBy::Rating => self
                    .order
                    .apply(a.hotel.star_rating.cmp(&b.hotel.star_rating)),
                SortBy::Name => {
                    self.order.apply(a.hotel.name.cmp(&b.hotel.name))
                }
                SortBy::Price => {
                    match (a.min_price.as_ref(), b.min_price.as_ref()) {
                        (Some(a), Some(b)) => {
                            self.order.apply(a.amount.cmp(&b.amount))
                        }
                        (Some(_), None) => Ordering::Less,
                        (None, Some(_)) => Ordering::Greater,
                        (None, None) => Ordering::Equal,
                    }
                }
            };
            by_key.then_with(|| a.hotel.id.cmp(&b.hotel.id))
        }
    }
}

pub mod recommended {
    //! Definitions of [`Hotel`]s recommended to a customer.

    use std::{cmp::Ordering, collections::HashSet};

    use common::pagination::Order;

    use crate::domain::{city, customer, Hotel};

    use super::{
        search::{Sort, SortBy},
        Summary,
    };

    /// Default number of recommended [`Hotel`]s.
    pub const DEFAULT_COUNT: u32 = 5;

    /// Selector of recommended [`Hotel`]s.
    #[derive(Clone, Copy, Debug)]
    pub struct Selector {
        /// ID of the customer to recommend [`Hotel`]s to.
        pub customer_id: customer::Id,

        /// Maximum number of [`Hotel`]s to recommend.
        pub count: u32,
    }

    /// Taste of a customer, inferred from the [`Hotel`]s they booked.
    #[derive(Clone, Debug)]
    pub struct Preferences {
        /// Cities the customer stayed in.
        cities: HashSet<city::Id>,

        /// Sum of star ratings over all the bookings.
        stars_sum: i64,

        /// Number of bookings.
        bookings: i64,
    }

    impl Preferences {
        /// Infers [`Preferences`] from the [`Hotel`]s of the customer's
        /// bookings, one entry per booking.
        ///
        /// [`None`] if the customer has never booked anything.
        #[must_use]
        pub fn new<'h>(
            booked: impl IntoIterator<Item = &'h Hotel>,
        ) -> Option<Self> {
            let mut prefs = Self {
                cities: HashSet::new(),
                stars_sum: 0,
                bookings: 0,
            };
            for hotel in booked {
                _ = prefs.cities.insert(hotel.city_id);
                prefs.stars_sum += i64::from(i16::from(hotel.star_rating));
                prefs.bookings += 1;
            }
            (prefs.bookings > 0).then_some(prefs)
        }

        /// Checks whether the provided [`Hotel`] is located in a city the
        /// customer stayed in, and is rated within one star of the average
        /// rating of their bookings.
        #[must_use]
        pub fn matches(&self, hotel: &Hotel) -> bool {
            let stars = i64::from(i16::from(hotel.star_rating));

            // Compared scaled by the number of bookings to stay integral.
            self.cities.contains(&hotel.city_id)
                && (stars * self.bookings - self.stars_sum).abs()
                    <= self.bookings
        }
    }

    /// Orders recommended [`Hotel`]s: the highest rated first, ties broken
    /// by [`Hotel`] IDs.
    #[must_use]
    pub fn compare(a: &Summary, b: &Summary) -> Ordering {
        Sort {
            by: SortBy::Rating,
            order: Order::Descending,
        }
        .compare(a, b)
    }
}
