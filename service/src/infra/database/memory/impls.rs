//! [`Database`] implementations.

use common::operations::{
    By, Commit, Delete, Insert, Lock, Select, Transact, Update,
};
use tracerr::Traced;

use crate::{
    domain::{
        booking, contact, customer, favorite, hotel, room, Amenity, Booking,
        City, Customer, Favorite, Hotel, Review, Room, RoomType,
    },
    infra::{
        database::{self, BOOKINGS_NO_OVERLAP, CUSTOMERS_EMAIL_KEY},
        Database,
    },
    read::{
        self,
        hotel::{recommended, search},
    },
};

use super::{Error, Memory, NonTx, Storage, Tx};

impl Database<Transact> for Memory<NonTx> {
    type Ok = Memory<Tx>;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(Memory(Tx::begin(&self.0).await))
    }
}

impl Database<Transact> for Memory<Tx> {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        Ok(self.clone())
    }
}

impl Database<Commit> for Memory<Tx> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.0.commit().await.map_err(tracerr::wrap!())
    }
}

/// Implements [`Database`] for [`Insert`]ing the provided entities without
/// any constraints.
macro_rules! impl_plain_insert {
    ($($entity:ident => $field:ident),* $(,)?) => {$(
        impl<S: Storage> Database<Insert<$entity>> for Memory<S> {
            type Ok = ();
            type Err = Traced<database::Error>;

            async fn execute(
                &self,
                Insert(v): Insert<$entity>,
            ) -> Result<Self::Ok, Self::Err> {
                self.0
                    .write(|s| {
                        drop(s.$field.insert(v.id, v));
                        Ok(())
                    })
                    .await
                    .map_err(tracerr::wrap!())
            }
        }
    )*};
}

impl_plain_insert! {
    City => cities,
    Hotel => hotels,
    RoomType => room_types,
    Amenity => amenities,
    Room => rooms,
    Review => reviews,
}

impl<S: Storage> Database<Insert<Customer>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(customer): Insert<Customer>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|s| {
                if s.customers.values().any(|c| c.email == customer.email) {
                    return Err(Error::ConstraintViolation(
                        CUSTOMERS_EMAIL_KEY,
                    ));
                }
                drop(s.customers.insert(customer.id, customer));
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Insert<Booking>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(booking): Insert<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|s| {
                if booking.is_active()
                    && !booking::is_available(
                        s.bookings.values(),
                        booking.room_id,
                        &booking.stay,
                    )
                {
                    return Err(Error::ConstraintViolation(
                        BOOKINGS_NO_OVERLAP,
                    ));
                }
                drop(s.bookings.insert(booking.id, booking));
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Update<Booking>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(booking): Update<Booking>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|s| {
                drop(s.bookings.insert(booking.id, booking));
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Lock<By<Room, room::Id>>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Room, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        // Transactions own the whole store already.
        Ok(())
    }
}

impl<S: Storage> Database<Lock<By<Booking, booking::Id>>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        _: Lock<By<Booking, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(())
    }
}

impl<S: Storage> Database<Select<By<Option<Hotel>, hotel::Id>>> for Memory<S> {
    type Ok = Option<Hotel>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Hotel>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| s.hotels.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<read::hotel::Details>, hotel::Id>>>
    for Memory<S>
{
    type Ok = Option<read::hotel::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::hotel::Details>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| {
                let hotel = s.hotels.get(&id)?;
                Some(read::hotel::Details {
                    city: s.cities.get(&hotel.city_id)?.clone(),
                    hotel: hotel.clone(),
                    rooms: s.hotel_rooms(id),
                })
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<search::Page, search::Selector>>>
    for Memory<S>
{
    type Ok = search::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<search::Page, search::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let search::Selector {
            arguments,
            filter,
            sort,
        } = by.into_inner();

        self.0
            .read(|s| {
                let mut found = s
                    .hotels
                    .values()
                    .filter_map(|h| {
                        let summary = s.hotel_summary(h)?;
                        let rooms = s.hotel_rooms(h.id);
                        filter.matches(&summary, &rooms).then_some(summary)
                    })
                    .collect::<Vec<_>>();
                found.sort_by(|a, b| sort.compare(a, b));

                let total_count =
                    u64::try_from(found.len()).unwrap_or(u64::MAX);
                let items: Vec<_> = arguments.apply(found).collect();
                search::Page::new(arguments, items, total_count)
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<read::room::Details>, room::Id>>>
    for Memory<S>
{
    type Ok = Option<read::room::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::room::Details>, room::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| s.room_details(s.rooms.get(&id)?))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<Select<By<Vec<read::room::Details>, read::room::list::Filter>>>
    for Memory<S>
{
    type Ok = Vec<read::room::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::room::Details>, read::room::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        self.0
            .read(|s| {
                let mut rooms = s.rooms_details();
                rooms.retain(|r| {
                    filter.matches(r)
                        && filter.available_for.map_or(true, |stay| {
                            booking::is_available(
                                s.bookings.values(),
                                r.room.id,
                                &stay,
                            )
                        })
                });
                rooms
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<Select<By<read::room::IsAvailable, read::room::Availability>>>
    for Memory<S>
{
    type Ok = read::room::IsAvailable;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::room::IsAvailable, read::room::Availability>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::room::Availability { room_id, stay } = by.into_inner();
        self.0
            .read(|s| {
                read::room::IsAvailable(booking::is_available(
                    s.bookings.values(),
                    room_id,
                    &stay,
                ))
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<Booking>, booking::Id>>>
    for Memory<S>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| s.bookings.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<Select<By<Option<read::booking::Details>, booking::Id>>>
    for Memory<S>
{
    type Ok = Option<read::booking::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<read::booking::Details>, booking::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| s.booking_details(s.bookings.get(&id)?))
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<
        Select<By<Vec<read::booking::Details>, read::booking::list::Filter>>,
    > for Memory<S>
{
    type Ok = Vec<read::booking::Details>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::booking::Details>, read::booking::list::Filter>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::list::Filter { customer_id } = by.into_inner();
        self.0
            .read(|s| {
                let mut bookings = s
                    .bookings
                    .values()
                    .filter(|b| {
                        customer_id.map_or(true, |id| b.customer_id == id)
                    })
                    .filter_map(|b| s.booking_details(b))
                    .collect::<Vec<_>>();
                bookings.sort_by(|a, b| {
                    b.booking
                        .booked_at
                        .cmp(&a.booking.booked_at)
                        .then_with(|| b.booking.id.cmp(&a.booking.id))
                });
                bookings
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<Booking>, read::booking::StayedAt>>>
    for Memory<S>
{
    type Ok = Option<Booking>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Booking>, read::booking::StayedAt>>,
    ) -> Result<Self::Ok, Self::Err> {
        let read::booking::StayedAt {
            customer_id,
            hotel_id,
        } = by.into_inner();
        self.0
            .read(|s| {
                s.bookings
                    .values()
                    .filter(|b| {
                        b.customer_id == customer_id
                            && b.is_active()
                            && s.rooms
                                .get(&b.room_id)
                                .is_some_and(|r| r.hotel_id == hotel_id)
                    })
                    .max_by(|a, b| {
                        a.booked_at
                            .cmp(&b.booked_at)
                            .then_with(|| a.id.cmp(&b.id))
                    })
                    .cloned()
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<Customer>, customer::Id>>>
    for Memory<S>
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        self.0
            .read(|s| s.customers.get(&id).cloned())
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Option<Customer>, &contact::Email>>>
    for Memory<S>
{
    type Ok = Option<Customer>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Customer>, &contact::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        self.0
            .read(|s| {
                s.customers.values().find(|c| &c.email == email).cloned()
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Select<By<Vec<Review>, hotel::Id>>> for Memory<S> {
    type Ok = Vec<Review>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<Review>, hotel::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let hotel_id = by.into_inner();
        self.0
            .read(|s| {
                let mut reviews = s
                    .reviews
                    .values()
                    .filter(|r| {
                        s.bookings
                            .get(&r.booking_id)
                            .and_then(|b| s.rooms.get(&b.room_id))
                            .is_some_and(|room| room.hotel_id == hotel_id)
                    })
                    .cloned()
                    .collect::<Vec<_>>();
                reviews.sort_by(|a, b| {
                    b.created_at
                        .cmp(&a.created_at)
                        .then_with(|| b.id.cmp(&a.id))
                });
                reviews
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Insert<Favorite>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(favorite): Insert<Favorite>,
    ) -> Result<Self::Ok, Self::Err> {
        self.0
            .write(|s| {
                // The first addition wins.
                _ = s.favorites.entry(favorite.key()).or_insert(favorite);
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage> Database<Delete<By<Favorite, favorite::Key>>> for Memory<S> {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Favorite, favorite::Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        self.0
            .write(|s| {
                drop(s.favorites.remove(&key));
                Ok(())
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<Select<By<Vec<read::hotel::Summary>, customer::Id>>>
    for Memory<S>
{
    type Ok = Vec<read::hotel::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::hotel::Summary>, customer::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let customer_id = by.into_inner();
        self.0
            .read(|s| {
                let mut hotels = s
                    .favorites
                    .values()
                    .filter(|f| f.customer_id == customer_id)
                    .filter_map(|f| {
                        s.hotel_summary(s.hotels.get(&f.hotel_id)?)
                    })
                    .collect::<Vec<_>>();
                hotels.sort_by(recommended::compare);
                hotels
            })
            .await
            .map_err(tracerr::wrap!())
    }
}

impl<S: Storage>
    Database<Select<By<Vec<read::hotel::Summary>, recommended::Selector>>>
    for Memory<S>
{
    type Ok = Vec<read::hotel::Summary>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<Vec<read::hotel::Summary>, recommended::Selector>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let recommended::Selector { customer_id, count } = by.into_inner();
        self.0
            .read(|s| {
                let booked = s
                    .bookings
                    .values()
                    .filter(|b| b.customer_id == customer_id)
                    .filter_map(|b| s.rooms.get(&b.room_id))
                    .filter_map(|r| s.hotels.get(&r.hotel_id));
                let Some(prefs) = recommended::Preferences::new(booked) else {
                    return vec![];
                };

                let mut hotels = s
                    .hotels
                    .values()
                    .filter(|h| prefs.matches(h))
                    .filter_map(|h| s.hotel_summary(h))
                    .collect::<Vec<_>>();
                hotels.sort_by(recommended::compare);
                hotels.truncate(usize::try_from(count).unwrap_or(usize::MAX));
                hotels
            })
            .await
            .map_err(tracerr::wrap!())
    }
}
