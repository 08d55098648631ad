//! In-memory [`Database`] implementation.
//!
//! Keeps all the data in [`HashMap`]s behind a single store-wide lock, so a
//! transaction owns the whole store until it's committed or dropped.

mod impls;

use std::{collections::HashMap, future::Future, sync::Arc};

use derive_more::{Display, Error as StdError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracerr::Traced;

use crate::{
    domain::{
        amenity, booking, city, customer, favorite, hotel, review, room,
        room_type, Amenity, Booking, City, Customer, Favorite, Hotel, Review,
        Room, RoomType,
    },
    infra::database,
    read,
};
#[cfg(doc)]
use crate::infra::Database;

/// In-memory [`Database`].
#[derive(Clone, Debug, Default)]
pub struct Memory<T = NonTx>(T);

/// Data stored in a [`Memory`] database.
#[derive(Clone, Debug, Default)]
pub struct State {
    /// Stored [`City`]s.
    cities: HashMap<city::Id, City>,

    /// Stored [`Hotel`]s.
    hotels: HashMap<hotel::Id, Hotel>,

    /// Stored [`RoomType`]s.
    room_types: HashMap<room_type::Id, RoomType>,

    /// Stored [`Amenity`]s.
    amenities: HashMap<amenity::Id, Amenity>,

    /// Stored [`Room`]s.
    rooms: HashMap<room::Id, Room>,

    /// Stored [`Customer`]s.
    customers: HashMap<customer::Id, Customer>,

    /// Stored [`Booking`]s.
    bookings: HashMap<booking::Id, Booking>,

    /// Stored [`Review`]s.
    reviews: HashMap<review::Id, Review>,

    /// Stored [`Favorite`]s.
    favorites: HashMap<favorite::Key, Favorite>,
}

impl State {
    /// Joins the provided [`Room`] with its [`RoomType`] and [`Amenity`]s.
    ///
    /// [`None`] if the [`RoomType`] is not stored.
    fn room_details(&self, room: &Room) -> Option<read::room::Details> {
        Some(read::room::Details {
            room: room.clone(),
            room_type: self.room_types.get(&room.type_id)?.clone(),
            amenities: room
                .amenities
                .iter()
                .filter_map(|id| self.amenities.get(id).cloned())
                .collect(),
        })
    }

    /// Returns [`read::room::Details`] of all the [`Room`]s ordered by their
    /// numbers.
    fn rooms_details(&self) -> Vec<read::room::Details> {
        let mut rooms = self
            .rooms
            .values()
            .filter_map(|r| self.room_details(r))
            .collect::<Vec<_>>();
        rooms.sort_by(|a, b| {
            a.room
                .number
                .cmp(&b.room.number)
                .then_with(|| a.room.id.cmp(&b.room.id))
        });
        rooms
    }

    /// Returns [`read::room::Details`] of the provided [`Hotel`]'s [`Room`]s
    /// ordered by their numbers.
    fn hotel_rooms(&self, hotel_id: hotel::Id) -> Vec<read::room::Details> {
        let mut rooms = self.rooms_details();
        rooms.retain(|r| r.room.hotel_id == hotel_id);
        rooms
    }

    /// Joins the provided [`Hotel`] with its [`City`] and the lowest price
    /// of its [`Room`]s.
    fn hotel_summary(&self, hotel: &Hotel) -> Option<read::hotel::Summary> {
        let city = self.cities.get(&hotel.city_id)?.clone();
        let rooms = self.hotel_rooms(hotel.id);
        Some(read::hotel::Summary::new(hotel.clone(), city, &rooms))
    }

    /// Joins the provided [`Booking`] with its [`Room`] and [`Hotel`].
    fn booking_details(
        &self,
        booking: &Booking,
    ) -> Option<read::booking::Details> {
        let room = self.room_details(self.rooms.get(&booking.room_id)?)?;
        Some(read::booking::Details {
            booking: booking.clone(),
            hotel: self.hotels.get(&room.room.hotel_id)?.clone(),
            room: room.room,
            room_type: room.room_type,
        })
    }
}

/// Access to the [`State`] of a [`Memory`] database.
pub trait Storage {
    /// Reads the [`State`] with the provided function.
    fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;

    /// Modifies the [`State`] with the provided function.
    fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> impl Future<Output = Result<R, Traced<database::Error>>>;
}

/// Non-transactional [`Storage`] applying changes immediately.
#[derive(Clone, Debug, Default)]
pub struct NonTx {
    /// Shared [`State`].
    state: Arc<Mutex<State>>,
}

impl Storage for NonTx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        Ok(f(&*self.state.lock().await))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        f(&mut *self.state.lock().await)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// [`State`] changed inside a transaction.
#[derive(Debug)]
struct Staged {
    /// Guard holding the shared [`State`] for the whole transaction.
    guard: OwnedMutexGuard<State>,

    /// Copy of the shared [`State`] the changes are applied to.
    state: State,
}

/// Transactional [`Storage`] applying changes on [`Tx::commit()`].
///
/// Clones share the same transaction. Dropping the last clone without
/// committing discards the changes.
#[derive(Clone, Debug)]
pub struct Tx {
    /// [`Staged`] changes, or [`None`] once committed.
    inner: Arc<Mutex<Option<Staged>>>,
}

impl Tx {
    /// Begins a new [`Tx`] over the [`State`] of the provided [`NonTx`].
    async fn begin(non_tx: &NonTx) -> Self {
        let guard = Arc::clone(&non_tx.state).lock_owned().await;
        let state = guard.clone();
        Self {
            inner: Arc::new(Mutex::new(Some(Staged { guard, state }))),
        }
    }

    /// Commits this [`Tx`], making its changes visible.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] is committed already.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let Staged { mut guard, state } = self
            .inner
            .lock()
            .await
            .take()
            .ok_or_else(|| tracerr::new!(Error::TxFinished))
            .map_err(tracerr::map_from)?;
        *guard = state;
        Ok(())
    }
}

impl Storage for Tx {
    async fn read<R>(
        &self,
        f: impl FnOnce(&State) -> R,
    ) -> Result<R, Traced<database::Error>> {
        let inner = self.inner.lock().await;
        let staged = inner
            .as_ref()
            .ok_or_else(|| tracerr::new!(Error::TxFinished))
            .map_err(tracerr::map_from)?;
        Ok(f(&staged.state))
    }

    async fn write<R>(
        &self,
        f: impl FnOnce(&mut State) -> Result<R, Error>,
    ) -> Result<R, Traced<database::Error>> {
        let mut inner = self.inner.lock().await;
        let staged = inner
            .as_mut()
            .ok_or_else(|| tracerr::new!(Error::TxFinished))
            .map_err(tracerr::map_from)?;
        f(&mut staged.state)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// In-memory [`Database`] error.
#[derive(Clone, Copy, Debug, Display, StdError)]
pub enum Error {
    /// Transaction is used after being committed.
    #[display("Transaction is already finished")]
    TxFinished,

    /// Stored data violates the named constraint.
    #[display("Constraint `{_0}` is violated")]
    ConstraintViolation(#[error(not(source))] &'static str),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of the provided
    /// `constraint`.
    #[must_use]
    pub fn is_violation_of(&self, constraint: &str) -> bool {
        match self {
            Self::ConstraintViolation(c) => *c == constraint,
            Self::TxFinished => false,
        }
    }
}
