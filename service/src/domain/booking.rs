//! [`Booking`] definitions.
//!
//! A [`Booking`] reserves a [`Room`] for a [`Stay`], which is a half-open
//! interval of dates: guests check in on [`Stay::check_in()`] and leave on
//! [`Stay::check_out()`], so the check-out day is free for the next guests.
//!
//! [`Room`]: crate::domain::Room

use common::{define_kind, unit, Date, DateTimeOf, Money};
#[cfg(doc)]
use common::DateTime;
use derive_more::{Display, Error};

#[cfg(doc)]
use super::Customer;
use super::{customer, define_id, room};

/// Reservation of a room by a [`Customer`].
#[derive(Clone, Debug)]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: Id,

    /// ID of the [`Customer`] who made this [`Booking`].
    pub customer_id: customer::Id,

    /// ID of the booked room.
    pub room_id: room::Id,

    /// [`Stay`] this [`Booking`] reserves the room for.
    pub stay: Stay,

    /// Total price of this [`Booking`].
    pub total_price: Money,

    /// [`Status`] of this [`Booking`].
    pub status: Status,

    /// [`DateTime`] when this [`Booking`] was made.
    pub booked_at: CreationDateTime,
}

impl Booking {
    /// Indicates whether this [`Booking`] still holds its room, so blocks
    /// other [`Booking`]s of overlapping [`Stay`]s.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status != Status::Cancelled
    }

    /// Moves this [`Booking`] to the provided [`Status`].
    ///
    /// # Errors
    ///
    /// With [`InvalidTransition`] if the current [`Status`] cannot be changed
    /// to the provided one, leaving this [`Booking`] untouched.
    pub fn transition(&mut self, to: Status) -> Result<(), InvalidTransition> {
        if !self.status.can_become(to) {
            return Err(InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

define_id! {
    #[doc = "ID of a [`Booking`]."]
    Id
}

define_kind! {
    #[doc = "Status of a [`Booking`]."]
    enum Status {
        #[doc = "[`Booking`] is made, but not paid yet."]
        Confirmed = 1,

        #[doc = "[`Booking`] is paid."]
        Paid = 2,

        #[doc = "[`Booking`] is cancelled and doesn't hold its room anymore."]
        Cancelled = 3,
    }
}

impl Status {
    /// Indicates whether this [`Status`] can be changed to the provided one.
    ///
    /// Only a [`Status::Confirmed`] [`Booking`] may be paid or cancelled,
    /// other statuses are terminal.
    #[must_use]
    pub const fn can_become(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Confirmed, Self::Paid | Self::Cancelled),
        )
    }
}

/// Error of an impossible [`Status`] change.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display("`Booking` cannot become `{to}` from `{from}`")]
pub struct InvalidTransition {
    /// [`Status`] the [`Booking`] has.
    #[error(not(source))]
    pub from: Status,

    /// [`Status`] requested for the [`Booking`].
    pub to: Status,
}

/// Half-open `[check_in, check_out)` interval of dates a room is reserved
/// for.
///
/// It always spans at least a single night.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Stay {
    /// [`Date`] of the arrival.
    check_in: Date,

    /// [`Date`] of the departure.
    check_out: Date,
}

impl Stay {
    /// Creates a new [`Stay`].
    ///
    /// # Errors
    ///
    /// With [`InvalidStay`] if `check_out` is not after `check_in`.
    pub fn new(check_in: Date, check_out: Date) -> Result<Self, InvalidStay> {
        if check_in < check_out {
            Ok(Self {
                check_in,
                check_out,
            })
        } else {
            Err(InvalidStay {
                check_in,
                check_out,
            })
        }
    }

    /// Returns the [`Date`] of the arrival.
    #[must_use]
    pub const fn check_in(&self) -> Date {
        self.check_in
    }

    /// Returns the [`Date`] of the departure.
    #[must_use]
    pub const fn check_out(&self) -> Date {
        self.check_out
    }

    /// Returns the number of nights of this [`Stay`].
    #[must_use]
    pub fn nights(&self) -> u32 {
        // Positive by construction, and a date range fits into `u32` days.
        u32::try_from(self.check_in.days_until(self.check_out))
            .unwrap_or(u32::MAX)
    }

    /// Indicates whether this [`Stay`] shares at least one night with the
    /// `other` one.
    ///
    /// Back-to-back [`Stay`]s (one checks out when the other checks in) don't
    /// overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// Returns the total price of this [`Stay`] with the provided `nightly`
    /// price.
    ///
    /// [`None`] is returned on overflow.
    #[must_use]
    pub fn price(&self, nightly: Money) -> Option<Money> {
        nightly.times(self.nights())
    }
}

/// Error of creating a [`Stay`] out of a reversed or empty date range.
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
#[display(
    "check-out date `{check_out}` must be after check-in date `{check_in}`"
)]
pub struct InvalidStay {
    /// Requested check-in [`Date`].
    #[error(not(source))]
    pub check_in: Date,

    /// Requested check-out [`Date`].
    pub check_out: Date,
}

/// Error of [`compute_price()`].
#[derive(Clone, Copy, Debug, Display, Eq, Error, PartialEq)]
pub enum PriceError {
    /// Date range is empty or reversed.
    #[display("{_0}")]
    InvalidStay(InvalidStay),

    /// Total price doesn't fit into [`Money`].
    #[display("total price overflows")]
    Overflow,
}

/// Computes the total price of staying from `check_in` till `check_out` with
/// the provided `nightly` price.
///
/// # Errors
///
/// - [`PriceError::InvalidStay`] if `check_out` is not after `check_in`;
/// - [`PriceError::Overflow`] if the total price doesn't fit into [`Money`].
pub fn compute_price(
    nightly: Money,
    check_in: Date,
    check_out: Date,
) -> Result<Money, PriceError> {
    Stay::new(check_in, check_out)
        .map_err(PriceError::InvalidStay)?
        .price(nightly)
        .ok_or(PriceError::Overflow)
}

/// Indicates whether the room can be booked for the provided [`Stay`], given
/// the existing `bookings`.
///
/// Only active [`Booking`]s of the same room are taken into account.
#[must_use]
pub fn is_available<'b>(
    bookings: impl IntoIterator<Item = &'b Booking>,
    room_id: room::Id,
    stay: &Stay,
) -> bool {
    !bookings.into_iter().any(|b| {
        b.room_id == room_id && b.is_active() && b.stay.overlaps(stay)
    })
}

/// [`DateTime`] when a [`Booking`] was made.
pub type CreationDateTime = DateTimeOf<(Booking, unit::Creation)>;

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use common::{money::Currency, Date, DateTime, Money};
    use rust_decimal::Decimal;

    use crate::domain::{customer, room};

    use super::{
        compute_price, is_available, Booking, Id, InvalidTransition,
        PriceError, Status, Stay,
    };

    fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    fn stay(from: &str, to: &str) -> Stay {
        Stay::new(date(from), date(to)).unwrap()
    }

    fn usd(amount: i64) -> Money {
        Money::new(Decimal::from(amount), Currency::Usd)
    }

    fn booking(room_id: room::Id, stay: Stay, status: Status) -> Booking {
        Booking {
            id: Id::new(),
            customer_id: customer::Id::new(),
            room_id,
            stay,
            total_price: usd(100),
            status,
            booked_at: DateTime::now().coerce(),
        }
    }

    #[test]
    fn stay_requires_at_least_one_night() {
        assert!(Stay::new(date("2025-01-05"), date("2025-01-05")).is_err());
        assert!(Stay::new(date("2025-01-08"), date("2025-01-05")).is_err());
        assert_eq!(stay("2025-01-05", "2025-01-06").nights(), 1);
        assert_eq!(stay("2024-12-30", "2025-01-02").nights(), 3);
    }

    #[test]
    fn overlap_is_half_open() {
        let booked = stay("2025-01-05", "2025-01-08");

        assert!(booked.overlaps(&stay("2025-01-06", "2025-01-10")));
        assert!(booked.overlaps(&stay("2025-01-01", "2025-01-06")));
        assert!(booked.overlaps(&stay("2025-01-06", "2025-01-07")));
        assert!(booked.overlaps(&stay("2025-01-01", "2025-01-10")));
        assert!(booked.overlaps(&booked));

        assert!(!booked.overlaps(&stay("2025-01-08", "2025-01-10")));
        assert!(!booked.overlaps(&stay("2025-01-01", "2025-01-05")));
        assert!(!stay("2025-01-08", "2025-01-10").overlaps(&booked));
    }

    #[test]
    fn computes_price() {
        assert_eq!(
            compute_price(usd(100), date("2025-01-01"), date("2025-01-03")),
            Ok(usd(200)),
        );
        assert_eq!(
            compute_price(usd(100), date("2025-01-08"), date("2025-01-10")),
            Ok(usd(200)),
        );
        assert!(matches!(
            compute_price(usd(100), date("2025-01-03"), date("2025-01-03")),
            Err(PriceError::InvalidStay(_)),
        ));
        assert!(matches!(
            compute_price(usd(100), date("2025-01-03"), date("2025-01-01")),
            Err(PriceError::InvalidStay(_)),
        ));
    }

    #[test]
    fn availability_ignores_cancelled_and_other_rooms() {
        let room_id = room::Id::new();
        let other_room_id = room::Id::new();
        let requested = stay("2025-01-06", "2025-01-10");

        assert!(is_available([], room_id, &requested));

        let cancelled = booking(
            room_id,
            stay("2025-01-05", "2025-01-08"),
            Status::Cancelled,
        );
        let other_room = booking(
            other_room_id,
            stay("2025-01-05", "2025-01-08"),
            Status::Confirmed,
        );
        assert!(is_available([&cancelled, &other_room], room_id, &requested));

        let paid =
            booking(room_id, stay("2025-01-05", "2025-01-08"), Status::Paid);
        assert!(!is_available([&cancelled, &paid], room_id, &requested));
        assert!(is_available(
            [&paid],
            room_id,
            &stay("2025-01-08", "2025-01-10"),
        ));
    }

    #[test]
    fn only_confirmed_bookings_transition() {
        let mut b = booking(
            room::Id::new(),
            stay("2025-01-05", "2025-01-08"),
            Status::Confirmed,
        );
        assert_eq!(b.transition(Status::Paid), Ok(()));
        assert_eq!(b.status, Status::Paid);

        assert_eq!(
            b.transition(Status::Cancelled),
            Err(InvalidTransition {
                from: Status::Paid,
                to: Status::Cancelled,
            }),
        );
        assert_eq!(b.status, Status::Paid);

        let mut b = booking(
            room::Id::new(),
            stay("2025-01-05", "2025-01-08"),
            Status::Cancelled,
        );
        assert!(b.transition(Status::Confirmed).is_err());
        assert!(b.transition(Status::Paid).is_err());
        assert_eq!(b.status, Status::Cancelled);

        assert!(!Status::Confirmed.can_become(Status::Confirmed));
        assert!(Status::Confirmed.can_become(Status::Cancelled));
    }
}
