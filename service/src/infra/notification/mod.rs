//! [`Notifier`]-related implementations.

mod log;
#[cfg(any(test, feature = "memory"))]
mod recorder;

use derive_more::{Display, Error as StdError};

use crate::domain::{booking, Booking};

#[cfg(any(test, feature = "memory"))]
pub use self::recorder::Recorder;
pub use self::log::Log;

/// Notification delivery.
pub use common::Handler as Notifier;

/// Event worth notifying a customer about.
#[derive(Clone, Debug)]
pub enum Event {
    /// [`Booking`] has been made.
    BookingConfirmed(Booking),

    /// [`Booking`] has been cancelled.
    BookingCancelled(Booking),

    /// [`booking::Status`] of a [`Booking`] has been changed.
    BookingStatusUpdated {
        /// [`Booking`] with the new [`booking::Status`].
        booking: Booking,

        /// Previous [`booking::Status`] of the [`Booking`].
        from: booking::Status,
    },
}

impl Event {
    /// Returns the [`Booking`] this [`Event`] is about.
    #[must_use]
    pub fn booking(&self) -> &Booking {
        match self {
            Self::BookingConfirmed(b)
            | Self::BookingCancelled(b)
            | Self::BookingStatusUpdated { booking: b, .. } => b,
        }
    }
}

/// [`Notifier`] error.
#[derive(Clone, Debug, Display, StdError)]
pub enum Error {
    /// Notification cannot be delivered.
    #[display("notification is not delivered: {_0}")]
    Undelivered(#[error(not(source))] String),
}
