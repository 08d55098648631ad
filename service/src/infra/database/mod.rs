//! [`Database`]-related implementations.

#[cfg(any(test, feature = "memory"))]
pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

use derive_more::{Display, Error as StdError, From};

use crate::{Classify, ErrorKind};

#[cfg(any(test, feature = "memory"))]
pub use self::memory::Memory;
#[cfg(feature = "postgres")]
pub use self::postgres::Postgres;

/// Database operation.
pub use common::Handler as Database;

/// Name of the constraint forbidding overlapping active bookings of the same
/// room.
pub const BOOKINGS_NO_OVERLAP: &str = "bookings_no_overlap";

/// Name of the constraint keeping customers' emails unique.
pub const CUSTOMERS_EMAIL_KEY: &str = "customers_email_key";

/// [`Database`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// [`Memory`] error.
    #[cfg(any(test, feature = "memory"))]
    Memory(memory::Error),

    /// [`Postgres`] error.
    #[cfg(feature = "postgres")]
    Postgres(postgres::Error),
}

impl Error {
    /// Checks whether this [`Error`] is caused by violating the provided
    /// unique or exclusion `constraint`.
    #[must_use]
    pub fn is_violation_of(&self, constraint: &str) -> bool {
        match *self {
            #[cfg(any(test, feature = "memory"))]
            Self::Memory(ref e) => e.is_violation_of(constraint),
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_violation_of(constraint),
        }
    }

    /// Checks whether this [`Error`] is caused by an attempt to book a room
    /// already booked for an overlapping stay.
    #[must_use]
    pub fn is_booking_overlap(&self) -> bool {
        self.is_violation_of(BOOKINGS_NO_OVERLAP)
    }

    /// Checks whether this [`Error`] is caused by the data store being
    /// unreachable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        match *self {
            #[cfg(any(test, feature = "memory"))]
            Self::Memory(_) => false,
            #[cfg(feature = "postgres")]
            Self::Postgres(ref e) => e.is_connectivity(),
        }
    }
}

impl Classify for Error {
    fn kind(&self) -> ErrorKind {
        if self.is_connectivity() {
            ErrorKind::DataStoreUnavailable
        } else {
            ErrorKind::Unclassified
        }
    }
}
