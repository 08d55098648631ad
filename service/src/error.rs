//! Semantic classification of [`Service`] errors.
//!
//! [`Service`]: crate::Service

use derive_more::Display;
use tracerr::Traced;

/// Semantic kind of an error, allowing callers to branch on its meaning
/// rather than on its concrete type.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Requested entity does not exist.
    #[display("not found")]
    NotFound,

    /// Operation conflicts with the current state of an entity.
    #[display("invalid state")]
    InvalidState,

    /// Provided date range is empty or reversed.
    #[display("invalid range")]
    InvalidRange,

    /// Provided credentials or session are not valid.
    #[display("unauthorized")]
    Unauthorized,

    /// Data store cannot be reached.
    #[display("data store unavailable")]
    DataStoreUnavailable,

    /// Error doesn't fall into any other kind.
    #[display("unclassified")]
    Unclassified,
}

/// Classification of an error into an [`ErrorKind`].
pub trait Classify {
    /// Returns the [`ErrorKind`] of this error.
    fn kind(&self) -> ErrorKind;
}

impl<E: Classify> Classify for Traced<E> {
    fn kind(&self) -> ErrorKind {
        self.as_ref().kind()
    }
}
