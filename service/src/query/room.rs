//! [`Query`] collection related to a single [`Room`].

use common::operations::By;

use crate::{domain::room, read};
#[cfg(doc)]
use crate::{domain::Room, Query};

use super::DatabaseQuery;

/// Queries a [`Room`] with its type and amenities by its [`room::Id`].
pub type ById = DatabaseQuery<By<Option<read::room::Details>, room::Id>>;

/// Checks whether a [`Room`] has no active bookings for a stay.
pub type IsAvailable =
    DatabaseQuery<By<read::room::IsAvailable, read::room::Availability>>;
