//! [`Query`] collection related to a single [`Booking`].

use common::operations::By;

use crate::{domain::booking, read};
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries a [`Booking`] with its room and hotel by its [`booking::Id`].
pub type ById =
    DatabaseQuery<By<Option<read::booking::Details>, booking::Id>>;
