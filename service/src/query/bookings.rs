//! [`Query`] collection related to multiple [`Booking`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Booking, Query};

use super::DatabaseQuery;

/// Queries a list of [`Booking`]s, the newest first.
pub type List = DatabaseQuery<
    By<Vec<read::booking::Details>, read::booking::list::Filter>,
>;
