//! [`Query`] collection related to [`Review`]s.

use common::operations::By;

use crate::domain::{hotel, Review};
#[cfg(doc)]
use crate::{domain::Hotel, Query};

use super::DatabaseQuery;

/// Queries [`Review`]s of a [`Hotel`], the newest first.
pub type ByHotel = DatabaseQuery<By<Vec<Review>, hotel::Id>>;
