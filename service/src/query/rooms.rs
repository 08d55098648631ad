//! [`Query`] collection related to multiple [`Room`]s.

use common::operations::By;

use crate::read;
#[cfg(doc)]
use crate::{domain::Room, Query};

use super::DatabaseQuery;

/// Queries a list of [`Room`]s.
pub type List =
    DatabaseQuery<By<Vec<read::room::Details>, read::room::list::Filter>>;
