//! [`Query`] collection related to multiple [`Hotel`]s.

use common::operations::By;

use crate::read::hotel::{recommended, search, Summary};
#[cfg(doc)]
use crate::{domain::Hotel, Query};

use super::DatabaseQuery;

/// Searches a [`search::Page`] of [`Hotel`]s.
pub type Search = DatabaseQuery<By<search::Page, search::Selector>>;

/// Queries [`Hotel`]s resembling the ones a customer booked, the highest
/// rated first.
pub type Recommended = DatabaseQuery<By<Vec<Summary>, recommended::Selector>>;
