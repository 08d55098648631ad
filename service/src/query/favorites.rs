//! [`Query`] collection related to [`Favorite`]s.

use common::operations::By;

use crate::{domain::customer, read::hotel::Summary};
#[cfg(doc)]
use crate::{
    domain::{Favorite, Hotel},
    Query,
};

use super::DatabaseQuery;

/// Queries [`Favorite`] [`Hotel`]s of a customer, the highest rated first.
pub type ByCustomer = DatabaseQuery<By<Vec<Summary>, customer::Id>>;
