//! [`Query`] collection related to a single [`Hotel`].

use common::operations::By;

use crate::{
    domain::{hotel, Hotel},
    read,
};
#[cfg(doc)]
use crate::Query;

use super::DatabaseQuery;

/// Queries a [`Hotel`] by its [`hotel::Id`].
pub type ById = DatabaseQuery<By<Option<Hotel>, hotel::Id>>;

/// Queries a [`Hotel`] with its city and rooms by its [`hotel::Id`].
pub type Details = DatabaseQuery<By<Option<read::hotel::Details>, hotel::Id>>;
