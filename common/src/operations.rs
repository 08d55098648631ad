//! Abstract operations a [`Handler`] may execute.
//!
//! Each operation is a plain wrapper, so the type of its payload decides
//! which [`Handler`] implementation runs it.

use std::marker::PhantomData;

use crate::Handler;

/// Selects something, usually [`By`] some key.
#[derive(Clone, Copy, Debug)]
pub struct Select<T>(pub T);

/// Stores a new value.
#[derive(Clone, Copy, Debug)]
pub struct Insert<T>(pub T);

/// Overwrites a stored value.
#[derive(Clone, Copy, Debug)]
pub struct Update<T>(pub T);

/// Removes a stored value, usually found [`By`] some key.
#[derive(Clone, Copy, Debug)]
pub struct Delete<T>(pub T);

/// Locks a stored value until the current transaction finishes, so that
/// concurrent transactions touching it are serialized.
#[derive(Clone, Copy, Debug)]
pub struct Lock<T>(pub T);

/// Hands a value over for delivery to the outside world.
#[derive(Clone, Copy, Debug)]
pub struct Notify<T>(pub T);

/// Starts a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Transact;

/// Commits a transaction.
#[derive(Clone, Copy, Debug)]
pub struct Commit;

/// Transactional version of a [`Handler`], as returned by [`Transact`].
pub type Transacted<H> = <H as Handler<Transact>>::Ok;

/// Key `K` to look up a `W` by.
///
/// `W` only tags the lookup, so `By<Option<Room>, room::Id>` and
/// `By<Vec<Booking>, room::Id>` are different operations.
#[derive(Clone, Copy, Debug)]
pub struct By<W, K> {
    /// Key to look up by.
    key: K,

    /// Type of the looked up value.
    _what: PhantomData<W>,
}

impl<W, K> By<W, K> {
    /// Creates a new lookup by the provided `key`.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self {
            key,
            _what: PhantomData,
        }
    }

    /// Returns the key of this lookup.
    #[must_use]
    pub fn into_inner(self) -> K {
        self.key
    }
}
