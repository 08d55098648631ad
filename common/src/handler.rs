//! [`Handler`] abstraction.
//!
//! Commands, queries, database operations and notifications are all expressed
//! as a [`Handler`] of some argument type, so a single type may handle many
//! operations, each with its own result.

use std::future::Future;

/// Asynchronous handler of `Args`.
pub trait Handler<Args = ()> {
    /// Type of a successful result.
    type Ok;

    /// Type of an error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
