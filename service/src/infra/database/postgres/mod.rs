//! Postgres [`Database`] implementation.

pub mod client;
pub mod connection;
mod impls;

use deadpool_postgres::Runtime;
use derive_more::{Deref, Display, Error as StdError, From};
use tokio_postgres::{error::SqlState, NoTls};
use tracerr::Traced;

use crate::{domain::booking, infra::database};
#[cfg(doc)]
use crate::infra::Database;

pub use refinery::embed_migrations;

pub use self::{
    client::{NonTx, Tx},
    connection::Connection,
};

pub use deadpool_postgres::{Config, PoolConfig};

/// [`Database`] backed by Postgres, either pooled ([`NonTx`]) or running
/// inside a transaction ([`Tx`]).
#[derive(Clone, Debug, Deref)]
pub struct Postgres<T = NonTx>(T);

impl Postgres {
    /// Sets up a connection pool with the provided [`Config`].
    ///
    /// Connections are opened lazily, so an unreachable server is only
    /// reported by the first statement.
    ///
    /// # Errors
    ///
    /// If the [`Config`] is inconsistent.
    pub fn new(conf: &Config) -> Result<Self, Traced<database::Error>> {
        let pool = conf
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self(NonTx::from_pool(pool)))
    }
}

/// Failure of a Postgres operation.
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// Statement failed, or the server closed the connection.
    #[display("Postgres statement failed: {_0}")]
    Connection(connection::Error),

    /// [`Config`] cannot produce a [`connection::Pool`].
    #[display("Cannot set up Postgres pool: {_0}")]
    PoolCreationError(connection::PoolCreationError),

    /// No pooled [`Connection`] could be checked out.
    #[display("Postgres pool failed: {_0}")]
    PoolError(connection::PoolError),

    /// Statement issued on a committed transaction.
    #[display("Postgres transaction is already committed")]
    #[from(ignore)]
    TxFinished,

    /// Stored [`Stay`] of a booking is malformed.
    ///
    /// [`Stay`]: crate::domain::booking::Stay
    #[display("Malformed stored `Stay`: {_0}")]
    MalformedStay(booking::InvalidStay),
}

impl Error {
    /// Checks whether this [`Error`] is a violation of the provided unique or
    /// exclusion `constraint`.
    #[must_use]
    pub fn is_violation_of(&self, constraint: &str) -> bool {
        match self {
            Self::Connection(e) => {
                e.code().is_some_and(|c| {
                    *c == SqlState::UNIQUE_VIOLATION
                        || *c == SqlState::EXCLUSION_VIOLATION
                }) && e.as_db_error().and_then(|e| e.constraint())
                    == Some(constraint)
            }
            Self::PoolError(..)
            | Self::PoolCreationError(..)
            | Self::TxFinished
            | Self::MalformedStay(..) => false,
        }
    }

    /// Checks whether this [`Error`] is caused by the database being
    /// unreachable.
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        match self {
            Self::Connection(e) => {
                e.is_closed()
                    || e.source().is_some_and(|s| s.is::<std::io::Error>())
            }
            Self::PoolError(..) => true,
            Self::PoolCreationError(..)
            | Self::TxFinished
            | Self::MalformedStay(..) => false,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{Classify as _, ErrorKind};

    use super::{Config, Postgres};

    #[test]
    fn misconfiguration_is_not_unavailability() {
        let conf = Config {
            dbname: Some(String::new()),
            ..Config::default()
        };

        let err = Postgres::new(&conf).unwrap_err();

        assert!(!err.as_ref().is_connectivity());
        assert_eq!(err.kind(), ErrorKind::Unclassified);
    }
}
