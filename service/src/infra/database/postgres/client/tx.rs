//! [`Tx`] client definitions.

use std::sync::Arc;

use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};
use tokio_postgres::{types::ToSql, Row, ToStatement};
use tracerr::Traced;

use crate::infra::database::{
    self,
    postgres::{self, connection, Connection},
};

use super::NonTx;

/// Transactional Postgres database client.
///
/// Clones share the same transaction. Dropping the last clone without
/// [`Tx::commit()`]ing rolls the transaction back.
#[derive(Clone, Debug)]
pub struct Tx {
    /// Started [`connection::Tx`], or [`None`] once committed.
    inner: Arc<Mutex<Option<connection::Tx>>>,
}

impl Tx {
    /// Checks out a [`Connection`] from the provided [`NonTx`] client and
    /// starts a transaction on it.
    ///
    /// # Errors
    ///
    /// If no [`Connection`] is available, or the transaction cannot start.
    pub async fn begin(
        client: &NonTx,
    ) -> Result<Self, Traced<database::Error>> {
        let conn = client.connection().await.map_err(tracerr::wrap!())?;
        let tx = connection::Tx::begin(conn)
            .await
            .map_err(tracerr::wrap!())?;
        Ok(Self {
            inner: Arc::new(Mutex::new(Some(tx))),
        })
    }

    /// Commits this [`Tx`] client.
    ///
    /// # Errors
    ///
    /// If this [`Tx`] client is committed already, or failed to commit its
    /// transaction.
    pub async fn commit(&self) -> Result<(), Traced<database::Error>> {
        let tx = self
            .inner
            .lock()
            .await
            .take()
            .ok_or_else(|| tracerr::new!(postgres::Error::TxFinished))
            .map_err(tracerr::map_from)?;
        tx.commit().await.map_err(tracerr::wrap!())
    }

    /// Locks the running [`connection::Tx`] for a single statement.
    ///
    /// # Errors
    ///
    /// With [`postgres::Error::TxFinished`] if this [`Tx`] client is
    /// committed already.
    async fn running(
        &self,
    ) -> Result<
        MappedMutexGuard<'_, connection::Tx>,
        Traced<database::Error>,
    > {
        MutexGuard::try_map(self.inner.lock().await, Option::as_mut)
            .map_err(|_| tracerr::new!(postgres::Error::TxFinished))
            .map_err(tracerr::map_from)
    }
}

impl Connection for Tx {
    async fn query<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.query(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn query_opt<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Row>, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.query_opt(stmt, params).await.map_err(tracerr::wrap!())
    }

    async fn exec<T>(
        &self,
        stmt: &T,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<u64, Traced<database::Error>>
    where
        T: ToStatement + ?Sized,
    {
        let tx = self.running().await.map_err(tracerr::wrap!())?;
        tx.exec(stmt, params).await.map_err(tracerr::wrap!())
    }
}
