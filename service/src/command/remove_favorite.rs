//! [`Command`] for unmarking a [`Favorite`] [`Hotel`].

use common::operations::{By, Delete};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::{Customer, Hotel};
use crate::{
    domain::{customer, favorite, hotel, Favorite},
    infra::{database, Database},
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for unmarking a [`Favorite`] [`Hotel`] of a [`Customer`].
///
/// Unmarking a [`Hotel`] which is not a [`Favorite`] is a no-op.
#[derive(Clone, Copy, Debug)]
pub struct RemoveFavorite {
    /// ID of the [`Customer`] unmarking the [`Hotel`].
    pub customer_id: customer::Id,

    /// ID of the [`Hotel`] to unmark.
    pub hotel_id: hotel::Id,
}

impl<Db, Ntf> Command<RemoveFavorite> for Service<Db, Ntf>
where
    Db: Database<
        Delete<By<Favorite, favorite::Key>>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(customer.id = %cmd.customer_id, hotel.id = %cmd.hotel_id),
    )]
    async fn execute(
        &self,
        cmd: RemoveFavorite,
    ) -> Result<Self::Ok, Self::Err> {
        let RemoveFavorite {
            customer_id,
            hotel_id,
        } = cmd;

        self.database()
            .execute(Delete(By::new(favorite::Key {
                customer_id,
                hotel_id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> ExecutionError))
            .map(drop)
    }
}

/// Error of [`RemoveFavorite`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::AddFavorite, domain::hotel, query, test, Command as _,
        Query as _,
    };

    use super::RemoveFavorite;

    #[tokio::test]
    async fn unmarks_only_the_given_hotel() {
        let svc = test::service();
        let city = test::city(&svc, "Kutaisi").await;
        let kept = test::hotel(&svc, &city, "Kept", 4).await;
        let removed = test::hotel(&svc, &city, "Removed", 5).await;
        let customer =
            test::customer(&svc, "tako@example.com", "Secret123!").await;
        for hotel_id in [kept.id, removed.id] {
            svc.execute(AddFavorite {
                customer_id: customer.id,
                hotel_id,
            })
            .await
            .unwrap();
        }

        for hotel_id in [removed.id, removed.id, hotel::Id::new()] {
            svc.execute(RemoveFavorite {
                customer_id: customer.id,
                hotel_id,
            })
            .await
            .unwrap();
        }

        let favorites = svc
            .execute(query::favorites::ByCustomer::by(customer.id))
            .await
            .unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].hotel.id, kept.id);
    }
}
