//! [`Command`] for marking a [`Hotel`] as a [`Favorite`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{customer, hotel, Customer, Favorite, Hotel},
    infra::{database, Database},
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for marking a [`Hotel`] as a [`Favorite`] of a [`Customer`].
///
/// Marking an already [`Favorite`] [`Hotel`] again changes nothing.
#[derive(Clone, Copy, Debug)]
pub struct AddFavorite {
    /// ID of the [`Customer`] marking the [`Hotel`].
    pub customer_id: customer::Id,

    /// ID of the [`Hotel`] to mark.
    pub hotel_id: hotel::Id,
}

impl<Db, Ntf> Command<AddFavorite> for Service<Db, Ntf>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<Insert<Favorite>, Err = Traced<database::Error>>,
{
    type Ok = ();
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(customer.id = %cmd.customer_id, hotel.id = %cmd.hotel_id),
    )]
    async fn execute(&self, cmd: AddFavorite) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddFavorite {
            customer_id,
            hotel_id,
        } = cmd;

        drop(
            self.database()
                .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CustomerNotExists(customer_id))
                .map_err(tracerr::wrap!())?,
        );
        drop(
            self.database()
                .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::HotelNotExists(hotel_id))
                .map_err(tracerr::wrap!())?,
        );

        self.database()
            .execute(Insert(Favorite {
                customer_id,
                hotel_id,
                added_at: DateTime::now().coerce(),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)
    }
}

/// Error of [`AddFavorite`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Hotel`] with the provided ID does not exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    HotelNotExists(#[error(not(source))] hotel::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(e) => e.kind(),
            Self::CustomerNotExists(_) | Self::HotelNotExists(_) => {
                ErrorKind::NotFound
            }
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        domain::{customer, hotel},
        query,
        test,
        Classify as _, Command as _, ErrorKind, Query as _,
    };

    use super::{AddFavorite, ExecutionError};

    #[tokio::test]
    async fn lists_favorites_by_rating_once() {
        let svc = test::service();
        let city = test::city(&svc, "Batumi").await;
        let three = test::hotel(&svc, &city, "Seaside", 3).await;
        let five = test::hotel(&svc, &city, "Palace", 5).await;
        _ = test::hotel(&svc, &city, "Unmarked", 4).await;
        let customer =
            test::customer(&svc, "nika@example.com", "Secret123!").await;
        let other =
            test::customer(&svc, "luka@example.com", "Secret123!").await;

        for hotel_id in [three.id, five.id, three.id] {
            svc.execute(AddFavorite {
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
        let ids: Vec<_> = favorites.iter().map(|s| s.hotel.id).collect();
        assert_eq!(ids, [five.id, three.id]);
        assert_eq!(favorites[0].city.id, city.id);

        let favorites = svc
            .execute(query::favorites::ByCustomer::by(other.id))
            .await
            .unwrap();
        assert!(favorites.is_empty());
    }

    #[tokio::test]
    async fn fails_for_unknown_hotel_or_customer() {
        let svc = test::service();
        let city = test::city(&svc, "Batumi").await;
        let hotel = test::hotel(&svc, &city, "Seaside", 3).await;
        let customer =
            test::customer(&svc, "nika@example.com", "Secret123!").await;

        let err = svc
            .execute(AddFavorite {
                customer_id: customer.id,
                hotel_id: hotel::Id::new(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::HotelNotExists(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = svc
            .execute(AddFavorite {
                customer_id: customer::Id::new(),
                hotel_id: hotel.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::CustomerNotExists(_),
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
