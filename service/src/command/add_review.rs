//! [`Command`] for adding a [`Review`] of a [`Hotel`].

use common::{
    operations::{By, Insert, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::Customer;
use crate::{
    domain::{customer, hotel, review, Booking, Hotel, Review},
    infra::{database, Database},
    read, Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for adding a [`Review`] of a [`Hotel`] by a [`Customer`] who
/// stayed there.
///
/// The [`Review`] is attached to the latest non-cancelled [`Booking`] of the
/// [`Customer`] in the [`Hotel`].
#[derive(Clone, Debug)]
pub struct AddReview {
    /// ID of the [`Customer`] leaving the [`Review`].
    pub customer_id: customer::Id,

    /// ID of the reviewed [`Hotel`].
    pub hotel_id: hotel::Id,

    /// [`review::Rating`] given to the [`Hotel`].
    pub rating: review::Rating,

    /// [`review::Comment`] on the [`Hotel`].
    pub comment: review::Comment,
}

impl<Db, Ntf> Command<AddReview> for Service<Db, Ntf>
where
    Db: Database<
            Select<By<Option<Hotel>, hotel::Id>>,
            Ok = Option<Hotel>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, read::booking::StayedAt>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Insert<Review>, Err = Traced<database::Error>>,
{
    type Ok = Review;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(customer.id = %cmd.customer_id, hotel.id = %cmd.hotel_id),
    )]
    async fn execute(&self, cmd: AddReview) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AddReview {
            customer_id,
            hotel_id,
            rating,
            comment,
        } = cmd;

        drop(
            self.database()
                .execute(Select(By::<Option<Hotel>, _>::new(hotel_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::HotelNotExists(hotel_id))
                .map_err(tracerr::wrap!())?,
        );

        let booking = self
            .database()
            .execute(Select(By::new(read::booking::StayedAt {
                customer_id,
                hotel_id,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::NoStay { customer_id, hotel_id })
            .map_err(tracerr::wrap!())?;

        let review = Review {
            id: review::Id::new(),
            booking_id: booking.id,
            rating,
            comment,
            created_at: DateTime::now().coerce(),
        };
        self.database()
            .execute(Insert(review.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        Ok(review)
    }
}

/// Error of [`AddReview`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`Hotel`] with the provided ID does not exist.
    #[display("`Hotel(id: {_0})` does not exist")]
    HotelNotExists(#[error(not(source))] hotel::Id),

    /// [`Customer`] has no active [`Booking`]s in the [`Hotel`].
    #[display(
        "`Customer(id: {customer_id})` never stayed in `Hotel(id: {hotel_id})`"
    )]
    NoStay {
        /// ID of the [`Customer`].
        #[error(not(source))]
        customer_id: customer::Id,

        /// ID of the [`Hotel`].
        hotel_id: hotel::Id,
    },
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(e) => e.kind(),
            Self::HotelNotExists(_) => ErrorKind::NotFound,
            Self::NoStay { .. } => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::{CancelBooking, CreateBooking},
        domain::{customer, hotel, review, Review},
        infra::Database as _,
        test::{self, date, usd},
        Classify as _, Command as _, ErrorKind,
    };

    use super::{AddReview, ExecutionError};

    fn cmd(customer_id: customer::Id, hotel_id: hotel::Id) -> AddReview {
        AddReview {
            customer_id,
            hotel_id,
            rating: review::Rating::new(5).unwrap(),
            comment: review::Comment::new("Lovely view").unwrap(),
        }
    }

    #[tokio::test]
    async fn requires_active_booking_in_hotel() {
        let svc = test::service();
        let city = test::city(&svc, "Sighnaghi").await;
        let hotel = test::hotel(&svc, &city, "Vineyard", 4).await;
        let room_type = test::room_type(&svc, usd(90), 2).await;
        let room = test::room(&svc, &hotel, &room_type, &[]).await;
        let customer =
            test::customer(&svc, "mari@example.com", "Secret123!").await;

        let err = svc.execute(cmd(customer.id, hotel.id)).await.unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::NoStay { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let booking = svc
            .execute(CreateBooking {
                customer_id: customer.id,
                room_id: room.id,
                check_in: date("2025-03-01"),
                check_out: date("2025-03-02"),
            })
            .await
            .unwrap();
        _ = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        let err = svc.execute(cmd(customer.id, hotel.id)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let booking = svc
            .execute(CreateBooking {
                customer_id: customer.id,
                room_id: room.id,
                check_in: date("2025-03-01"),
                check_out: date("2025-03-02"),
            })
            .await
            .unwrap();
        let review = svc.execute(cmd(customer.id, hotel.id)).await.unwrap();
        assert_eq!(review.booking_id, booking.id);

        let reviews = svc
            .database()
            .execute(Select(By::<Vec<Review>, _>::new(hotel.id)))
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
    }

    #[tokio::test]
    async fn fails_for_unknown_hotel() {
        let svc = test::service();
        let customer =
            test::customer(&svc, "mari@example.com", "Secret123!").await;

        let err = svc
            .execute(cmd(customer.id, hotel::Id::new()))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::HotelNotExists(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
