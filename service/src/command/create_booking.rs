//! [`Command`] for creating a new [`Booking`].

use common::{
    operations::{
        By, Commit, Insert, Lock, Notify, Select, Transact, Transacted,
    },
    Date, DateTime,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::booking::Status;
use crate::{
    domain::{
        booking::{self, InvalidStay, Stay},
        customer, room, Booking, Customer, Room,
    },
    infra::{
        database,
        notification::{self, Event},
        Database, Notifier,
    },
    read, Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for creating a new [`Status::Confirmed`] [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct CreateBooking {
    /// ID of the [`Customer`] making the [`Booking`].
    pub customer_id: customer::Id,

    /// ID of the [`Room`] to be booked.
    pub room_id: room::Id,

    /// [`Date`] of the arrival.
    pub check_in: Date,

    /// [`Date`] of the departure.
    pub check_out: Date,
}

impl<Db, Ntf> Command<CreateBooking> for Service<Db, Ntf>
where
    Db: Database<Transact, Err = Traced<database::Error>>
        + Database<
            Select<By<Option<read::room::Details>, room::Id>>,
            Ok = Option<read::room::Details>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
    Transacted<Db>: Database<
            Lock<By<Room, room::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<read::room::IsAvailable, read::room::Availability>>,
            Ok = read::room::IsAvailable,
            Err = Traced<database::Error>,
        > + Database<Insert<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<Event>,
        Ok = (),
        Err = Traced<notification::Error>,
    >,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(
        skip_all,
        fields(
            customer.id = %cmd.customer_id,
            room.id = %cmd.room_id,
            check_in = %cmd.check_in,
            check_out = %cmd.check_out,
        ),
    )]
    async fn execute(
        &self,
        cmd: CreateBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateBooking {
            customer_id,
            room_id,
            check_in,
            check_out,
        } = cmd;

        let stay = Stay::new(check_in, check_out)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let room = self
            .database()
            .execute(Select(By::<Option<read::room::Details>, _>::new(
                room_id,
            )))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::RoomNotExists(room_id))
            .map_err(tracerr::wrap!())?;
        if !room.room.is_available {
            return Err(tracerr::new!(E::RoomUnavailable(room_id)));
        }

        drop(
            self.database()
                .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CustomerNotExists(customer_id))
                .map_err(tracerr::wrap!())?,
        );

        let total_price = stay
            .price(room.room_type.base_price)
            .ok_or(E::PriceOverflow)
            .map_err(tracerr::wrap!())?;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Serialize concurrent bookings of the same `Room`.
        tx.execute(Lock(By::new(room_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let is_available = tx
            .execute(Select(By::new(read::room::Availability {
                room_id,
                stay,
            })))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !*is_available {
            return Err(tracerr::new!(E::RoomOccupied(room_id)));
        }

        let booking = Booking {
            id: booking::Id::new(),
            customer_id,
            room_id,
            stay,
            total_price,
            status: booking::Status::Confirmed,
            booked_at: DateTime::now().coerce(),
        };

        tx.execute(Insert(booking.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_booking_overlap() {
                    tracerr::new!(E::RoomOccupied(room_id))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(booking.id = %booking.id, "`Booking` created");

        self.notify(Event::BookingConfirmed(booking.clone())).await;

        Ok(booking)
    }
}

/// Error of [`CreateBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Total price of the [`Booking`] overflows.
    #[display("Total price of the `Booking` overflows")]
    PriceOverflow,

    /// Requested [`Stay`] is empty or reversed.
    #[display("Invalid `Stay`: {_0}")]
    #[from]
    InvalidStay(InvalidStay),

    /// [`Room`] with the provided ID does not exist.
    #[display("`Room(id: {_0})` does not exist")]
    RoomNotExists(#[error(not(source))] room::Id),

    /// [`Room`] is already booked for an overlapping [`Stay`].
    #[display("`Room(id: {_0})` is already booked for the requested dates")]
    RoomOccupied(#[error(not(source))] room::Id),

    /// [`Room`] is closed for booking.
    #[display("`Room(id: {_0})` is not available for booking")]
    RoomUnavailable(#[error(not(source))] room::Id),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::CustomerNotExists(_) | Self::RoomNotExists(_) => {
                ErrorKind::NotFound
            }
            Self::Db(e) => e.kind(),
            Self::InvalidStay(_) => ErrorKind::InvalidRange,
            Self::RoomOccupied(_) | Self::RoomUnavailable(_) => {
                ErrorKind::InvalidState
            }
            Self::PriceOverflow => ErrorKind::Unclassified,
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        domain::{booking, customer, room, Booking},
        infra::{notification, Database as _},
        read,
        test::{self, date, usd},
        Classify as _, Command as _, ErrorKind,
    };

    use super::{CreateBooking, ExecutionError};

    fn cmd(
        customer_id: customer::Id,
        room_id: room::Id,
        from: &str,
        to: &str,
    ) -> CreateBooking {
        CreateBooking {
            customer_id,
            room_id,
            check_in: date(from),
            check_out: date(to),
        }
    }

    async fn seed(svc: &test::TestService) -> (customer::Id, room::Id) {
        let city = test::city(svc, "Tbilisi").await;
        let hotel = test::hotel(svc, &city, "Rooms", 4).await;
        let room_type = test::room_type(svc, usd(100), 2).await;
        let room = test::room(svc, &hotel, &room_type, &[]).await;
        let customer =
            test::customer(svc, "nino@example.com", "Secret123!").await;
        (customer.id, room.id)
    }

    async fn bookings_of(
        svc: &test::TestService,
        room_id: room::Id,
    ) -> Vec<Booking> {
        svc.database()
            .execute(Select(By::<Vec<read::booking::Details>, _>::new(
                read::booking::list::Filter::default(),
            )))
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.booking)
            .filter(|b| b.room_id == room_id)
            .collect()
    }

    #[tokio::test]
    async fn books_free_room() {
        let svc = test::service();
        let (customer_id, room_id) = seed(&svc).await;

        let booking = svc
            .execute(cmd(customer_id, room_id, "2025-01-01", "2025-01-03"))
            .await
            .unwrap();

        assert_eq!(booking.status, booking::Status::Confirmed);
        assert_eq!(booking.total_price, usd(200));
        assert_eq!(booking.stay.nights(), 2);

        let events = svc.notifier().events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            &events[0],
            notification::Event::BookingConfirmed(b) if b.id == booking.id,
        ));
    }

    #[tokio::test]
    async fn rejects_overlapping_and_accepts_adjacent_stays() {
        let svc = test::service();
        let (customer_id, room_id) = seed(&svc).await;

        _ = svc
            .execute(cmd(customer_id, room_id, "2025-01-05", "2025-01-08"))
            .await
            .unwrap();

        let err = svc
            .execute(cmd(customer_id, room_id, "2025-01-06", "2025-01-10"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::RoomOccupied(id) if *id == room_id,
        ));
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let adjacent = svc
            .execute(cmd(customer_id, room_id, "2025-01-08", "2025-01-10"))
            .await
            .unwrap();
        assert_eq!(adjacent.total_price, usd(200));

        let before = svc
            .execute(cmd(customer_id, room_id, "2025-01-01", "2025-01-05"))
            .await
            .unwrap();
        assert_eq!(before.total_price, usd(400));

        assert_eq!(bookings_of(&svc, room_id).await.len(), 3);
    }

    #[tokio::test]
    async fn rejects_invalid_range() {
        let svc = test::service();
        let (customer_id, room_id) = seed(&svc).await;

        for (from, to) in [
            ("2025-01-05", "2025-01-05"),
            ("2025-01-08", "2025-01-05"),
        ] {
            let err = svc
                .execute(cmd(customer_id, room_id, from, to))
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidRange);
        }
        assert!(bookings_of(&svc, room_id).await.is_empty());
    }

    #[tokio::test]
    async fn rejects_unknown_room_and_customer() {
        let svc = test::service();
        let (customer_id, room_id) = seed(&svc).await;

        let err = svc
            .execute(cmd(
                customer_id,
                room::Id::new(),
                "2025-01-05",
                "2025-01-08",
            ))
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::RoomNotExists(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = svc
            .execute(cmd(
                customer::Id::new(),
                room_id,
                "2025-01-05",
                "2025-01-08",
            ))
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::CustomerNotExists(_),
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn rejects_room_closed_for_booking() {
        let svc = test::service();
        let city = test::city(&svc, "Batumi").await;
        let hotel = test::hotel(&svc, &city, "Sea", 3).await;
        let room_type = test::room_type(&svc, usd(80), 2).await;
        let mut room = test::room(&svc, &hotel, &room_type, &[]).await;
        room.is_available = false;
        svc.database()
            .execute(common::operations::Insert(room.clone()))
            .await
            .unwrap();
        let customer =
            test::customer(&svc, "giorgi@example.com", "Secret123!").await;

        let err = svc
            .execute(cmd(customer.id, room.id, "2025-01-05", "2025-01-08"))
            .await
            .unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::RoomUnavailable(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert!(bookings_of(&svc, room.id).await.is_empty());
        assert!(svc.notifier().events().is_empty());
    }

    #[tokio::test]
    async fn concurrent_bookings_of_same_room_do_not_overlap() {
        let svc = test::service();
        let (customer_id, room_id) = seed(&svc).await;

        let (first, second) = tokio::join!(
            svc.execute(cmd(customer_id, room_id, "2025-01-05", "2025-01-08")),
            svc.execute(cmd(customer_id, room_id, "2025-01-06", "2025-01-09")),
        );

        assert_eq!(
            usize::from(first.is_ok()) + usize::from(second.is_ok()),
            1,
        );
        let err = first.err().or(second.err()).unwrap();
        assert!(matches!(err.as_ref(), ExecutionError::RoomOccupied(_)));
        assert_eq!(bookings_of(&svc, room_id).await.len(), 1);
    }

    #[tokio::test]
    async fn notification_failure_keeps_booking() {
        let svc = test::service_with(notification::Recorder::failing());
        let (customer_id, room_id) = seed(&svc).await;

        let booking = svc
            .execute(cmd(customer_id, room_id, "2025-01-05", "2025-01-08"))
            .await
            .unwrap();

        let stored = bookings_of(&svc, room_id).await;
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, booking.id);
    }
}
