//! [`Command`] for cancelling a [`Booking`].

use common::operations::{
    By, Commit, Lock, Notify, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{booking, Booking},
    infra::{
        database,
        notification::{self, Event},
        Database, Notifier,
    },
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for cancelling a [`Booking`].
#[derive(Clone, Copy, Debug)]
pub struct CancelBooking {
    /// ID of the [`Booking`] to be cancelled.
    pub booking_id: booking::Id,
}

impl<Db, Ntf> Command<CancelBooking> for Service<Db, Ntf>
where
    Db: Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<
            Lock<By<Booking, booking::Id>>,
            Err = Traced<database::Error>,
        > + Database<
            Select<By<Option<Booking>, booking::Id>>,
            Ok = Option<Booking>,
            Err = Traced<database::Error>,
        > + Database<Update<Booking>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
    Ntf: Notifier<
        Notify<Event>,
        Ok = (),
        Err = Traced<notification::Error>,
    >,
{
    type Ok = Booking;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all, fields(booking.id = %cmd.booking_id))]
    async fn execute(
        &self,
        cmd: CancelBooking,
    ) -> Result<Self::Ok, Self::Err> {
        use booking::Status as S;
        use ExecutionError as E;

        let CancelBooking { booking_id } = cmd;

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        // Avoid concurrent status changes.
        tx.execute(Lock(By::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        let mut booking = tx
            .execute(Select(By::<Option<Booking>, _>::new(booking_id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::BookingNotExists(booking_id))
            .map_err(tracerr::wrap!())?;

        booking
            .transition(S::Cancelled)
            .map_err(|e| match e.from {
                S::Cancelled => E::AlreadyCancelled(booking_id),
                S::Confirmed | S::Paid => E::AlreadyPaid(booking_id),
            })
            .map_err(tracerr::wrap!())?;

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.notify(Event::BookingCancelled(booking.clone())).await;

        Ok(booking)
    }
}

/// Error of [`CancelBooking`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] is cancelled already.
    #[display("`Booking(id: {_0})` is already cancelled")]
    AlreadyCancelled(#[error(not(source))] booking::Id),

    /// [`Booking`] is paid, so cannot be cancelled.
    #[display("`Booking(id: {_0})` is already paid")]
    AlreadyPaid(#[error(not(source))] booking::Id),

    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyCancelled(_) | Self::AlreadyPaid(_) => {
                ErrorKind::InvalidState
            }
            Self::BookingNotExists(_) => ErrorKind::NotFound,
            Self::Db(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Select};

    use crate::{
        command::{CreateBooking, UpdateBookingStatus},
        domain::{booking, Booking},
        infra::{notification::Event, Database as _},
        test::{self, date, usd},
        Classify as _, Command as _, ErrorKind,
    };

    use super::{CancelBooking, ExecutionError};

    async fn book(svc: &test::TestService) -> Booking {
        let city = test::city(svc, "Kutaisi").await;
        let hotel = test::hotel(svc, &city, "Old Town", 3).await;
        let room_type = test::room_type(svc, usd(100), 2).await;
        let room = test::room(svc, &hotel, &room_type, &[]).await;
        let customer =
            test::customer(svc, "ana@example.com", "Secret123!").await;
        svc.execute(CreateBooking {
            customer_id: customer.id,
            room_id: room.id,
            check_in: date("2025-01-05"),
            check_out: date("2025-01-08"),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn cancels_only_once() {
        let svc = test::service();
        let booking = book(&svc).await;

        let cancelled = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();
        assert_eq!(cancelled.status, booking::Status::Cancelled);
        assert!(matches!(
            svc.notifier().events().last(),
            Some(Event::BookingCancelled(b)) if b.id == booking.id,
        ));

        let err = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyCancelled(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let stored = svc
            .database()
            .execute(Select(By::<Option<Booking>, _>::new(booking.id)))
            .await
            .unwrap();
        assert_eq!(stored.unwrap().status, booking::Status::Cancelled);
    }

    #[tokio::test]
    async fn cancelled_booking_frees_room() {
        let svc = test::service();
        let booking = book(&svc).await;

        _ = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap();

        let rebooked = svc
            .execute(CreateBooking {
                customer_id: booking.customer_id,
                room_id: booking.room_id,
                check_in: date("2025-01-06"),
                check_out: date("2025-01-10"),
            })
            .await
            .unwrap();
        assert_eq!(rebooked.total_price, usd(400));
    }

    #[tokio::test]
    async fn refuses_paid_and_unknown_bookings() {
        let svc = test::service();
        let booking = book(&svc).await;
        _ = svc
            .execute(UpdateBookingStatus {
                booking_id: booking.id,
                status: booking::Status::Paid,
            })
            .await
            .unwrap();

        let err = svc
            .execute(CancelBooking {
                booking_id: booking.id,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.as_ref(), ExecutionError::AlreadyPaid(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        let err = svc
            .execute(CancelBooking {
                booking_id: booking::Id::new(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
