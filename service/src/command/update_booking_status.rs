//! [`Command`] for changing a [`Booking`]'s [`Status`].

use common::operations::{
    By, Commit, Lock, Notify, Select, Transact, Transacted, Update,
};
use derive_more::{Display, Error, From};
use tracerr::Traced;

use crate::{
    domain::{
        booking::{self, InvalidTransition, Status},
        Booking,
    },
    infra::{
        database,
        notification::{self, Event},
        Database, Notifier,
    },
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for changing a [`Booking`]'s [`Status`].
///
/// Only [`Status::Confirmed`] [`Booking`]s may become [`Status::Paid`] or
/// [`Status::Cancelled`].
#[derive(Clone, Copy, Debug)]
pub struct UpdateBookingStatus {
    /// ID of the [`Booking`] to be updated.
    pub booking_id: booking::Id,

    /// New [`Status`] of the [`Booking`].
    pub status: Status,
}

impl<Db, Ntf> Command<UpdateBookingStatus> for Service<Db, Ntf>
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

    #[tracing::instrument(
        skip_all,
        fields(booking.id = %cmd.booking_id, status = %cmd.status),
    )]
    async fn execute(
        &self,
        cmd: UpdateBookingStatus,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateBookingStatus { booking_id, status } = cmd;

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

        let from = booking.status;
        booking
            .transition(status)
            .map_err(tracerr::from_and_wrap!(=> E))?;

        tx.execute(Update(booking.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        self.notify(Event::BookingStatusUpdated {
            booking: booking.clone(),
            from,
        })
        .await;

        Ok(booking)
    }
}

/// Error of [`UpdateBookingStatus`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Booking`] with the provided ID does not exist.
    #[display("`Booking(id: {_0})` does not exist")]
    BookingNotExists(#[error(not(source))] booking::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Requested [`Status`] change is not allowed.
    #[display("{_0}")]
    #[from]
    InvalidTransition(InvalidTransition),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::BookingNotExists(_) => ErrorKind::NotFound,
            Self::Db(e) => e.kind(),
            Self::InvalidTransition(_) => ErrorKind::InvalidState,
        }
    }
}

#[cfg(test)]
mod spec {
    use crate::{
        command::CreateBooking,
        domain::{
            booking::{self, Status},
            Booking,
        },
        infra::notification::Event,
        test::{self, date, usd},
        Classify as _, Command as _, ErrorKind,
    };

    use super::{ExecutionError, UpdateBookingStatus};

    async fn book(svc: &test::TestService) -> Booking {
        let city = test::city(svc, "Mestia").await;
        let hotel = test::hotel(svc, &city, "Tower", 4).await;
        let room_type = test::room_type(svc, usd(150), 3).await;
        let room = test::room(svc, &hotel, &room_type, &[]).await;
        let customer =
            test::customer(svc, "levan@example.com", "Secret123!").await;
        svc.execute(CreateBooking {
            customer_id: customer.id,
            room_id: room.id,
            check_in: date("2025-02-01"),
            check_out: date("2025-02-04"),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn pays_confirmed_booking() {
        let svc = test::service();
        let booking = book(&svc).await;

        let paid = svc
            .execute(UpdateBookingStatus {
                booking_id: booking.id,
                status: Status::Paid,
            })
            .await
            .unwrap();

        assert_eq!(paid.status, Status::Paid);
        assert!(matches!(
            svc.notifier().events().last(),
            Some(Event::BookingStatusUpdated { booking, from })
                if booking.id == paid.id && *from == Status::Confirmed,
        ));
    }

    #[tokio::test]
    async fn terminal_statuses_stay_unchanged() {
        let svc = test::service();
        let booking = book(&svc).await;
        _ = svc
            .execute(UpdateBookingStatus {
                booking_id: booking.id,
                status: Status::Cancelled,
            })
            .await
            .unwrap();

        for status in [Status::Confirmed, Status::Paid, Status::Cancelled] {
            let err = svc
                .execute(UpdateBookingStatus {
                    booking_id: booking.id,
                    status,
                })
                .await
                .unwrap_err();
            assert!(matches!(
                err.as_ref(),
                ExecutionError::InvalidTransition(t)
                    if t.from == Status::Cancelled,
            ));
            assert_eq!(err.kind(), ErrorKind::InvalidState);
        }
    }

    #[tokio::test]
    async fn fails_for_unknown_booking() {
        let svc = test::service();

        let err = svc
            .execute(UpdateBookingStatus {
                booking_id: booking::Id::new(),
                status: Status::Paid,
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::BookingNotExists(_),
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
