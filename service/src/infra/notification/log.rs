//! [`Log`] notifier.

use common::operations::Notify;
use tracerr::Traced;

use super::{Error, Event, Notifier};

/// [`Notifier`] writing [`Event`]s into the log instead of delivering them.
#[derive(Clone, Copy, Debug, Default)]
pub struct Log;

impl Notifier<Notify<Event>> for Log {
    type Ok = ();
    type Err = Traced<Error>;

    async fn execute(
        &self,
        Notify(event): Notify<Event>,
    ) -> Result<Self::Ok, Self::Err> {
        let booking = event.booking();
        match &event {
            Event::BookingConfirmed(_) => tracing::info!(
                booking.id = %booking.id,
                customer.id = %booking.customer_id,
                room.id = %booking.room_id,
                check_in = %booking.stay.check_in(),
                check_out = %booking.stay.check_out(),
                total_price = %booking.total_price,
                "booking confirmed",
            ),
            Event::BookingCancelled(_) => tracing::info!(
                booking.id = %booking.id,
                customer.id = %booking.customer_id,
                "booking cancelled",
            ),
            Event::BookingStatusUpdated { from, .. } => tracing::info!(
                booking.id = %booking.id,
                customer.id = %booking.customer_id,
                from = %from,
                to = %booking.status,
                "booking status updated",
            ),
        }
        Ok(())
    }
}
