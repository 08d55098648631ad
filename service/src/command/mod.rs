//! [`Command`] definition.

pub mod add_favorite;
pub mod add_review;
pub mod authorize_customer_session;
pub mod cancel_booking;
pub mod create_booking;
pub mod create_customer_session;
pub mod register_customer;
pub mod remove_favorite;
pub mod update_booking_status;

use common::operations::Notify;
use tracerr::Traced;

use crate::{
    infra::{
        notification::{self, Event},
        Notifier,
    },
    Service,
};

/// [`Command`] of the [`Service`].
pub use common::Handler as Command;

pub use self::{
    add_favorite::AddFavorite,
    add_review::AddReview,
    authorize_customer_session::AuthorizeCustomerSession,
    cancel_booking::CancelBooking, create_booking::CreateBooking,
    create_customer_session::CreateCustomerSession,
    register_customer::RegisterCustomer,
    remove_favorite::RemoveFavorite,
    update_booking_status::UpdateBookingStatus,
};

impl<Db, Ntf> Service<Db, Ntf>
where
    Ntf: Notifier<
        Notify<Event>,
        Ok = (),
        Err = Traced<notification::Error>,
    >,
{
    /// Hands the provided [`Event`] to the [`Notifier`].
    ///
    /// Delivery failures are only logged, as the [`Event`] is already
    /// committed.
    async fn notify(&self, event: Event) {
        let booking_id = event.booking().id;
        if let Err(e) = self.notifier().execute(Notify(event)).await {
            tracing::warn!(
                booking.id = %booking_id,
                "Failed to notify about `Booking`: {e}",
            );
        }
    }
}
