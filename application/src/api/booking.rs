//! Booking-related Web API endpoints.

use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{Date, DateTime, Money};
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{booking, customer, hotel, room},
    query, read, Query as _,
};

use crate::{define_error, AsError, Error, Service, Session};

/// Reservation of a room.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// ID of this [`Booking`].
    pub id: booking::Id,

    /// ID of the customer who made this [`Booking`].
    pub customer_id: customer::Id,

    /// ID of the booked room.
    pub room_id: room::Id,

    /// Arrival date.
    pub check_in_date: Date,

    /// Departure date.
    pub check_out_date: Date,

    /// Number of booked nights.
    pub nights: u32,

    /// Total price of this [`Booking`].
    pub total_price: Money,

    /// Status of this [`Booking`].
    pub status: booking::Status,

    /// When this [`Booking`] was made.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub booked_at: DateTime,
}

impl From<service::domain::Booking> for Booking {
    fn from(booking: service::domain::Booking) -> Self {
        Self {
            id: booking.id,
            customer_id: booking.customer_id,
            room_id: booking.room_id,
            check_in_date: booking.stay.check_in(),
            check_out_date: booking.stay.check_out(),
            nights: booking.stay.nights(),
            total_price: booking.total_price,
            status: booking.status,
            booked_at: booking.booked_at.coerce(),
        }
    }
}

/// [`Booking`] along with the booked room and its hotel.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    /// [`Booking`] itself.
    #[serde(flatten)]
    pub booking: Booking,

    /// Booked room.
    pub room: BookedRoom,

    /// Hotel of the booked room.
    pub hotel: BookedHotel,
}

impl From<read::booking::Details> for Details {
    fn from(details: read::booking::Details) -> Self {
        let read::booking::Details {
            booking,
            room,
            room_type,
            hotel,
        } = details;

        Self {
            booking: booking.into(),
            room: BookedRoom {
                id: room.id,
                number: room.number.to_string(),
                floor: room.floor,
                room_type: room_type.name.to_string(),
            },
            hotel: BookedHotel {
                id: hotel.id,
                name: hotel.name.to_string(),
                star_rating: hotel.star_rating.into(),
                phone: hotel.phone.map(|p| p.to_string()),
                email: hotel.email.map(|e| e.to_string()),
            },
        }
    }
}

/// Room of a [`Booking`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedRoom {
    /// ID of the room.
    pub id: room::Id,

    /// Number of the room inside its hotel.
    pub number: String,

    /// Floor the room is located on.
    pub floor: Option<i16>,

    /// Name of the room's type.
    pub room_type: String,
}

/// Hotel of a [`Booking`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedHotel {
    /// ID of the hotel.
    pub id: hotel::Id,

    /// Name of the hotel.
    pub name: String,

    /// Official star rating of the hotel.
    pub star_rating: i16,

    /// Contact phone number of the hotel.
    pub phone: Option<String>,

    /// Contact email address of the hotel.
    pub email: Option<String>,
}

/// Query parameters of [`list()`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// ID of the customer to list [`Booking`]s of.
    pub customer_id: Option<customer::Id>,
}

/// Body of a [`create()`] request.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    /// ID of the customer making the [`Booking`].
    pub customer_id: customer::Id,

    /// ID of the room to book.
    pub room_id: room::Id,

    /// Arrival date.
    pub check_in_date: Date,

    /// Departure date.
    pub check_out_date: Date,
}

/// Body of an [`update_status()`] request.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct UpdateStatus {
    /// Status the [`Booking`] should get.
    pub status: booking::Status,
}

/// Lists [`Booking`]s, the newest first.
#[tracing::instrument(skip_all, fields(customer.id = ?params.customer_id))]
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, Error>,
) -> Result<Json<Vec<Details>>, Error> {
    let bookings = service
        .execute(query::bookings::List::by(read::booking::list::Filter {
            customer_id: params.customer_id,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}

/// Returns a single [`Booking`] with its room and hotel.
#[tracing::instrument(skip_all, fields(booking.id = %id))]
pub async fn get(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<booking::Id>, Error>,
) -> Result<Json<Details>, Error> {
    service
        .execute(query::booking::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|b| Json(b.into()))
        .ok_or_else(|| BookingError::NotExists.into())
}

/// Books a room for a stay on behalf of the [`Session`] owner.
#[tracing::instrument(
    skip_all,
    fields(customer.id = %body.customer_id, room.id = %body.room_id),
)]
pub async fn create(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Json(body), _): WithRejection<Json<CreateBooking>, Error>,
) -> Result<impl IntoResponse, Error> {
    let CreateBooking {
        customer_id,
        room_id,
        check_in_date,
        check_out_date,
    } = body;
    session.ensure_owns(customer_id)?;

    let booking = service
        .execute(command::CreateBooking {
            customer_id,
            room_id,
            check_in: check_in_date,
            check_out: check_out_date,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/api/bookings/{}", booking.id))],
        Json(Booking::from(booking)),
    ))
}

/// Cancels a [`Booking`] of the [`Session`] owner.
#[tracing::instrument(skip_all, fields(booking.id = %id))]
pub async fn cancel(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Path(id), _): WithRejection<Path<booking::Id>, Error>,
) -> Result<Json<Booking>, Error> {
    ensure_owned(&service, &session, id).await?;

    service
        .execute(command::CancelBooking { booking_id: id })
        .await
        .map(|b| Json(b.into()))
        .map_err(AsError::into_error)
}

/// Changes the status of a [`Booking`] of the [`Session`] owner.
#[tracing::instrument(
    skip_all,
    fields(booking.id = %id, booking.status = %body.status),
)]
pub async fn update_status(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Path(id), _): WithRejection<Path<booking::Id>, Error>,
    WithRejection(Json(body), _): WithRejection<Json<UpdateStatus>, Error>,
) -> Result<Json<Booking>, Error> {
    ensure_owned(&service, &session, id).await?;

    service
        .execute(command::UpdateBookingStatus {
            booking_id: id,
            status: body.status,
        })
        .await
        .map(|b| Json(b.into()))
        .map_err(AsError::into_error)
}

/// Checks that the [`Booking`] with the provided `id` exists and was made by
/// the [`Session`] owner.
async fn ensure_owned(
    service: &Service,
    session: &Session,
    id: booking::Id,
) -> Result<(), Error> {
    let details = service
        .execute(query::booking::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .ok_or(BookingError::NotExists)?;
    session.ensure_owns(details.booking.customer_id)
}

impl AsError for command::create_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let err: Error = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::PriceOverflow => return None,
            Self::CustomerNotExists(_) => {
                BookingError::CustomerNotExists.into()
            }
            Self::InvalidStay(_) => super::ArgumentError::InvalidRange.into(),
            Self::RoomNotExists(_) => BookingError::RoomNotExists.into(),
            Self::RoomOccupied(_) => BookingError::RoomOccupied.into(),
            Self::RoomUnavailable(_) => BookingError::RoomUnavailable.into(),
        };
        Some(err.with_details(self))
    }
}

impl AsError for command::cancel_booking::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let err = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::AlreadyCancelled(_) => BookingError::AlreadyCancelled,
            Self::AlreadyPaid(_) => BookingError::AlreadyPaid,
            Self::BookingNotExists(_) => BookingError::NotExists,
        };
        Some(Error::from(err).with_details(self))
    }
}

impl AsError for command::update_booking_status::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let err = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::BookingNotExists(_) => BookingError::NotExists,
            Self::InvalidTransition(_) => BookingError::InvalidTransition,
        };
        Some(Error::from(err).with_details(self))
    }
}

define_error! {
    enum BookingError {
        #[code = "BOOKING_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Booking does not exist"]
        NotExists,

        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Customer does not exist"]
        CustomerNotExists,

        #[code = "ROOM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Room does not exist"]
        RoomNotExists,

        #[code = "ROOM_OCCUPIED"]
        #[status = BAD_REQUEST]
        #[message = "Room is already booked for these dates"]
        RoomOccupied,

        #[code = "ROOM_UNAVAILABLE"]
        #[status = BAD_REQUEST]
        #[message = "Room is closed for booking"]
        RoomUnavailable,

        #[code = "BOOKING_ALREADY_CANCELLED"]
        #[status = BAD_REQUEST]
        #[message = "Booking is already cancelled"]
        AlreadyCancelled,

        #[code = "BOOKING_ALREADY_PAID"]
        #[status = BAD_REQUEST]
        #[message = "Booking is already paid"]
        AlreadyPaid,

        #[code = "INVALID_STATUS_TRANSITION"]
        #[status = BAD_REQUEST]
        #[message = "Booking cannot get the requested status"]
        InvalidTransition,
    }
}

#[cfg(test)]
mod spec {
    use axum::body::Body;
    use http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use service::domain::{booking, customer, Customer, Room};

    use crate::{
        api::test::{self, bearer, get, json},
        Service,
    };

    const PASSWORD: &str = "Secret1!";

    async fn seed(svc: &Service) -> (Room, Customer, String) {
        let hotel = test::hotel(svc, "Bookings", 4).await;
        let room = test::room(svc, &hotel, "101", 100, 2).await;
        let customer =
            test::customer(svc, "guest@example.com", PASSWORD).await;
        let token = test::login(svc, "guest@example.com", PASSWORD).await;
        (room, customer, token)
    }

    fn booking(
        room: &Room,
        customer_id: customer::Id,
        from: &str,
        to: &str,
    ) -> Value {
        json!({
            "customerId": customer_id,
            "roomId": room.id,
            "checkInDate": from,
            "checkOutDate": to,
        })
    }

    fn post(token: &str, body: &Value) -> Request<Body> {
        bearer(json(Method::POST, "/api/bookings", body), token)
    }

    fn put(uri: &str, token: &str, body: &Value) -> Request<Body> {
        bearer(json(Method::PUT, uri, body), token)
    }

    #[tokio::test]
    async fn books_room_without_overlaps() {
        let svc = test::service();
        let (room, customer, token) = seed(&svc).await;

        let (status, headers, body) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-05", "2025-01-08"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["totalPrice"]["amount"], "300");
        assert_eq!(body["nights"], 3);
        assert_eq!(body["status"], "CONFIRMED");
        assert_eq!(
            headers[header::LOCATION],
            format!("/api/bookings/{}", body["id"].as_str().unwrap()),
        );

        let (status, _, body) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-06", "2025-01-10"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "ROOM_OCCUPIED");
        assert!(body["details"].is_string());

        let (status, _, body) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-08", "2025-01-10"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["totalPrice"]["amount"], "200");
    }

    #[tokio::test]
    async fn rejects_invalid_bookings() {
        let svc = test::service();
        let (room, customer, token) = seed(&svc).await;

        let (status, _, body) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-08", "2025-01-08"),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RANGE");

        let (status, _, body) =
            test::send(&svc, post(&token, &json!({"roomId": room.id})))
                .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn requires_session_of_booking_owner() {
        let svc = test::service();
        let (room, customer, token) = seed(&svc).await;
        let stranger =
            test::customer(&svc, "other@example.com", PASSWORD).await;
        let stranger_token =
            test::login(&svc, "other@example.com", PASSWORD).await;
        let body = booking(&room, customer.id, "2025-01-05", "2025-01-08");

        let (status, _, resp) = test::send(
            &svc,
            json(Method::POST, "/api/bookings", &body),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp["code"], "AUTHORIZATION_REQUIRED");

        let (status, _, resp) =
            test::send(&svc, post(&stranger_token, &body)).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(resp["code"], "FORBIDDEN");

        let (_, _, created) = test::send(&svc, post(&token, &body)).await;
        let id = created["id"].as_str().unwrap();
        let cancel = format!("/api/bookings/{id}/cancel");
        let status_uri = format!("/api/bookings/{id}/status");

        let (status, _, resp) = test::send(
            &svc,
            put(&cancel, &stranger_token, &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(resp["code"], "FORBIDDEN");

        let (status, _, resp) = test::send(
            &svc,
            put(&status_uri, &stranger_token, &json!({"status": "PAID"})),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(resp["code"], "FORBIDDEN");

        let (status, _, resp) = test::send(
            &svc,
            json(Method::PUT, &cancel, &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(resp["code"], "AUTHORIZATION_REQUIRED");

        let (_, _, resp) = test::send(
            &svc,
            get(&format!("/api/bookings?customerId={}", stranger.id)),
        )
        .await;
        assert_eq!(resp, json!([]));

        let (status, _, resp) =
            test::send(&svc, get(&format!("/api/bookings/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(resp["status"], "CONFIRMED");
    }

    #[tokio::test]
    async fn cancels_and_lists_bookings() {
        let svc = test::service();
        let (room, customer, token) = seed(&svc).await;
        let (_, _, created) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-05", "2025-01-08"),
            ),
        )
        .await;
        let id = created["id"].as_str().unwrap();
        let cancel = format!("/api/bookings/{id}/cancel");

        let (status, _, body) =
            test::send(&svc, put(&cancel, &token, &json!({}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "CANCELLED");

        let (status, _, body) =
            test::send(&svc, put(&cancel, &token, &json!({}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BOOKING_ALREADY_CANCELLED");

        let (status, _, body) = test::send(
            &svc,
            put(
                &format!("/api/bookings/{}/cancel", booking::Id::new()),
                &token,
                &json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "BOOKING_NOT_EXISTS");

        let (_, _, body) = test::send(
            &svc,
            get(&format!("/api/bookings?customerId={}", customer.id)),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["status"], "CANCELLED");
        assert_eq!(body[0]["room"]["number"], "101");
        assert_eq!(body[0]["hotel"]["name"], "Bookings");

        let (status, _, body) =
            test::send(&svc, get(&format!("/api/bookings/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], id);
        assert_eq!(body["checkInDate"], "2025-01-05");
    }

    #[tokio::test]
    async fn updates_status() {
        let svc = test::service();
        let (room, customer, token) = seed(&svc).await;
        let (_, _, created) = test::send(
            &svc,
            post(
                &token,
                &booking(&room, customer.id, "2025-01-05", "2025-01-08"),
            ),
        )
        .await;
        let uri = format!(
            "/api/bookings/{}/status",
            created["id"].as_str().unwrap(),
        );

        let (status, _, body) = test::send(
            &svc,
            put(&uri, &token, &json!({"status": "PAID"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "PAID");

        let (status, _, body) = test::send(
            &svc,
            put(&uri, &token, &json!({"status": "CANCELLED"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_STATUS_TRANSITION");

        let (status, _, _) = test::send(
            &svc,
            put(&uri, &token, &json!({"status": "GONE"})),
        )
        .await;
        assert!(status.is_client_error());
    }
}
