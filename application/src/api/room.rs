//! Room-related Web API endpoints.

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{Date, Money};
use serde::{Deserialize, Serialize};
use service::{
    domain::{amenity, hotel, room, room_type},
    query, read, Query as _,
};

use crate::{define_error, AsError, Error, Service};

/// Room of a hotel.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    /// ID of this [`Room`].
    pub id: room::Id,

    /// ID of the hotel this [`Room`] belongs to.
    pub hotel_id: hotel::Id,

    /// Number of this [`Room`] inside its hotel.
    pub number: String,

    /// Floor this [`Room`] is located on.
    pub floor: Option<i16>,

    /// Indicator whether this [`Room`] is open for booking at all.
    pub is_available: bool,

    /// [`RoomType`] of this [`Room`].
    pub room_type: RoomType,

    /// [`Amenity`]s of this [`Room`].
    pub amenities: Vec<Amenity>,
}

impl From<read::room::Details> for Room {
    fn from(details: read::room::Details) -> Self {
        let read::room::Details {
            room,
            room_type,
            amenities,
        } = details;

        Self {
            id: room.id,
            hotel_id: room.hotel_id,
            number: room.number.to_string(),
            floor: room.floor,
            is_available: room.is_available,
            room_type: room_type.into(),
            amenities: amenities.into_iter().map(Into::into).collect(),
        }
    }
}

/// Kind of a [`Room`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomType {
    /// ID of this [`RoomType`].
    pub id: room_type::Id,

    /// Name of this [`RoomType`].
    pub name: String,

    /// Description of this [`RoomType`].
    pub description: Option<String>,

    /// Price of a single night.
    pub base_price: Money,

    /// Maximum number of guests.
    pub capacity: i16,
}

impl From<service::domain::RoomType> for RoomType {
    fn from(room_type: service::domain::RoomType) -> Self {
        Self {
            id: room_type.id,
            name: room_type.name.to_string(),
            description: room_type.description.map(|d| d.to_string()),
            base_price: room_type.base_price,
            capacity: room_type.capacity.into(),
        }
    }
}

/// Facility of a [`Room`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Amenity {
    /// ID of this [`Amenity`].
    pub id: amenity::Id,

    /// Name of this [`Amenity`].
    pub name: String,

    /// Description of this [`Amenity`].
    pub description: Option<String>,
}

impl From<service::domain::Amenity> for Amenity {
    fn from(amenity: service::domain::Amenity) -> Self {
        Self {
            id: amenity.id,
            name: amenity.name.to_string(),
            description: amenity.description.map(|d| d.to_string()),
        }
    }
}

/// Query parameters of [`list()`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    /// ID of the hotel to list [`Room`]s of.
    pub hotel_id: Option<hotel::Id>,
}

/// Query parameters of [`available()`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableParams {
    /// Arrival date.
    pub check_in: Date,

    /// Departure date.
    pub check_out: Date,

    /// ID of the hotel to look [`Room`]s in.
    pub hotel_id: Option<hotel::Id>,

    /// Number of guests a [`Room`] must host.
    pub guests: Option<i16>,
}

/// Lists [`Room`]s, optionally of a single hotel.
#[tracing::instrument(skip_all, fields(hotel.id = ?params.hotel_id))]
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<ListParams>, Error>,
) -> Result<Json<Vec<Room>>, Error> {
    let filter = read::room::list::Filter {
        hotel_id: params.hotel_id,
        ..read::room::list::Filter::default()
    };
    let rooms = service
        .execute(query::rooms::List::by(filter))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Lists [`Room`]s free for the whole requested stay.
#[tracing::instrument(
    skip_all,
    fields(
        check_in = %params.check_in,
        check_out = %params.check_out,
        hotel.id = ?params.hotel_id,
    ),
)]
pub async fn available(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<
        Query<AvailableParams>,
        Error,
    >,
) -> Result<Json<Vec<Room>>, Error> {
    let filter = read::room::list::Filter {
        hotel_id: params.hotel_id,
        available_for: super::stay(
            Some(params.check_in),
            Some(params.check_out),
        )?,
        guests: super::guests(params.guests)?,
    };
    let rooms = service
        .execute(query::rooms::List::by(filter))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Returns a single [`Room`].
#[tracing::instrument(skip_all, fields(room.id = %id))]
pub async fn get(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<room::Id>, Error>,
) -> Result<Json<Room>, Error> {
    service
        .execute(query::room::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|r| Json(r.into()))
        .ok_or_else(|| RoomError::NotExists.into())
}

define_error! {
    enum RoomError {
        #[code = "ROOM_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Room does not exist"]
        NotExists,
    }
}

#[cfg(test)]
mod spec {
    use http::{Method, StatusCode};
    use serde_json::json;
    use service::command::{self, Command as _};

    use crate::api::test::{self, date, get};

    #[tokio::test]
    async fn lists_rooms_available_for_a_stay() {
        let svc = test::service();
        let hotel = test::hotel(&svc, "Rooms", 4).await;
        let booked = test::room(&svc, &hotel, "101", 100, 2).await;
        let free = test::room(&svc, &hotel, "102", 150, 4).await;
        let customer =
            test::customer(&svc, "guest@example.com", "Secret1!").await;
        _ = svc
            .execute(command::CreateBooking {
                customer_id: customer.id,
                room_id: booked.id,
                check_in: date("2025-01-05"),
                check_out: date("2025-01-08"),
            })
            .await
            .unwrap();

        let (status, _, body) = test::send(
            &svc,
            get("/api/rooms/available?checkIn=2025-01-06&checkOut=2025-01-10"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<_> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(free.id)]);

        let (_, _, body) = test::send(
            &svc,
            get("/api/rooms/available?checkIn=2025-01-08&checkOut=2025-01-10"),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, _, body) = test::send(
            &svc,
            get(&format!(
                "/api/rooms/available?checkIn=2025-01-08&checkOut=2025-01-10\
                 &hotelId={}&guests=3",
                hotel.id,
            )),
        )
        .await;
        assert_eq!(body[0]["id"], json!(free.id));
        assert_eq!(body[0]["roomType"]["capacity"], json!(4));
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejects_reversed_range() {
        let svc = test::service();

        let (status, _, body) = test::send(
            &svc,
            get("/api/rooms/available?checkIn=2025-01-08&checkOut=2025-01-08"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_RANGE");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn rejects_malformed_dates() {
        let svc = test::service();

        let (status, _, body) = test::send(
            &svc,
            get("/api/rooms/available?checkIn=05.01.2025&checkOut=2025-01-08"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn returns_room_or_not_found() {
        let svc = test::service();
        let hotel = test::hotel(&svc, "Rooms", 4).await;
        let room = test::room(&svc, &hotel, "101", 100, 2).await;

        let (status, _, body) =
            test::send(&svc, get(&format!("/api/rooms/{}", room.id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], "101");
        assert_eq!(body["hotelId"], json!(hotel.id));
        assert_eq!(body["roomType"]["basePrice"]["currency"], "USD");
        assert_eq!(body["amenities"][0]["name"], "Wi-Fi");

        let (status, _, body) = test::send(
            &svc,
            get(&format!("/api/rooms/{}", service::domain::room::Id::new())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ROOM_NOT_EXISTS");

        let (status, _, _) = test::send(&svc, get("/api/rooms/42")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = test::send(
            &svc,
            test::json(Method::POST, "/api/rooms", &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
