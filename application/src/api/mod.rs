//! Web API definitions.

pub mod booking;
pub mod customer;
pub mod favorite;
pub mod hotel;
pub mod review;
pub mod room;
pub mod session;

use axum::{
    routing::{get, post, put},
    Router,
};
use common::Date;
use serde::Serialize;
use service::domain::{booking::Stay, room_type::Capacity};

use crate::{define_error, Error};

/// Builds the [`Router`] serving all the Web API endpoints.
///
/// The [`Service`] is expected to be provided as an [`Extension`].
///
/// [`Extension`]: axum::Extension
/// [`Service`]: crate::Service
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/api/hotels", get(hotel::search))
        .route("/api/hotels/:id", get(hotel::get))
        .route("/api/hotels/:id/rooms", get(hotel::rooms))
        .route(
            "/api/hotels/:id/reviews",
            get(review::list).post(review::add),
        )
        .route("/api/rooms", get(room::list))
        .route("/api/rooms/available", get(room::available))
        .route("/api/rooms/:id", get(room::get))
        .route("/api/bookings", get(booking::list).post(booking::create))
        .route("/api/bookings/:id", get(booking::get))
        .route("/api/bookings/:id/cancel", put(booking::cancel))
        .route("/api/bookings/:id/status", put(booking::update_status))
        .route("/api/customers", post(customer::register))
        .route("/api/customers/me", get(customer::me))
        .route("/api/customers/me/favorites", get(favorite::list))
        .route(
            "/api/customers/me/favorites/:id",
            put(favorite::add).delete(favorite::remove),
        )
        .route(
            "/api/customers/me/recommendations",
            get(hotel::recommended),
        )
        .route("/api/sessions", post(session::create))
}

/// Page of items with its pagination info.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this [`Page`].
    pub data: Vec<T>,

    /// Total number of items matching the request.
    pub total_count: u64,

    /// Number of this [`Page`], starting from `1`.
    pub page: u32,

    /// Maximum number of items on this [`Page`].
    pub page_size: u32,

    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Converts a [`common::pagination::Page`] into a [`Page`].
    pub fn from_page<I>(page: common::pagination::Page<I>) -> Self
    where
        I: Into<T>,
    {
        let total_pages = page.total_pages();
        let common::pagination::Page {
            items,
            total_count,
            arguments,
        } = page;

        Self {
            data: items.into_iter().map(Into::into).collect(),
            total_count,
            page: arguments.page(),
            page_size: arguments.page_size(),
            total_pages,
        }
    }
}

/// Parses an optional [`Stay`] out of the provided dates.
///
/// Both dates must be either provided or omitted together.
fn stay(
    check_in: Option<Date>,
    check_out: Option<Date>,
) -> Result<Option<Stay>, Error> {
    match (check_in, check_out) {
        (None, None) => Ok(None),
        (Some(check_in), Some(check_out)) => {
            Stay::new(check_in, check_out).map(Some).map_err(|e| {
                Error::from(ArgumentError::InvalidRange).with_details(&e)
            })
        }
        (Some(_), None) | (None, Some(_)) => {
            Err(ArgumentError::IncompleteRange.into())
        }
    }
}

/// Parses an optional number of guests into a [`Capacity`].
fn guests(guests: Option<i16>) -> Result<Option<Capacity>, Error> {
    guests
        .map(|g| Capacity::new(g).ok_or(ArgumentError::InvalidGuests))
        .transpose()
        .map_err(Into::into)
}

define_error! {
    enum ArgumentError {
        #[code = "INVALID_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Check-out date must be after check-in date"]
        InvalidRange,

        #[code = "INCOMPLETE_RANGE"]
        #[status = BAD_REQUEST]
        #[message = "Both check-in and check-out dates must be provided"]
        IncompleteRange,

        #[code = "INVALID_GUESTS"]
        #[status = BAD_REQUEST]
        #[message = "Number of guests must be positive"]
        InvalidGuests,
    }
}

#[cfg(test)]
pub(crate) mod test {
    //! Helpers for testing the Web API against the in-memory database.

    use std::{str::FromStr as _, time::Duration};

    use axum::{body::Body, Extension, Router};
    use common::{money::Currency, operations::Insert, Date, DateTime, Money};
    use http::{header, Request, StatusCode};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use service::{
        domain::{
            amenity, city, contact, customer, hotel, room, room_type, Amenity,
            City, Customer, Hotel, Room, RoomType,
        },
        infra::{notification, Database as _, Memory},
    };
    use tower::ServiceExt as _;

    use crate::Service;

    /// Creates a new [`Service`] over an empty in-memory database.
    pub(crate) fn service() -> Service {
        let secret = b"test";
        Service::new(
            service::Config {
                jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(
                    secret,
                ),
                jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(
                    secret,
                ),
                session_ttl: Duration::from_secs(30 * 60),
            },
            Memory::default(),
            notification::Recorder::default(),
        )
    }

    /// Sends the provided `request` to the [`super::router()`] and returns
    /// the response status and headers along with its JSON body.
    pub(crate) async fn send(
        svc: &Service,
        request: Request<Body>,
    ) -> (StatusCode, http::HeaderMap, Value) {
        let app: Router = super::router().layer(Extension(svc.clone()));
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }

    /// Builds a `GET` request to the provided `uri`.
    pub(crate) fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    /// Builds a request with the provided JSON `body`.
    pub(crate) fn json(
        method: http::Method,
        uri: &str,
        body: &Value,
    ) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Adds a `Bearer` authorization with the provided `token` to the
    /// `request`.
    pub(crate) fn bearer(
        mut request: Request<Body>,
        token: &str,
    ) -> Request<Body> {
        _ = request.headers_mut().insert(
            header::AUTHORIZATION,
            format!("Bearer {token}").parse().unwrap(),
        );
        request
    }

    /// Logs in with the provided credentials and returns the session token.
    pub(crate) async fn login(
        svc: &Service,
        email: &str,
        password: &str,
    ) -> String {
        let (status, _, body) = send(
            svc,
            json(
                http::Method::POST,
                "/api/sessions",
                &serde_json::json!({"email": email, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_owned()
    }

    /// Parses a [`Date`] in `YYYY-MM-DD` format.
    pub(crate) fn date(s: &str) -> Date {
        Date::from_str(s).unwrap()
    }

    /// Seeds a [`Hotel`] with the provided `stars` in a new [`City`].
    pub(crate) async fn hotel(svc: &Service, name: &str, stars: i16) -> Hotel {
        let city = City {
            id: city::Id::new(),
            name: city::Name::new("Tbilisi").unwrap(),
            country: city::Name::new("Georgia").unwrap(),
        };
        svc.database().execute(Insert(city.clone())).await.unwrap();

        let hotel = Hotel {
            id: hotel::Id::new(),
            name: hotel::Name::new(name).unwrap(),
            star_rating: hotel::StarRating::new(stars).unwrap(),
            description: None,
            phone: None,
            email: None,
            image_url: None,
            street: hotel::Street::new("1 Rustaveli Ave").unwrap(),
            city_id: city.id,
            created_at: DateTime::now().coerce(),
        };
        svc.database().execute(Insert(hotel.clone())).await.unwrap();
        hotel
    }

    /// Seeds a [`Room`] of the provided [`Hotel`] costing `nightly` US
    /// dollars and hosting up to `capacity` guests.
    pub(crate) async fn room(
        svc: &Service,
        hotel: &Hotel,
        number: &str,
        nightly: i64,
        capacity: i16,
    ) -> Room {
        let room_type = RoomType {
            id: room_type::Id::new(),
            name: room_type::Name::new("Standard").unwrap(),
            description: None,
            base_price: Money::new(Decimal::from(nightly), Currency::Usd),
            capacity: room_type::Capacity::new(capacity).unwrap(),
        };
        svc.database()
            .execute(Insert(room_type.clone()))
            .await
            .unwrap();

        let amenity = Amenity {
            id: amenity::Id::new(),
            name: amenity::Name::new("Wi-Fi").unwrap(),
            description: None,
        };
        svc.database()
            .execute(Insert(amenity.clone()))
            .await
            .unwrap();

        let room = Room {
            id: room::Id::new(),
            hotel_id: hotel.id,
            type_id: room_type.id,
            number: room::Number::new(number).unwrap(),
            floor: Some(1),
            is_available: true,
            amenities: vec![amenity.id],
        };
        svc.database().execute(Insert(room.clone())).await.unwrap();
        room
    }

    /// Seeds a [`Customer`] with the provided `email` and `password`.
    pub(crate) async fn customer(
        svc: &Service,
        email: &str,
        password: &str,
    ) -> Customer {
        let customer = Customer {
            id: customer::Id::new(),
            first_name: customer::Name::new("Nino").unwrap(),
            last_name: customer::Name::new("Beridze").unwrap(),
            email: contact::Email::new(email).unwrap(),
            phone: None,
            password_hash: customer::PasswordHash::new(
                &customer::Password::new(password).unwrap(),
            )
            .unwrap(),
            created_at: DateTime::now().coerce(),
        };
        svc.database()
            .execute(Insert(customer.clone()))
            .await
            .unwrap();
        customer
    }
}
