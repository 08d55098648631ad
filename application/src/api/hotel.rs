//! Hotel-related Web API endpoints.

use std::str::FromStr as _;

use axum::{
    extract::{Path, Query},
    Extension, Json,
};
use axum_extra::extract::WithRejection;
use common::{pagination::Order, Date, Money};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use service::{
    domain::{amenity, city, hotel, hotel::StarRating, room_type},
    query,
    read::{
        self,
        hotel::{recommended, search},
    },
    Query as _,
};

use crate::{define_error, AsError, Error, Service, Session};

use super::{room::Room, Page};

/// Hotel as it appears in search results.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// ID of the hotel.
    pub id: hotel::Id,

    /// Name of the hotel.
    pub name: String,

    /// Official star rating of the hotel.
    pub star_rating: i16,

    /// Description of the hotel.
    pub description: Option<String>,

    /// URL of the hotel's image.
    pub image_url: Option<String>,

    /// Name of the city the hotel is located in.
    pub city_name: String,

    /// The lowest nightly price among the hotel's rooms.
    pub min_price: Option<Money>,
}

impl From<read::hotel::Summary> for Summary {
    fn from(summary: read::hotel::Summary) -> Self {
        let read::hotel::Summary {
            hotel,
            city,
            min_price,
        } = summary;

        Self {
            id: hotel.id,
            name: hotel.name.to_string(),
            star_rating: hotel.star_rating.into(),
            description: hotel.description.map(|d| d.to_string()),
            image_url: hotel.image_url.map(|u| u.to_string()),
            city_name: city.name.to_string(),
            min_price,
        }
    }
}

/// Hotel with its [`Address`] and [`Room`]s.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// ID of this [`Hotel`].
    pub id: hotel::Id,

    /// Name of this [`Hotel`].
    pub name: String,

    /// Official star rating of this [`Hotel`].
    pub star_rating: i16,

    /// Description of this [`Hotel`].
    pub description: Option<String>,

    /// Contact phone number of this [`Hotel`].
    pub phone: Option<String>,

    /// Contact email address of this [`Hotel`].
    pub email: Option<String>,

    /// URL of this [`Hotel`]'s image.
    pub image_url: Option<String>,

    /// [`Address`] of this [`Hotel`].
    pub address: Address,

    /// [`Room`]s of this [`Hotel`].
    pub rooms: Vec<Room>,
}

impl From<read::hotel::Details> for Hotel {
    fn from(details: read::hotel::Details) -> Self {
        let read::hotel::Details { hotel, city, rooms } = details;

        Self {
            id: hotel.id,
            name: hotel.name.to_string(),
            star_rating: hotel.star_rating.into(),
            description: hotel.description.map(|d| d.to_string()),
            phone: hotel.phone.map(|p| p.to_string()),
            email: hotel.email.map(|e| e.to_string()),
            image_url: hotel.image_url.map(|u| u.to_string()),
            address: Address {
                street: hotel.street.to_string(),
                city_id: city.id,
                city_name: city.name.to_string(),
                country_name: city.country.to_string(),
            },
            rooms: rooms.into_iter().map(Into::into).collect(),
        }
    }
}

/// Postal address of a [`Hotel`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Street line.
    pub street: String,

    /// ID of the city.
    pub city_id: city::Id,

    /// Name of the city.
    pub city_name: String,

    /// Name of the country.
    pub country_name: String,
}

/// Query parameters of [`search()`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    /// ID of the city to search hotels in.
    pub city_id: Option<city::Id>,

    /// Minimal star rating.
    pub min_stars: Option<i16>,

    /// Maximal star rating.
    pub max_stars: Option<i16>,

    /// Some room must cost at least this amount per night.
    pub min_price: Option<Decimal>,

    /// Some room must cost at most this amount per night.
    pub max_price: Option<Decimal>,

    /// Comma-separated IDs of amenities, some of which a room must have.
    pub amenities: Option<String>,

    /// Number of guests some open room must host.
    pub guests: Option<i16>,

    /// ID of the room type some open room must be of.
    pub room_type_id: Option<room_type::Id>,

    /// Number of the requested page, starting from `1`.
    pub page: Option<u32>,

    /// Maximum number of hotels on a page.
    pub page_size: Option<u32>,

    /// Key to sort hotels by: `price`, `name` or `rating`.
    pub sort_by: Option<String>,

    /// Indicator whether to sort in ascending order.
    pub ascending: Option<bool>,
}

impl TryFrom<SearchParams> for search::Selector {
    type Error = Error;

    fn try_from(params: SearchParams) -> Result<Self, Self::Error> {
        let SearchParams {
            city_id,
            min_stars,
            max_stars,
            min_price,
            max_price,
            amenities,
            guests,
            room_type_id,
            page,
            page_size,
            sort_by,
            ascending,
        } = params;

        let stars = |s: Option<i16>| {
            s.map(|s| StarRating::new(s).ok_or(HotelError::InvalidStars))
                .transpose()
        };
        let amenities = amenities
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(amenity::Id::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                Error::from(HotelError::InvalidAmenities).with_details(&e)
            })?;

        let default_sort = search::Sort::default();
        Ok(Self {
            arguments: search::Arguments::new(
                page,
                page_size,
                search::DEFAULT_PAGE_SIZE,
            )
            .ok_or(HotelError::InvalidPagination)?,
            filter: search::Filter {
                city_id,
                min_stars: stars(min_stars)?,
                max_stars: stars(max_stars)?,
                min_price,
                max_price,
                amenities,
                guests: super::guests(guests)?,
                room_type_id,
            },
            sort: search::Sort {
                by: sort_by.as_deref().map_or(
                    default_sort.by,
                    search::SortBy::parse_or_default,
                ),
                order: ascending.map_or(default_sort.order, Order::ascending),
            },
        })
    }
}

/// Query parameters of [`rooms()`].
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsParams {
    /// Arrival date.
    pub check_in: Option<Date>,

    /// Departure date.
    pub check_out: Option<Date>,
}

/// Searches a [`Page`] of hotels.
#[tracing::instrument(skip_all)]
pub async fn search(
    Extension(service): Extension<Service>,
    WithRejection(Query(params), _): WithRejection<Query<SearchParams>, Error>,
) -> Result<Json<Page<Summary>>, Error> {
    let selector = search::Selector::try_from(params)?;
    let page = service
        .execute(query::hotels::Search::by(selector))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(Page::from_page(page)))
}

/// Query parameters of [`recommended()`].
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct RecommendedParams {
    /// Maximum number of hotels to recommend.
    pub count: Option<u32>,
}

/// Recommends hotels resembling the ones the [`Session`] owner booked: in
/// the same cities and rated within one star of their average.
#[tracing::instrument(skip_all, fields(customer.id = %session.customer_id))]
pub async fn recommended(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Query(params), _): WithRejection<
        Query<RecommendedParams>,
        Error,
    >,
) -> Result<Json<Vec<Summary>>, Error> {
    let count = params.count.unwrap_or(recommended::DEFAULT_COUNT);
    if !(1..=MAX_RECOMMENDED).contains(&count) {
        return Err(HotelError::InvalidCount.into());
    }

    let hotels = service
        .execute(query::hotels::Recommended::by(recommended::Selector {
            customer_id: session.customer_id,
            count,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(hotels.into_iter().map(Into::into).collect()))
}

/// Maximum number of hotels [`recommended()`] at once.
const MAX_RECOMMENDED: u32 = 100;

/// Returns a single [`Hotel`] with all its [`Room`]s.
#[tracing::instrument(skip_all, fields(hotel.id = %id))]
pub async fn get(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<hotel::Id>, Error>,
) -> Result<Json<Hotel>, Error> {
    service
        .execute(query::hotel::Details::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(|h| Json(h.into()))
        .ok_or_else(|| HotelError::NotExists.into())
}

/// Lists [`Room`]s of a hotel, optionally only the ones free for the whole
/// requested stay.
#[tracing::instrument(skip_all, fields(hotel.id = %id))]
pub async fn rooms(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<hotel::Id>, Error>,
    WithRejection(Query(params), _): WithRejection<Query<RoomsParams>, Error>,
) -> Result<Json<Vec<Room>>, Error> {
    let available_for = super::stay(params.check_in, params.check_out)?;

    ensure_exists(&service, id).await?;

    let rooms = service
        .execute(query::rooms::List::by(read::room::list::Filter {
            hotel_id: Some(id),
            available_for,
            guests: None,
        }))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(rooms.into_iter().map(Into::into).collect()))
}

/// Checks whether the hotel with the provided `id` exists.
///
/// # Errors
///
/// With [`HotelError::NotExists`] if it doesn't.
pub(crate) async fn ensure_exists(
    service: &Service,
    id: hotel::Id,
) -> Result<(), Error> {
    service
        .execute(query::hotel::ById::by(id))
        .await
        .map_err(AsError::into_error)?
        .map(drop)
        .ok_or_else(|| HotelError::NotExists.into())
}

define_error! {
    enum HotelError {
        #[code = "HOTEL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Hotel does not exist"]
        NotExists,

        #[code = "INVALID_STAR_RATING"]
        #[status = BAD_REQUEST]
        #[message = "Star rating must be from 1 to 5"]
        InvalidStars,

        #[code = "INVALID_AMENITIES"]
        #[status = BAD_REQUEST]
        #[message = "Amenities must be comma-separated IDs"]
        InvalidAmenities,

        #[code = "INVALID_PAGINATION"]
        #[status = BAD_REQUEST]
        #[message = "Page must be positive and page size must be from 1 to 100"]
        InvalidPagination,

        #[code = "INVALID_COUNT"]
        #[status = BAD_REQUEST]
        #[message = "Count must be from 1 to 100"]
        InvalidCount,
    }
}

#[cfg(test)]
mod spec {
    use http::StatusCode;
    use serde_json::json;
    use service::command::{self, Command as _};

    use crate::api::test::{self, bearer, date, get};

    const PASSWORD: &str = "Secret1!";

    #[tokio::test]
    async fn searches_by_min_stars() {
        let svc = test::service();
        _ = test::hotel(&svc, "Three", 3).await;
        let four = test::hotel(&svc, "Four", 4).await;
        let five = test::hotel(&svc, "Five", 5).await;

        let (status, _, body) =
            test::send(&svc, get("/api/hotels?minStars=4")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 2);
        assert_eq!(body["page"], 1);
        assert_eq!(body["pageSize"], 10);
        assert_eq!(body["totalPages"], 1);
        assert_eq!(body["data"][0]["id"], json!(five.id));
        assert_eq!(body["data"][1]["id"], json!(four.id));
        assert_eq!(body["data"][1]["cityName"], "Tbilisi");
    }

    #[tokio::test]
    async fn sorts_by_price_and_paginates() {
        let svc = test::service();
        let cheap = test::hotel(&svc, "Cheap", 3).await;
        _ = test::room(&svc, &cheap, "1", 50, 2).await;
        let pricey = test::hotel(&svc, "Pricey", 5).await;
        _ = test::room(&svc, &pricey, "1", 300, 2).await;
        let empty = test::hotel(&svc, "Empty", 4).await;

        let (_, _, body) = test::send(
            &svc,
            get("/api/hotels?sortBy=price&ascending=true&pageSize=2"),
        )
        .await;
        assert_eq!(body["totalCount"], 3);
        assert_eq!(body["totalPages"], 2);
        assert_eq!(body["data"][0]["id"], json!(cheap.id));
        assert_eq!(body["data"][0]["minPrice"]["amount"], "50");
        assert_eq!(body["data"][1]["id"], json!(pricey.id));

        let (_, _, body) = test::send(
            &svc,
            get("/api/hotels?sortBy=price&ascending=true&pageSize=2&page=2"),
        )
        .await;
        assert_eq!(body["data"][0]["id"], json!(empty.id));
        assert_eq!(body["data"][0]["minPrice"], json!(null));
    }

    #[tokio::test]
    async fn searches_by_room_type() {
        let svc = test::service();
        let open = test::hotel(&svc, "Open", 3).await;
        let room = test::room(&svc, &open, "1", 80, 2).await;
        _ = test::hotel(&svc, "Other", 4).await;

        let (status, _, body) = test::send(
            &svc,
            get(&format!("/api/hotels?roomTypeId={}", room.type_id)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalCount"], 1);
        assert_eq!(body["data"][0]["id"], json!(open.id));

        let (status, _, _) =
            test::send(&svc, get("/api/hotels?roomTypeId=suite")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn recommends_hotels_to_session_owner() {
        let svc = test::service();
        let booked = test::hotel(&svc, "Booked", 4).await;
        let room = test::room(&svc, &booked, "1", 80, 2).await;
        _ = test::hotel(&svc, "Elsewhere", 4).await;
        let customer =
            test::customer(&svc, "guest@example.com", PASSWORD).await;
        _ = svc
            .execute(command::CreateBooking {
                customer_id: customer.id,
                room_id: room.id,
                check_in: date("2025-01-05"),
                check_out: date("2025-01-08"),
            })
            .await
            .unwrap();
        let token = test::login(&svc, "guest@example.com", PASSWORD).await;
        let uri = "/api/customers/me/recommendations";

        let (status, _, body) =
            test::send(&svc, bearer(get(uri), &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], json!(booked.id));

        let (status, _, body) = test::send(
            &svc,
            bearer(get(&format!("{uri}?count=0")), &token),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_COUNT");

        let (status, _, _) = test::send(&svc, get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_invalid_search_params() {
        let svc = test::service();

        for (uri, code) in [
            ("/api/hotels?minStars=6", "INVALID_STAR_RATING"),
            ("/api/hotels?page=0", "INVALID_PAGINATION"),
            ("/api/hotels?pageSize=101", "INVALID_PAGINATION"),
            ("/api/hotels?amenities=1,2", "INVALID_AMENITIES"),
            ("/api/hotels?guests=0", "INVALID_GUESTS"),
            ("/api/hotels?minPrice=cheap", "BAD_REQUEST"),
        ] {
            let (status, _, body) = test::send(&svc, get(uri)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(body["code"], code, "{uri}");
        }
    }

    #[tokio::test]
    async fn returns_hotel_details() {
        let svc = test::service();
        let hotel = test::hotel(&svc, "Details", 4).await;
        _ = test::room(&svc, &hotel, "201", 120, 2).await;
        _ = test::room(&svc, &hotel, "101", 100, 2).await;

        let (status, _, body) =
            test::send(&svc, get(&format!("/api/hotels/{}", hotel.id))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Details");
        assert_eq!(body["starRating"], 4);
        assert_eq!(body["address"]["cityName"], "Tbilisi");
        assert_eq!(body["address"]["countryName"], "Georgia");
        assert_eq!(body["rooms"][0]["number"], "101");
        assert_eq!(body["rooms"][1]["number"], "201");

        let (status, _, body) = test::send(
            &svc,
            get(&format!("/api/hotels/{}", service::domain::hotel::Id::new())),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "HOTEL_NOT_EXISTS");
    }

    #[tokio::test]
    async fn lists_hotel_rooms_by_availability() {
        let svc = test::service();
        let hotel = test::hotel(&svc, "Rooms", 4).await;
        let booked = test::room(&svc, &hotel, "101", 100, 2).await;
        let free = test::room(&svc, &hotel, "102", 100, 2).await;
        let customer =
            test::customer(&svc, "guest@example.com", PASSWORD).await;
        _ = svc
            .execute(command::CreateBooking {
                customer_id: customer.id,
                room_id: booked.id,
                check_in: date("2025-01-05"),
                check_out: date("2025-01-08"),
            })
            .await
            .unwrap();
        let uri = format!("/api/hotels/{}/rooms", hotel.id);

        let (_, _, body) = test::send(&svc, get(&uri)).await;
        assert_eq!(body.as_array().unwrap().len(), 2);

        let (_, _, body) = test::send(
            &svc,
            get(&format!("{uri}?checkIn=2025-01-07&checkOut=2025-01-09")),
        )
        .await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], json!(free.id));

        let (status, _, body) =
            test::send(&svc, get(&format!("{uri}?checkIn=2025-01-07"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INCOMPLETE_RANGE");

        let (status, _, _) = test::send(
            &svc,
            get(&format!(
                "/api/hotels/{}/rooms",
                service::domain::hotel::Id::new(),
            )),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
