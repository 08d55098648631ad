//! Review-related Web API endpoints.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;
use common::DateTime;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{booking, hotel, review},
    query, Query as _,
};

use crate::{define_error, AsError, Error, Service, Session};

/// Feedback about a hotel.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// ID of this [`Review`].
    pub id: review::Id,

    /// ID of the booking this [`Review`] is attached to.
    pub booking_id: booking::Id,

    /// Rating from 1 to 5.
    pub rating: i16,

    /// Comment on the hotel.
    pub comment: String,

    /// When this [`Review`] was left.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: DateTime,
}

impl From<service::domain::Review> for Review {
    fn from(review: service::domain::Review) -> Self {
        Self {
            id: review.id,
            booking_id: review.booking_id,
            rating: review.rating.into(),
            comment: review.comment.to_string(),
            created_at: review.created_at.coerce(),
        }
    }
}

/// Body of an [`add()`] request.
#[derive(Clone, Debug, Deserialize)]
pub struct NewReview {
    /// Rating from 1 to 5.
    pub rating: i16,

    /// Comment on the hotel.
    pub comment: String,
}

/// Lists [`Review`]s of a hotel, the newest first.
#[tracing::instrument(skip_all, fields(hotel.id = %id))]
pub async fn list(
    Extension(service): Extension<Service>,
    WithRejection(Path(id), _): WithRejection<Path<hotel::Id>, Error>,
) -> Result<Json<Vec<Review>>, Error> {
    super::hotel::ensure_exists(&service, id).await?;

    let reviews = service
        .execute(query::reviews::ByHotel::by(id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

/// Adds a [`Review`] of a hotel the current customer stayed in.
#[tracing::instrument(
    skip_all,
    fields(customer.id = %session.customer_id, hotel.id = %id),
)]
pub async fn add(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Path(id), _): WithRejection<Path<hotel::Id>, Error>,
    WithRejection(Json(body), _): WithRejection<Json<NewReview>, Error>,
) -> Result<(StatusCode, Json<Review>), Error> {
    let rating =
        review::Rating::new(body.rating).ok_or(ReviewError::InvalidRating)?;
    let comment = review::Comment::new(body.comment)
        .ok_or(ReviewError::InvalidComment)?;

    let review = service
        .execute(command::AddReview {
            customer_id: session.customer_id,
            hotel_id: id,
            rating,
            comment,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

impl AsError for command::add_review::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let err = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HotelNotExists(_) => ReviewError::HotelNotExists,
            Self::NoStay { .. } => ReviewError::NoStay,
        };
        Some(Error::from(err).with_details(self))
    }
}

define_error! {
    enum ReviewError {
        #[code = "HOTEL_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Hotel does not exist"]
        HotelNotExists,

        #[code = "NO_STAY"]
        #[status = BAD_REQUEST]
        #[message = "Only guests who booked the hotel can review it"]
        NoStay,

        #[code = "INVALID_RATING"]
        #[status = BAD_REQUEST]
        #[message = "Rating must be from 1 to 5"]
        InvalidRating,

        #[code = "INVALID_COMMENT"]
        #[status = BAD_REQUEST]
        #[message = "Comment must be from 1 to 2000 characters long"]
        InvalidComment,
    }
}
