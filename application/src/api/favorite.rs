//! Web API endpoints of a customer's favorite hotels.

use axum::{extract::Path, http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;
use service::{
    command::{self, Command as _},
    domain::hotel,
    query, Query as _,
};

use crate::{session::AuthError, AsError, Error, Service, Session};

use super::hotel::{HotelError, Summary};

/// Lists favorite hotels of the [`Session`] owner, the highest rated first.
#[tracing::instrument(skip_all, fields(customer.id = %session.customer_id))]
pub async fn list(
    Extension(service): Extension<Service>,
    session: Session,
) -> Result<Json<Vec<Summary>>, Error> {
    let hotels = service
        .execute(query::favorites::ByCustomer::by(session.customer_id))
        .await
        .map_err(AsError::into_error)?;

    Ok(Json(hotels.into_iter().map(Into::into).collect()))
}

/// Marks a hotel as a favorite of the [`Session`] owner.
#[tracing::instrument(
    skip_all,
    fields(customer.id = %session.customer_id, hotel.id = %hotel_id),
)]
pub async fn add(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Path(hotel_id), _): WithRejection<Path<hotel::Id>, Error>,
) -> Result<StatusCode, Error> {
    service
        .execute(command::AddFavorite {
            customer_id: session.customer_id,
            hotel_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(StatusCode::NO_CONTENT)
}

/// Unmarks a favorite hotel of the [`Session`] owner.
#[tracing::instrument(
    skip_all,
    fields(customer.id = %session.customer_id, hotel.id = %hotel_id),
)]
pub async fn remove(
    Extension(service): Extension<Service>,
    session: Session,
    WithRejection(Path(hotel_id), _): WithRejection<Path<hotel::Id>, Error>,
) -> Result<StatusCode, Error> {
    service
        .execute(command::RemoveFavorite {
            customer_id: session.customer_id,
            hotel_id,
        })
        .await
        .map_err(AsError::into_error)?;

    Ok(StatusCode::NO_CONTENT)
}

impl AsError for command::add_favorite::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        let err: Error = match self {
            Self::Db(e) => return e.try_as_error(),
            Self::HotelNotExists(_) => HotelError::NotExists.into(),
            // The session outlived its customer.
            Self::CustomerNotExists(_) => AuthError::InvalidToken.into(),
        };
        Some(err.with_details(self))
    }
}

impl AsError for command::remove_favorite::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
        }
    }
}

#[cfg(test)]
mod spec {
    use axum::body::Body;
    use http::{Method, Request, StatusCode};
    use serde_json::json;
    use service::domain::hotel;

    use crate::api::test::{self, bearer, get};

    const PASSWORD: &str = "Secret1!";

    fn request(method: Method, uri: &str, token: &str) -> Request<Body> {
        bearer(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
            token,
        )
    }

    #[tokio::test]
    async fn marks_and_unmarks_favorites() {
        let svc = test::service();
        let cozy = test::hotel(&svc, "Cozy", 3).await;
        let grand = test::hotel(&svc, "Grand", 5).await;
        _ = test::customer(&svc, "guest@example.com", PASSWORD).await;
        let token = test::login(&svc, "guest@example.com", PASSWORD).await;
        let uri = |id: hotel::Id| format!("/api/customers/me/favorites/{id}");

        for id in [cozy.id, grand.id, cozy.id] {
            let (status, _, _) =
                test::send(&svc, request(Method::PUT, &uri(id), &token)).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, _, body) = test::send(
            &svc,
            request(Method::GET, "/api/customers/me/favorites", &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[0]["id"], json!(grand.id));
        assert_eq!(body[1]["id"], json!(cozy.id));

        for _ in 0..2 {
            let (status, _, _) = test::send(
                &svc,
                request(Method::DELETE, &uri(grand.id), &token),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (_, _, body) = test::send(
            &svc,
            request(Method::GET, "/api/customers/me/favorites", &token),
        )
        .await;
        assert_eq!(body, json!([{
            "id": cozy.id,
            "name": "Cozy",
            "starRating": 3,
            "description": null,
            "imageUrl": null,
            "cityName": "Tbilisi",
            "minPrice": null,
        }]));
    }

    #[tokio::test]
    async fn rejects_unknown_hotel_and_anonymous_calls() {
        let svc = test::service();
        _ = test::customer(&svc, "guest@example.com", PASSWORD).await;
        let token = test::login(&svc, "guest@example.com", PASSWORD).await;

        let (status, _, body) = test::send(
            &svc,
            request(
                Method::PUT,
                &format!("/api/customers/me/favorites/{}", hotel::Id::new()),
                &token,
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "HOTEL_NOT_EXISTS");

        let (status, _, body) =
            test::send(&svc, get("/api/customers/me/favorites")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "AUTHORIZATION_REQUIRED");
    }
}
