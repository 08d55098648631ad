//! Customer-related Web API endpoints.

use axum::{http::StatusCode, Extension, Json};
use axum_extra::extract::WithRejection;
use common::DateTime;
use derive_more::Debug;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, Command as _},
    domain::{contact, customer},
    query, Query as _,
};

use crate::{define_error, AsError, Error, Service, Session};

/// Registered customer.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: customer::Id,

    /// First name of this [`Customer`].
    pub first_name: String,

    /// Last name of this [`Customer`].
    pub last_name: String,

    /// Email address of this [`Customer`].
    pub email: String,

    /// Phone number of this [`Customer`].
    pub phone: Option<String>,

    /// When this [`Customer`] was registered.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub created_at: DateTime,
}

impl From<service::domain::Customer> for Customer {
    fn from(customer: service::domain::Customer) -> Self {
        Self {
            id: customer.id,
            first_name: customer.first_name.to_string(),
            last_name: customer.last_name.to_string(),
            email: customer.email.to_string(),
            phone: customer.phone.map(|p| p.to_string()),
            created_at: customer.created_at.coerce(),
        }
    }
}

/// Body of a [`register()`] request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// First name of the new [`Customer`].
    pub first_name: String,

    /// Last name of the new [`Customer`].
    pub last_name: String,

    /// Email address of the new [`Customer`].
    pub email: String,

    /// Phone number of the new [`Customer`].
    pub phone: Option<String>,

    /// Password of the new [`Customer`].
    #[debug(skip)]
    pub password: String,
}

impl TryFrom<Registration> for command::RegisterCustomer {
    type Error = CustomerError;

    fn try_from(body: Registration) -> Result<Self, Self::Error> {
        use CustomerError as E;

        let Registration {
            first_name,
            last_name,
            email,
            phone,
            password,
        } = body;

        Ok(Self {
            first_name: customer::Name::new(first_name)
                .ok_or(E::InvalidName)?,
            last_name: customer::Name::new(last_name).ok_or(E::InvalidName)?,
            email: contact::Email::new(email).ok_or(E::InvalidEmail)?,
            phone: phone
                .map(|p| contact::Phone::new(p).ok_or(E::InvalidPhone))
                .transpose()?,
            password: SecretBox::new(Box::new(
                customer::Password::new(password).ok_or(E::InvalidPassword)?,
            )),
        })
    }
}

/// Registers a new [`Customer`].
#[tracing::instrument(skip_all)]
pub async fn register(
    Extension(service): Extension<Service>,
    WithRejection(Json(body), _): WithRejection<Json<Registration>, Error>,
) -> Result<(StatusCode, Json<Customer>), Error> {
    let cmd = command::RegisterCustomer::try_from(body)?;

    let customer = service
        .execute(cmd)
        .await
        .map_err(AsError::into_error)?;

    Ok((StatusCode::CREATED, Json(customer.into())))
}

/// Returns the [`Customer`] owning the current [`Session`].
#[tracing::instrument(skip_all, fields(customer.id = %session.customer_id))]
pub async fn me(
    Extension(service): Extension<Service>,
    session: Session,
) -> Result<Json<Customer>, Error> {
    service
        .execute(query::customer::ById::by(session.customer_id))
        .await
        .map_err(AsError::into_error)?
        .map(|c| Json(c.into()))
        .ok_or_else(|| CustomerError::NotExists.into())
}

impl AsError for command::register_customer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::EmailOccupied(_) => Some(
                Error::from(CustomerError::EmailOccupied).with_details(self),
            ),
            Self::PasswordHash(_) => None,
        }
    }
}

define_error! {
    enum CustomerError {
        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Customer does not exist"]
        NotExists,

        #[code = "EMAIL_OCCUPIED"]
        #[status = BAD_REQUEST]
        #[message = "Email is already registered"]
        EmailOccupied,

        #[code = "INVALID_NAME"]
        #[status = BAD_REQUEST]
        #[message = "Name must be non-empty and at most 100 characters long"]
        InvalidName,

        #[code = "INVALID_EMAIL"]
        #[status = BAD_REQUEST]
        #[message = "Invalid email address"]
        InvalidEmail,

        #[code = "INVALID_PHONE"]
        #[status = BAD_REQUEST]
        #[message = "Invalid phone number"]
        InvalidPhone,

        #[code = "INVALID_PASSWORD"]
        #[status = BAD_REQUEST]
        #[message = "Password must be 8 to 128 characters long and mix \
                     digits, upper and lower case letters and symbols"]
        InvalidPassword,
    }
}
