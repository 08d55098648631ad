//! Session-related Web API endpoints.

use axum::{Extension, Json};
use axum_extra::extract::WithRejection;
use common::DateTime;
use derive_more::Debug;
use secrecy::SecretBox;
use serde::{Deserialize, Serialize};
use service::{
    command::{self, create_customer_session, Command as _},
    domain::{contact, customer},
};

use crate::{define_error, AsError, Error, Service};

use super::customer::Customer;

/// Credentials of a [`Customer`].
#[derive(Clone, Debug, Deserialize)]
pub struct Credentials {
    /// Email address of the [`Customer`].
    pub email: String,

    /// Password of the [`Customer`].
    #[debug(skip)]
    pub password: String,
}

/// Created session of a [`Customer`].
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token to authorize requests with.
    #[debug(skip)]
    pub token: String,

    /// When the [`Session::token`] expires.
    #[serde(with = "common::datetime::serde::rfc3339")]
    pub expires_at: DateTime,

    /// [`Customer`] owning this [`Session`].
    pub customer: Customer,
}

impl From<create_customer_session::Output> for Session {
    fn from(output: create_customer_session::Output) -> Self {
        Self {
            token: output.token.to_string(),
            expires_at: output.expires_at.coerce(),
            customer: output.customer.into(),
        }
    }
}

/// Logs a [`Customer`] in by their [`Credentials`].
#[tracing::instrument(skip_all)]
pub async fn create(
    Extension(service): Extension<Service>,
    WithRejection(Json(body), _): WithRejection<Json<Credentials>, Error>,
) -> Result<Json<Session>, Error> {
    let Credentials { email, password } = body;

    // Malformed credentials cannot match any customer.
    let email = contact::Email::new(email)
        .ok_or(SessionError::WrongCredentials)?;
    let password = customer::Password::new(password)
        .ok_or(SessionError::WrongCredentials)?;

    service
        .execute(command::CreateCustomerSession::ByCredentials {
            email,
            password: SecretBox::new(Box::new(password)),
        })
        .await
        .map(|o| Json(o.into()))
        .map_err(AsError::into_error)
}

impl AsError for create_customer_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::WrongCredentials => {
                Some(SessionError::WrongCredentials.into())
            }
            Self::CustomerNotExists(_) => Some(
                Error::from(SessionError::CustomerNotExists).with_details(self),
            ),
            Self::JsonWebTokenEncodeError(_) | Self::PasswordHash(_) => None,
        }
    }
}

define_error! {
    enum SessionError {
        #[code = "WRONG_CREDENTIALS"]
        #[status = UNAUTHORIZED]
        #[message = "Wrong email or password"]
        WrongCredentials,

        #[code = "CUSTOMER_NOT_EXISTS"]
        #[status = NOT_FOUND]
        #[message = "Customer does not exist"]
        CustomerNotExists,
    }
}
