//! [`Session`]-related definitions.

use axum::{async_trait, extract::FromRequestParts, RequestPartsExt as _};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use service::{
    command::{self, Command as _},
    domain::customer::{self, session},
};

use crate::{define_error, AsError, Error, Service};

/// Authorized session of a customer, extracted from the `Authorization`
/// header of an HTTP request.
#[derive(Clone, Debug)]
pub struct Session {
    /// ID of the customer owning this [`Session`].
    pub customer_id: customer::Id,

    /// Authentication token.
    pub token: session::Token,

    /// When this [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(
        parts: &mut http::request::Parts,
        _: &S,
    ) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Service>()
            .cloned()
            .ok_or_else(|| Error::internal(&"missing `Service` extension"))?;

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|e| {
                if e.is_missing() {
                    AuthError::AuthorizationRequired.into()
                } else {
                    e.into_error()
                }
            })?;

        #[expect(unsafe_code, reason = "specified in correct header")]
        let token =
            unsafe { session::Token::new_unchecked(bearer.token().to_owned()) };
        let session = service
            .execute(command::AuthorizeCustomerSession {
                token: token.clone(),
            })
            .await
            .map_err(AsError::into_error)?;

        Ok(Self {
            customer_id: session.customer_id,
            token,
            expires_at: session.expires_at,
        })
    }
}

impl Session {
    /// Checks that this [`Session`] belongs to the provided `owner`.
    ///
    /// # Errors
    ///
    /// With [`AuthError::Forbidden`] if the `owner` is someone else.
    pub fn ensure_owns(&self, owner: customer::Id) -> Result<(), Error> {
        if self.customer_id == owner {
            Ok(())
        } else {
            Err(AuthError::Forbidden.into())
        }
    }
}

impl AsError for command::authorize_customer_session::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Db(e) => e.try_as_error(),
            Self::CustomerNotExists(_) | Self::JsonWebTokenDecodeError(_) => {
                Some(Error::from(AuthError::InvalidToken).with_details(self))
            }
        }
    }
}

define_error! {
    enum AuthError {
        #[code = "AUTHORIZATION_REQUIRED"]
        #[status = UNAUTHORIZED]
        #[message = "Authorization required"]
        AuthorizationRequired,

        #[code = "INVALID_TOKEN"]
        #[status = UNAUTHORIZED]
        #[message = "Session token is invalid or expired"]
        InvalidToken,

        #[code = "FORBIDDEN"]
        #[status = FORBIDDEN]
        #[message = "Resource belongs to another customer"]
        Forbidden,
    }
}
