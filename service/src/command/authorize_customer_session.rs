//! [`Command`] for authorizing a [`Customer`].

use common::operations::{By, Select};
use derive_more::{Display, Error, From};
use jsonwebtoken::Validation;
use tracerr::Traced;

use crate::{
    domain::{
        customer::{self, session, Session},
        Customer,
    },
    infra::{database, Database},
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for authorizing a [`Customer`] by a [`Session`] token.
#[derive(Clone, Debug, From)]
pub struct AuthorizeCustomerSession {
    /// [`Session`] token to authorize.
    pub token: session::Token,
}

impl<Db, Ntf> Command<AuthorizeCustomerSession> for Service<Db, Ntf>
where
    Db: Database<
        Select<By<Option<Customer>, customer::Id>>,
        Ok = Option<Customer>,
        Err = Traced<database::Error>,
    >,
{
    type Ok = Session;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: AuthorizeCustomerSession,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let AuthorizeCustomerSession { token } = cmd;

        let session = jsonwebtoken::decode::<Session>(
            token.as_ref(),
            &self.config().jwt_decoding_key,
            &Validation::default(),
        )
        .map_err(tracerr::from_and_wrap!(=> E))?
        .claims;

        drop(
            self.database()
                .execute(Select(By::<Option<Customer>, _>::new(
                    session.customer_id,
                )))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CustomerNotExists(session.customer_id))
                .map_err(tracerr::wrap!())?,
        );

        Ok(session)
    }
}

/// Error of [`AuthorizeCustomerSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] the [`Session`] belongs to does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`jsonwebtoken`] decoding error.
    #[display("Failed to decode a JSON Web Token: {_0}")]
    #[from]
    JsonWebTokenDecodeError(jsonwebtoken::errors::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::CustomerNotExists(_) | Self::JsonWebTokenDecodeError(_) => {
                ErrorKind::Unauthorized
            }
            Self::Db(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use common::DateTime;

    use crate::{
        domain::{
            customer::{self, session, Session},
            Customer,
        },
        test, Classify as _, Command as _, ErrorKind,
    };

    use super::{AuthorizeCustomerSession, ExecutionError};

    fn token(svc: &test::TestService, session: &Session) -> session::Token {
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            session,
            &svc.config().jwt_encoding_key,
        )
        .unwrap();
        token.parse().unwrap()
    }

    async fn seed(svc: &test::TestService) -> Customer {
        test::customer(svc, "dato@example.com", "Secret123!").await
    }

    #[tokio::test]
    async fn rejects_malformed_and_expired_tokens() {
        let svc = test::service();
        let customer = seed(&svc).await;

        let err = svc
            .execute(AuthorizeCustomerSession {
                token: "not-a-token".parse().unwrap(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let expired = Session {
            customer_id: customer.id,
            expires_at: (DateTime::now() - Duration::from_secs(3600))
                .coerce(),
        };
        let err = svc
            .execute(AuthorizeCustomerSession {
                token: token(&svc, &expired),
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::JsonWebTokenDecodeError(_),
        ));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }

    #[tokio::test]
    async fn rejects_token_of_unknown_customer() {
        let svc = test::service();
        _ = seed(&svc).await;

        let session = Session {
            customer_id: customer::Id::new(),
            expires_at: (DateTime::now() + Duration::from_secs(60)).coerce(),
        };
        let err = svc
            .execute(AuthorizeCustomerSession {
                token: token(&svc, &session),
            })
            .await
            .unwrap_err();

        assert!(matches!(
            err.as_ref(),
            ExecutionError::CustomerNotExists(_),
        ));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
    }
}
