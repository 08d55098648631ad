//! [`Command`] for creating a [`Session`].

use common::{
    operations::{By, Select},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

#[cfg(doc)]
use crate::domain::customer::{session::Token, Password};
use crate::{
    domain::{
        contact,
        customer::{self, session, Session},
        Customer,
    },
    infra::{database, Database},
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for creating a [`Session`].
#[derive(Clone, Debug, From)]
pub enum CreateCustomerSession {
    /// Create a new [`Session`] by [`Customer`] credentials.
    ByCredentials {
        /// Email address of a [`Customer`].
        email: contact::Email,

        /// [`Password`] of a [`Customer`].
        password: SecretBox<customer::Password>,
    },

    /// Create a new [`Session`] by [`Customer`] ID.
    ByCustomerId(customer::Id),
}

/// Output of [`CreateCustomerSession`] [`Command`].
#[derive(Clone, Debug)]
pub struct Output {
    /// [`Token`] of the created [`Session`].
    pub token: session::Token,

    /// [`Customer`] whose [`Session`] has been created.
    pub customer: Customer,

    /// [`DateTime`] when the [`Session`] expires.
    pub expires_at: session::ExpirationDateTime,
}

impl<Db, Ntf> Command<CreateCustomerSession> for Service<Db, Ntf>
where
    Db: Database<
            Select<By<Option<Customer>, customer::Id>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + for<'l> Database<
            Select<By<Option<Customer>, &'l contact::Email>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Output;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateCustomerSession,
    ) -> Result<Self::Ok, Self::Err> {
        use CreateCustomerSession as Cmd;
        use ExecutionError as E;

        let customer = match cmd {
            Cmd::ByCredentials { email, password } => {
                let customer = self
                    .database()
                    .execute(Select(By::<Option<Customer>, _>::new(&email)))
                    .await
                    .map_err(tracerr::map_from_and_wrap!(=> E))?
                    .ok_or(E::WrongCredentials)
                    .map_err(tracerr::wrap!())?;

                if !customer
                    .password_hash
                    .verify(password.expose_secret())
                    .map_err(tracerr::from_and_wrap!(=> E))?
                {
                    return Err(tracerr::new!(E::WrongCredentials));
                }

                customer
            }
            Cmd::ByCustomerId(customer_id) => self
                .database()
                .execute(Select(By::<Option<Customer>, _>::new(customer_id)))
                .await
                .map_err(tracerr::map_from_and_wrap!(=> E))?
                .ok_or(E::CustomerNotExists(customer_id))
                .map_err(tracerr::wrap!())?,
        };

        let expires_at =
            (DateTime::now() + self.config().session_ttl).coerce();
        let token = jsonwebtoken::encode::<Session>(
            &jsonwebtoken::Header::default(),
            &Session {
                customer_id: customer.id,
                expires_at,
            },
            &self.config().jwt_encoding_key,
        )
        .map_err(tracerr::from_and_wrap!(=> E))?;

        // SAFETY: `jsonwebtoken::encode` always returns a valid
        //         `session::Token`.
        #[expect(unsafe_code, reason = "invariants are preserved")]
        let token = unsafe { session::Token::new_unchecked(token) };

        Ok(Output {
            token,
            customer,
            expires_at,
        })
    }
}

/// Error of [`CreateCustomerSession`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Customer`] with the provided ID does not exist.
    #[display("`Customer(id: {_0})` does not exist")]
    CustomerNotExists(#[error(not(source))] customer::Id),

    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// [`jsonwebtoken`] encoding error.
    #[display("Failed to encode a JSON Web Token: {_0}")]
    #[from]
    JsonWebTokenEncodeError(jsonwebtoken::errors::Error),

    /// Stored password hash cannot be checked.
    #[display("Failed to verify the password: {_0}")]
    #[from]
    PasswordHash(argon2::password_hash::Error),

    /// [`CreateCustomerSession::ByCredentials`] contains wrong credentials.
    #[display("Wrong `Customer` credentials")]
    WrongCredentials,
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::CustomerNotExists(_) => ErrorKind::NotFound,
            Self::Db(e) => e.kind(),
            Self::WrongCredentials => ErrorKind::Unauthorized,
            Self::JsonWebTokenEncodeError(_) | Self::PasswordHash(_) => {
                ErrorKind::Unclassified
            }
        }
    }
}
