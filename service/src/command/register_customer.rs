//! [`Command`] for registering a new [`Customer`].

use common::{
    operations::{By, Commit, Insert, Select, Transact, Transacted},
    DateTime,
};
use derive_more::{Display, Error, From};
use secrecy::{ExposeSecret, SecretBox};
use tracerr::Traced;

use crate::{
    domain::{
        contact,
        customer::{self, PasswordHash},
        Customer,
    },
    infra::{database, Database},
    Classify, ErrorKind, Service,
};

use super::Command;

/// [`Command`] for registering a new [`Customer`].
#[derive(Clone, Debug)]
pub struct RegisterCustomer {
    /// First name of a new [`Customer`].
    pub first_name: customer::Name,

    /// Last name of a new [`Customer`].
    pub last_name: customer::Name,

    /// Email address of a new [`Customer`].
    pub email: contact::Email,

    /// Phone number of a new [`Customer`].
    pub phone: Option<contact::Phone>,

    /// Password of a new [`Customer`].
    pub password: SecretBox<customer::Password>,
}

impl<Db, Ntf> Command<RegisterCustomer> for Service<Db, Ntf>
where
    Db: for<'l> Database<
            Select<By<Option<Customer>, &'l contact::Email>>,
            Ok = Option<Customer>,
            Err = Traced<database::Error>,
        > + Database<Transact, Err = Traced<database::Error>>,
    Transacted<Db>: Database<Insert<Customer>, Err = Traced<database::Error>>
        + Database<Commit, Err = Traced<database::Error>>,
{
    type Ok = Customer;
    type Err = Traced<ExecutionError>;

    #[tracing::instrument(skip_all)]
    async fn execute(
        &self,
        cmd: RegisterCustomer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let RegisterCustomer {
            first_name,
            last_name,
            email,
            phone,
            password,
        } = cmd;

        if self
            .database()
            .execute(Select(By::<Option<Customer>, _>::new(&email)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .is_some()
        {
            return Err(tracerr::new!(E::EmailOccupied(email)));
        }

        let password_hash = PasswordHash::new(password.expose_secret())
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let customer = Customer {
            id: customer::Id::new(),
            first_name,
            last_name,
            email,
            phone,
            password_hash,
            created_at: DateTime::now().coerce(),
        };

        let tx = self
            .database()
            .execute(Transact)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        tx.execute(Insert(customer.clone()))
            .await
            .map_err(|e| {
                if e.as_ref().is_violation_of(database::CUSTOMERS_EMAIL_KEY) {
                    tracerr::new!(E::EmailOccupied(customer.email.clone()))
                } else {
                    tracerr::map_from(e)
                }
            })
            .map_err(tracerr::wrap!())
            .map(drop)?;

        tx.execute(Commit)
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))
            .map(drop)?;

        tracing::info!(customer.id = %customer.id, "`Customer` registered");

        Ok(customer)
    }
}

/// Error of [`RegisterCustomer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    #[from]
    Db(database::Error),

    /// Email address is registered by another [`Customer`] already.
    #[display("Email `{_0}` is already registered")]
    EmailOccupied(#[error(not(source))] contact::Email),

    /// Failed to hash the password.
    #[display("Failed to hash the password: {_0}")]
    #[from]
    PasswordHash(argon2::password_hash::Error),
}

impl Classify for ExecutionError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Db(e) => e.kind(),
            Self::EmailOccupied(_) => ErrorKind::InvalidState,
            Self::PasswordHash(_) => ErrorKind::Unclassified,
        }
    }
}

#[cfg(test)]
mod spec {
    use secrecy::SecretBox;

    use crate::{
        domain::{contact, customer},
        test, Classify as _, Command as _, ErrorKind,
    };

    use super::{ExecutionError, RegisterCustomer};

    fn cmd(email: &str) -> RegisterCustomer {
        RegisterCustomer {
            first_name: customer::Name::new("Tamar").unwrap(),
            last_name: customer::Name::new("Kapanadze").unwrap(),
            email: contact::Email::new(email).unwrap(),
            phone: None,
            password: SecretBox::new(Box::new(
                customer::Password::new("Secret123!").unwrap(),
            )),
        }
    }

    #[tokio::test]
    async fn registers_customer_with_hashed_password() {
        let svc = test::service();

        let customer = svc.execute(cmd("tamar@example.com")).await.unwrap();

        assert_eq!(
            AsRef::<str>::as_ref(&customer.email),
            "tamar@example.com",
        );
        assert!(customer
            .password_hash
            .verify(&customer::Password::new("Secret123!").unwrap())
            .unwrap());
    }

    #[tokio::test]
    async fn rejects_occupied_email() {
        let svc = test::service();
        _ = svc.execute(cmd("tamar@example.com")).await.unwrap();

        let err = svc.execute(cmd("Tamar@Example.com")).await.unwrap_err();

        assert!(matches!(err.as_ref(), ExecutionError::EmailOccupied(_)));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
    }
}
