//! [`Customer`] definitions.

pub mod session;

use argon2::{
    password_hash::{
        self, rand_core::OsRng, PasswordHasher as _, PasswordVerifier as _,
        SaltString,
    },
    Argon2,
};
#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::From;
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use secrecy::{zeroize::Zeroize, CloneableSecret};

use super::{contact, define_id, define_text};

pub use self::session::Session;

/// Registered customer making bookings.
#[derive(Clone, Debug)]
pub struct Customer {
    /// ID of this [`Customer`].
    pub id: Id,

    /// First [`Name`] of this [`Customer`].
    pub first_name: Name,

    /// Last [`Name`] of this [`Customer`].
    pub last_name: Name,

    /// Email address of this [`Customer`], unique among all of them.
    pub email: contact::Email,

    /// Phone number of this [`Customer`].
    pub phone: Option<contact::Phone>,

    /// [`PasswordHash`] of this [`Customer`].
    pub password_hash: PasswordHash,

    /// [`DateTime`] when this [`Customer`] was registered.
    pub created_at: CreationDateTime,
}

define_id! {
    #[doc = "ID of a [`Customer`]."]
    Id
}

define_text! {
    #[doc = "First or last name of a [`Customer`]."]
    Name(max = 100)
}

/// Password of a [`Customer`].
#[derive(Clone, Debug, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    ///
    /// A valid one is 8 to 128 characters long and mixes a digit, an upper
    /// and a lower case letter, and some non-alphanumeric character.
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        let len = password.chars().count();
        let has = |f: fn(&char) -> bool| password.chars().any(|c| f(&c));

        (8..=128).contains(&len)
            && has(char::is_ascii_digit)
            && has(|c| c.is_uppercase())
            && has(|c| c.is_lowercase())
            && has(|c| !c.is_alphanumeric())
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// [Argon2] hash of a [`Customer`]'s [`Password`] in [PHC] string format.
///
/// [Argon2]: https://wikipedia.org/wiki/Argon2
/// [PHC]: https://github.com/P-H-C/phc-string-format
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes the provided [`Password`] with a random salt.
    ///
    /// # Errors
    ///
    /// If hashing fails.
    pub fn new(password: &Password) -> Result<Self, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Self(
            Argon2::default()
                .hash_password(password.0.as_bytes(), &salt)?
                .to_string(),
        ))
    }

    /// Checks whether the provided [`Password`] matches this [`PasswordHash`].
    ///
    /// # Errors
    ///
    /// If this [`PasswordHash`] is malformed.
    pub fn verify(
        &self,
        password: &Password,
    ) -> Result<bool, password_hash::Error> {
        let hash = password_hash::PasswordHash::new(&self.0)?;
        match Argon2::default().verify_password(password.0.as_bytes(), &hash)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// [`DateTime`] when a [`Customer`] was registered.
pub type CreationDateTime = DateTimeOf<(Customer, unit::Creation)>;

#[cfg(test)]
mod spec {
    use super::{Password, PasswordHash};

    #[test]
    fn password_hash_verifies_only_the_same_password() {
        let password = Password::new("Correct horse 1").unwrap();
        let hash = PasswordHash::new(&password).unwrap();

        assert_ne!(hash, PasswordHash::new(&password).unwrap(), "salted");
        assert!(hash.verify(&password).unwrap());
        let other = Password::new("Battery staple 2").unwrap();
        assert!(!hash.verify(&other).unwrap());
    }

    #[test]
    fn malformed_hash_fails_verification() {
        let hash = PasswordHash("plain".into());

        assert!(hash.verify(&Password::new("Plain-text1").unwrap()).is_err());
    }

    #[test]
    fn password_length_is_checked() {
        assert!(Password::new("Sh0rt!").is_none());
        assert!(Password::new(format!("Aa1!{}", "x".repeat(125))).is_none());
        assert!(Password::new(format!("Aa1!{}", "x".repeat(124))).is_some());
        assert!(Password::new("L0ng enough").is_some());
    }

    #[test]
    fn password_mixes_character_classes() {
        for weak in [
            "long enough",
            "Long enough",
            "long enough 1",
            "LONG ENOUGH 1",
            "LongEnough1",
        ] {
            assert!(Password::new(weak).is_none(), "{weak}");
        }
        assert!(Password::new("Secret123!").is_some());
        assert!(Password::new("Пароль-2024").is_some());
    }
}
