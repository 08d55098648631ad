//! Timestamps.

#[cfg(feature = "postgres")]
use std::error::Error as StdError;
use std::{cmp, fmt, marker::PhantomData, ops, time::Duration};

use derive_more::{Display, Error};
#[cfg(feature = "postgres")]
use postgres_types::{
    accepts, private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type,
};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

/// Timestamp of no particular meaning.
pub type DateTime = DateTimeOf;

/// UTC timestamp of microsecond precision, tagged with its meaning.
///
/// The `Of` tag (e.g. `(Booking, unit::Creation)`) keeps timestamps of
/// different meaning from being mixed up. Use [`DateTimeOf::coerce()`] to
/// re-tag one explicitly.
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// UTC moment, without sub-microsecond part.
    utc: OffsetDateTime,

    /// Meaning of this timestamp.
    meaning: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Wraps the provided moment, converting it to UTC and truncating it to
    /// microseconds, as Postgres stores them.
    fn truncated(moment: OffsetDateTime) -> Result<Self, ParseError> {
        let utc = moment.to_offset(time::UtcOffset::UTC);
        utc.replace_nanosecond(utc.microsecond() * 1_000)
            .map(|utc| Self {
                utc,
                meaning: PhantomData,
            })
            .map_err(ParseError::OutOfRange)
    }

    /// Returns the current moment.
    #[must_use]
    pub fn now() -> Self {
        let now = OffsetDateTime::now_utc();
        Self::truncated(now).unwrap_or(Self {
            utc: now,
            meaning: PhantomData,
        })
    }

    /// Parses an [RFC 3339] timestamp.
    ///
    /// # Errors
    ///
    /// If the `input` is not an [RFC 3339] timestamp.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    pub fn from_rfc3339(input: &str) -> Result<Self, ParseError> {
        OffsetDateTime::parse(input, &Rfc3339)
            .map_err(ParseError::Malformed)
            .and_then(Self::truncated)
    }

    /// Formats this timestamp as [RFC 3339].
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        // UTC moments always fit RFC 3339, so the fallback is never taken.
        self.utc
            .format(&Rfc3339)
            .unwrap_or_else(|_| self.utc.to_string())
    }

    /// Creates a timestamp out of whole seconds since the Unix epoch.
    ///
    /// [`None`] is returned if `secs` is out of the supported range.
    #[must_use]
    pub fn from_unix_timestamp(secs: i64) -> Option<Self> {
        OffsetDateTime::from_unix_timestamp(secs)
            .ok()
            .map(|utc| Self {
                utc,
                meaning: PhantomData,
            })
    }

    /// Returns whole seconds since the Unix epoch.
    #[must_use]
    pub fn unix_timestamp(&self) -> i64 {
        self.utc.unix_timestamp()
    }

    /// Re-tags this timestamp with another meaning.
    #[must_use]
    pub fn coerce<Other: ?Sized>(self) -> DateTimeOf<Other> {
        DateTimeOf {
            utc: self.utc,
            meaning: PhantomData,
        }
    }
}

/// Error of parsing a [`DateTimeOf`].
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum ParseError {
    /// Input is not an RFC 3339 timestamp.
    #[display("malformed timestamp: {_0}")]
    Malformed(time::error::Parse),

    /// Timestamp cannot be represented.
    #[display("timestamp out of range: {_0}")]
    OutOfRange(time::error::ComponentRange),
}

impl<Of: ?Sized> fmt::Debug for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DateTime({})", self.to_rfc3339())
    }
}

impl<Of: ?Sized> fmt::Display for DateTimeOf<Of> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}

impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.utc == other.utc
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}

impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.utc.cmp(&other.utc)
    }
}

impl<Of: ?Sized> From<DateTimeOf<Of>> for OffsetDateTime {
    fn from(dt: DateTimeOf<Of>) -> Self {
        dt.utc
    }
}

impl<Of: ?Sized> ops::Add<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self {
            utc: self.utc + rhs,
            meaning: PhantomData,
        }
    }
}

impl<Of: ?Sized> ops::Sub<Duration> for DateTimeOf<Of> {
    type Output = Self;

    fn sub(self, rhs: Duration) -> Self {
        Self {
            utc: self.utc - rhs,
            meaning: PhantomData,
        }
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> FromSql<'_> for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);

    fn from_sql(
        ty: &Type,
        raw: &[u8],
    ) -> Result<Self, Box<dyn StdError + Sync + Send>> {
        Ok(Self::truncated(OffsetDateTime::from_sql(ty, raw)?)?)
    }
}

#[cfg(feature = "postgres")]
impl<Of: ?Sized> ToSql for DateTimeOf<Of> {
    accepts!(TIMESTAMPTZ);
    to_sql_checked!();

    fn to_sql(
        &self,
        ty: &Type,
        w: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn StdError + Sync + Send>> {
        self.utc.to_sql(ty, w)
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! [`serde`] representations of a [`DateTimeOf`], for use with
    //! `#[serde(with = "...")]`.

    #[cfg(doc)]
    use super::DateTimeOf;

    pub mod rfc3339 {
        //! [`DateTimeOf`] as an [RFC 3339] string, used by the Web API.
        //!
        //! [`DateTimeOf`]: super::DateTimeOf
        //! [RFC 3339]: https://tools.ietf.org/html/rfc3339

        use std::borrow::Cow;

        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        use crate::DateTimeOf;

        /// Serializes a [`DateTimeOf`] as an RFC 3339 string.
        ///
        /// # Errors
        ///
        /// If the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            Of: ?Sized,
            S: Serializer,
        {
            serializer.serialize_str(&dt.to_rfc3339())
        }

        /// Deserializes a [`DateTimeOf`] from an RFC 3339 string.
        ///
        /// # Errors
        ///
        /// If the input is not an RFC 3339 string.
        pub fn deserialize<'de, Of, D>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            Of: ?Sized,
            D: Deserializer<'de>,
        {
            let raw = Cow::<'de, str>::deserialize(deserializer)?;
            DateTimeOf::from_rfc3339(&raw).map_err(D::Error::custom)
        }
    }

    pub mod unix_timestamp {
        //! [`DateTimeOf`] as whole seconds since the Unix epoch, used by JSON
        //! Web Token claims.
        //!
        //! [`DateTimeOf`]: super::DateTimeOf

        use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

        use crate::DateTimeOf;

        /// Serializes a [`DateTimeOf`] as a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            Of: ?Sized,
            S: Serializer,
        {
            serializer.serialize_i64(dt.unix_timestamp())
        }

        /// Deserializes a [`DateTimeOf`] from a Unix timestamp.
        ///
        /// # Errors
        ///
        /// If the timestamp is out of range.
        pub fn deserialize<'de, Of, D>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            Of: ?Sized,
            D: Deserializer<'de>,
        {
            let secs = i64::deserialize(deserializer)?;
            DateTimeOf::from_unix_timestamp(secs).ok_or_else(|| {
                D::Error::custom(format!("timestamp `{secs}` is out of range"))
            })
        }
    }
}

#[cfg(test)]
mod spec {
    use std::time::Duration;

    use super::DateTime;

    #[test]
    fn keeps_microseconds_only() {
        let dt =
            DateTime::from_rfc3339("2025-01-05T10:20:30.123456789+04:00")
                .unwrap();

        assert_eq!(dt.to_rfc3339(), "2025-01-05T06:20:30.123456Z");
    }

    #[test]
    fn now_has_no_sub_microsecond_part() {
        let now: time::OffsetDateTime = DateTime::now().into();

        assert_eq!(now.nanosecond() % 1_000, 0);
    }

    #[test]
    fn shifts_by_durations() {
        let dt = DateTime::from_unix_timestamp(1_000).unwrap();

        assert_eq!((dt + Duration::from_secs(30)).unix_timestamp(), 1_030);
        assert_eq!((dt - Duration::from_secs(30)).unix_timestamp(), 970);
        assert!(dt < dt + Duration::from_secs(1));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(DateTime::from_rfc3339("2025-01-05").is_err());
        assert!(DateTime::from_rfc3339("yesterday").is_err());
    }
}
