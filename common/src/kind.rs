//! Closed enumerations of kinds, e.g. booking statuses or currencies.

/// Defines a kind enum.
///
/// The enum is rendered and parsed in `SCREAMING_SNAKE_CASE`, and stored as a
/// `SMALLINT` discriminant in Postgres.
///
/// # Example
///
/// ```rust
/// # use common::define_kind;
/// define_kind! {
///     #[doc = "Kind of a bed."]
///     enum Bed {
///         #[doc = "Bed for a single guest."]
///         Single = 1,
///
///         #[doc = "Bed for two guests."]
///         KingSize = 2,
///     }
/// }
///
/// assert_eq!(Bed::KingSize.u8(), 2);
/// assert_eq!(Bed::from_u8(1), Some(Bed::Single));
/// assert_eq!(Bed::KingSize.to_string(), "KING_SIZE");
/// assert_eq!("SINGLE".parse::<Bed>().ok(), Some(Bed::Single));
/// ```
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_kind {
    (
        #[doc = $doc:literal]
        enum $name:ident {
            $(
                #[doc = $variant_doc:literal]
                $variant:ident = $value:literal
            ),* $(,)?
        }
    ) => {
        #[derive(
            Clone,
            Copy,
            Debug,
            $crate::private::strum::Display,
            $crate::private::strum::EnumString,
            Eq,
            Hash,
            PartialEq,
        )]
        #[cfg_attr(
            feature = "serde",
            derive(
                $crate::private::serde::Deserialize,
                $crate::private::serde::Serialize,
            ),
            serde(rename_all = "SCREAMING_SNAKE_CASE"),
        )]
        #[doc = $doc]
        #[repr(u8)]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $(
                #[doc = $variant_doc]
                $variant = $value,
            )*
        }

        impl $name {
            /// All the variants, ordered by their discriminants.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Returns the discriminant of this kind.
            #[must_use]
            pub const fn u8(self) -> u8 {
                self as u8
            }

            /// Looks up a kind by its discriminant.
            #[must_use]
            pub fn from_u8(discriminant: u8) -> Option<Self> {
                Self::ALL.iter().copied().find(|k| k.u8() == discriminant)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'a> $crate::private::postgres_types::FromSql<'a> for $name {
            $crate::private::postgres_types::accepts!(INT2);

            fn from_sql(
                ty: &$crate::private::postgres_types::Type,
                raw: &'a [u8],
            ) -> Result<Self, $crate::private::BoxError> {
                let stored = <i16 as $crate::private::postgres_types::FromSql>
                    ::from_sql(ty, raw)?;
                u8::try_from(stored)
                    .ok()
                    .and_then(Self::from_u8)
                    .ok_or_else(|| {
                        ::std::format!(
                            "unknown `{}` discriminant: {stored}",
                            ::core::stringify!($name),
                        )
                        .into()
                    })
            }
        }

        #[cfg(feature = "postgres")]
        impl $crate::private::postgres_types::ToSql for $name {
            $crate::private::postgres_types::accepts!(INT2);
            $crate::private::postgres_types::to_sql_checked!();

            fn to_sql(
                &self,
                ty: &$crate::private::postgres_types::Type,
                w: &mut $crate::private::postgres_types::private::BytesMut,
            ) -> Result<
                $crate::private::postgres_types::IsNull,
                $crate::private::BoxError,
            > {
                $crate::private::postgres_types::ToSql::to_sql(
                    &i16::from(self.u8()),
                    ty,
                    w,
                )
            }
        }
    };
}
