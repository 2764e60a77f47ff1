//! Newtype IDs for type-safe entity references.
//!
//! IDs are `SERIAL` primary keys assigned by the store. When they arrive as
//! path parameters they must be positive integers.

/// Errors that can occur when parsing an ID from a path parameter.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseIdError {
    /// The input is not a number at all.
    #[error("must be a number")]
    NotANumber,
    /// The input is numeric but has a fractional part.
    #[error("must be an integer")]
    NotAnInteger,
    /// The input is zero or negative.
    #[error("must be a positive number")]
    NotPositive,
    /// The input does not fit in the ID's storage type.
    #[error("must be less than or equal to {max}")]
    TooLarge {
        /// Largest accepted ID.
        max: i32,
    },
}

/// Parse a positive `i32` the way path parameters are validated.
///
/// # Errors
///
/// Returns a [`ParseIdError`] describing why the input was rejected.
pub fn parse_positive_id(s: &str) -> Result<i32, ParseIdError> {
    let trimmed = s.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        if value <= 0 {
            return Err(ParseIdError::NotPositive);
        }
        return i32::try_from(value).map_err(|_| ParseIdError::TooLarge { max: i32::MAX });
    }

    // Numeric forms like "1e3" or "4.0" are accepted like any other number.
    match trimmed.parse::<f64>() {
        Ok(value) if !value.is_finite() => Err(ParseIdError::NotANumber),
        Ok(value) if value <= 0.0 => Err(ParseIdError::NotPositive),
        Ok(value) if value.fract() != 0.0 => Err(ParseIdError::NotAnInteger),
        #[allow(clippy::cast_possible_truncation)] // range checked in the guard
        Ok(value) if value <= f64::from(i32::MAX) => Ok(value as i32),
        Ok(_) => Err(ParseIdError::TooLarge { max: i32::MAX }),
        Err(_) => Err(ParseIdError::NotANumber),
    }
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_i32()`
/// - `FromStr` accepting positive integers only (path parameter rules)
/// - `sqlx` `Type`, `Encode`, and `Decode` implementations (with `postgres` feature)
///
/// # Example
///
/// ```rust
/// # use roster_core::define_id;
/// define_id!(TeamId);
///
/// let id: TeamId = "42".parse().unwrap();
/// assert_eq!(id.as_i32(), 42);
/// assert!("0".parse::<TeamId>().is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::types::id::ParseIdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                $crate::types::id::parse_positive_id(s).map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Type<::sqlx::Postgres> for $name {
            fn type_info() -> ::sqlx::postgres::PgTypeInfo {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::type_info()
            }

            fn compatible(ty: &::sqlx::postgres::PgTypeInfo) -> bool {
                <i32 as ::sqlx::Type<::sqlx::Postgres>>::compatible(ty)
            }
        }

        #[cfg(feature = "postgres")]
        impl<'r> ::sqlx::Decode<'r, ::sqlx::Postgres> for $name {
            fn decode(
                value: ::sqlx::postgres::PgValueRef<'r>,
            ) -> ::core::result::Result<Self, ::sqlx::error::BoxDynError> {
                let id = <i32 as ::sqlx::Decode<::sqlx::Postgres>>::decode(value)?;
                Ok(Self(id))
            }
        }

        #[cfg(feature = "postgres")]
        impl ::sqlx::Encode<'_, ::sqlx::Postgres> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut ::sqlx::postgres::PgArgumentBuffer,
            ) -> ::std::result::Result<::sqlx::encode::IsNull, ::sqlx::error::BoxDynError> {
                <i32 as ::sqlx::Encode<::sqlx::Postgres>>::encode_by_ref(&self.0, buf)
            }
        }
    };
}

define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive() {
        let id: UserId = "7".parse().unwrap();
        assert_eq!(id, UserId::new(7));
        assert_eq!(" 12 ".parse::<UserId>().unwrap().as_i32(), 12);
    }

    #[test]
    fn test_parse_rejects_zero_and_negative() {
        assert_eq!("0".parse::<UserId>(), Err(ParseIdError::NotPositive));
        assert_eq!("-3".parse::<UserId>(), Err(ParseIdError::NotPositive));
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!("abc".parse::<UserId>(), Err(ParseIdError::NotANumber));
        assert_eq!("".parse::<UserId>(), Err(ParseIdError::NotANumber));
        assert_eq!("1.5".parse::<UserId>(), Err(ParseIdError::NotAnInteger));
    }

    #[test]
    fn test_parse_rejects_overflow() {
        assert!(matches!(
            "99999999999".parse::<UserId>(),
            Err(ParseIdError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&UserId::new(5)).unwrap();
        assert_eq!(json, "5");
    }
}
