//! Validated document ids for the cafe API's document store.
//!
//! Every persisted entity in the cafe API is addressed by a 24-character
//! lowercase hexadecimal object id. [`DocId`] validates that shape once at
//! the boundary; the `define_doc_id!` macro layers typed wrappers on top so
//! ids from different collections cannot be mixed up.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Length of a document-store object id in hex characters.
pub const DOC_ID_LEN: usize = 24;

/// Errors that can occur when parsing a [`DocId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DocIdError {
    /// The input string is empty.
    #[error("document id cannot be empty")]
    Empty,
    /// The input has the wrong length.
    #[error("document id must be exactly {DOC_ID_LEN} characters (got {got})")]
    WrongLength {
        /// Actual length of the input.
        got: usize,
    },
    /// The input contains a character outside `[0-9a-f]`.
    #[error("document id must be lowercase hexadecimal (found {found:?})")]
    InvalidChar {
        /// First offending character.
        found: char,
    },
}

/// A validated document-store object id.
///
/// Guaranteed to be exactly 24 lowercase hexadecimal characters. This is
/// the only externally-verifiable shape constraint the cafe API places on
/// identifiers, so it is the one this type enforces.
///
/// ## Examples
///
/// ```
/// use marigold_core::DocId;
///
/// assert!(DocId::parse("5f2b8c9d1e3a4b5c6d7e8f90").is_ok());
/// assert!(DocId::parse("short").is_err());
/// assert!(DocId::parse("5F2B8C9D1E3A4B5C6D7E8F90").is_err()); // uppercase
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct DocId(String);

impl DocId {
    /// Parse a `DocId` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not exactly 24
    /// characters, or contains anything other than lowercase hex digits.
    pub fn parse(s: &str) -> Result<Self, DocIdError> {
        if s.is_empty() {
            return Err(DocIdError::Empty);
        }
        if s.len() != DOC_ID_LEN {
            return Err(DocIdError::WrongLength { got: s.len() });
        }
        if let Some(found) = s
            .chars()
            .find(|c| !matches!(c, '0'..='9' | 'a'..='f'))
        {
            return Err(DocIdError::InvalidChar { found });
        }
        Ok(Self(s.to_owned()))
    }

    /// Check whether a string has the shape of a document id without
    /// allocating.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.len() == DOC_ID_LEN && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'))
    }

    /// Get the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DocId {
    type Error = DocIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<DocId> for String {
    fn from(id: DocId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Macro to define a type-safe document id wrapper.
///
/// Creates a newtype wrapper around [`DocId`] with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - `parse()` and `as_str()` forwarding to [`DocId`]
///
/// # Example
///
/// ```
/// # use marigold_core::define_doc_id;
/// define_doc_id!(CatalogItemId);
/// define_doc_id!(OrderId);
///
/// let item = CatalogItemId::parse("5f2b8c9d1e3a4b5c6d7e8f90").unwrap();
///
/// // These are different types, so this won't compile:
/// // let _: OrderId = item;
/// ```
#[macro_export]
macro_rules! define_doc_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name($crate::DocId);

        impl $name {
            /// Parse from a string, validating the 24-hex-char shape.
            ///
            /// # Errors
            ///
            /// Returns an error if the input is not a well-formed
            /// document id.
            pub fn parse(s: &str) -> ::core::result::Result<Self, $crate::DocIdError> {
                $crate::DocId::parse(s).map(Self)
            }

            /// Get the id as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<$crate::DocId> for $name {
            fn from(id: $crate::DocId) -> Self {
                Self(id)
            }
        }

        impl From<$name> for $crate::DocId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity ids
define_doc_id!(CatalogItemId);
define_doc_id!(UserId);
define_doc_id!(OrderId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD: &str = "5f2b8c9d1e3a4b5c6d7e8f90";

    #[test]
    fn parse_valid_id() {
        let id = DocId::parse(GOOD).unwrap();
        assert_eq!(id.as_str(), GOOD);
        assert_eq!(id.to_string(), GOOD);
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(DocId::parse(""), Err(DocIdError::Empty));
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert_eq!(
            DocId::parse("abc123"),
            Err(DocIdError::WrongLength { got: 6 })
        );
        let long = "a".repeat(25);
        assert_eq!(
            DocId::parse(&long),
            Err(DocIdError::WrongLength { got: 25 })
        );
    }

    #[test]
    fn parse_rejects_uppercase_hex() {
        let upper = GOOD.to_uppercase();
        assert!(matches!(
            DocId::parse(&upper),
            Err(DocIdError::InvalidChar { .. })
        ));
    }

    #[test]
    fn parse_rejects_non_hex() {
        let bad = "5f2b8c9d1e3a4b5c6d7e8f9z";
        assert_eq!(
            DocId::parse(bad),
            Err(DocIdError::InvalidChar { found: 'z' })
        );
    }

    #[test]
    fn is_valid_matches_parse() {
        assert!(DocId::is_valid(GOOD));
        assert!(!DocId::is_valid(""));
        assert!(!DocId::is_valid("xyz"));
        assert!(!DocId::is_valid(&GOOD.to_uppercase()));
    }

    #[test]
    fn typed_ids_round_trip_serde() {
        let item = CatalogItemId::parse(GOOD).unwrap();
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, format!("\"{GOOD}\""));
        let back: CatalogItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn serde_rejects_malformed_id() {
        let result: Result<DocId, _> = serde_json::from_str("\"nope\"");
        assert!(result.is_err());
    }
}
