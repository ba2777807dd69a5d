//! Typed identifiers.
//!
//! Identifiers are UUIDs wrapped in single-purpose newtypes so that a value
//! scoped to one entity cannot silently stand in for another. Rows read from
//! the database carry plain [`Uuid`]s; the typed form appears at the seams
//! where mixing identifiers up would be costly, such as pinning the
//! organization scope on a connection.
//!
//! # Example
//!
//! ```
//! use scholaris_core::OrganizationId;
//!
//! let id: OrganizationId = "550e8400-e29b-41d4-a716-446655440000".parse()?;
//! assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
//! # Ok::<(), scholaris_core::ParseIdError>(())
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Returned when a string is not a valid UUID for the requested ID type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// Name of the ID type that rejected the input.
    pub id_type: &'static str,
    /// The underlying UUID parse failure.
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Defines a UUID-backed identifier newtype.
///
/// Generated types serialize as the bare UUID string, print as the UUID,
/// and parse back through [`FromStr`], reporting a [`ParseIdError`] that
/// names the type on failure.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Mint a fresh random identifier (UUID v4).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wrap an existing UUID, e.g. one read from a database row.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Borrow the wrapped UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Unwrap into the underlying UUID.
            #[must_use]
            pub fn into_uuid(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                Display::fmt(&self.0, f)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                match Uuid::parse_str(s) {
                    Ok(uuid) => Ok(Self(uuid)),
                    Err(e) => Err(ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    }),
                }
            }
        }
    };
}

define_id!(
    /// Identifier of an organization (a school).
    ///
    /// Every persisted record belongs to exactly one organization. Query
    /// code binds the raw UUID it read from the row; this type marks the
    /// places where the scope itself is handed around, such as
    /// `set_org_context` in the database crate.
    ///
    /// # Example
    ///
    /// ```
    /// use scholaris_core::OrganizationId;
    /// use uuid::Uuid;
    ///
    /// let uuid = Uuid::new_v4();
    /// let id = OrganizationId::from_uuid(uuid);
    /// assert_eq!(id.into_uuid(), uuid);
    /// ```
    OrganizationId
);
