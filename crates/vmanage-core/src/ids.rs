//! Strongly-typed UUID wrappers for vManage resources.
//!
//! Policy lists, policy definitions and feature templates are all addressed by
//! UUIDs; distinct wrapper types keep a list id from being passed where a
//! definition id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Macro to generate strongly-typed UUID wrapper types.
macro_rules! uuid_type {
    ($(#[$meta:meta])* $name:ident, $doc:expr) => {
        $(#[$meta])*
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new id from a [`Uuid`].
            #[must_use]
            pub const fn new(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Creates a new random id (v4).
            #[must_use]
            pub fn new_v4() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the inner [`Uuid`].
            #[must_use]
            pub const fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            /// Parses an id from a string.
            ///
            /// # Errors
            ///
            /// Returns an error if the string is not a valid UUID.
            pub fn parse_str(input: &str) -> Result<Self> {
                Uuid::parse_str(input)
                    .map(Self)
                    .map_err(|_| Error::InvalidUuid(input.to_string()))
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(wrapper: $name) -> Self {
                wrapper.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse_str(s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

uuid_type!(ListId, "Policy list id (`listId`)");
uuid_type!(DefinitionId, "Policy definition id (`definitionId`)");
uuid_type!(TemplateId, "Feature template id (`templateId`)");

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

    #[test]
    fn parse_and_display_round_trip() {
        let id = ListId::parse_str(VALID_UUID).unwrap();
        assert_eq!(id.to_string(), VALID_UUID);
    }

    #[test]
    fn parse_invalid() {
        let err = DefinitionId::parse_str("not-a-uuid").unwrap_err();
        assert!(matches!(err, Error::InvalidUuid(_)));
    }

    #[test]
    fn serializes_transparently() {
        let id: TemplateId = VALID_UUID.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{VALID_UUID}\""));
        let back: TemplateId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
