//! Integer identifiers for the persisted entities.
//!
//! Each entity kind gets its own newtype so a tag id can never be passed where
//! a todo id is expected. Identifiers serialise as bare JSON integers.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
        )]
        #[serde(transparent)]
        #[schema(value_type = i64, example = 1)]
        pub struct $name(i64);

        impl $name {
            /// Wrap a raw storage identifier.
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            /// Raw value used by storage adapters.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse().map(Self)
            }
        }
    };
}

entity_id! {
    /// Identifier of a [`crate::domain::User`].
    UserId
}

entity_id! {
    /// Identifier of a [`crate::domain::Project`].
    ProjectId
}

entity_id! {
    /// Identifier of a [`crate::domain::Tag`].
    TagId
}

entity_id! {
    /// Identifier of a [`crate::domain::Todo`].
    TodoId
}

entity_id! {
    /// Identifier of a [`crate::domain::Comment`].
    CommentId
}
