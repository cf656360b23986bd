//! User identity records.
//!
//! Users are owned by the identity collaborator; the task board only reads
//! them, references them from projects, todos and comments, and creates them
//! on behalf of the registration flow.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::UserId;

/// Public user record.
///
/// # Examples
/// ```
/// use taskboard::domain::{User, UserId};
///
/// let user = User {
///     id: UserId::new(1),
///     username: "ada".into(),
///     email: "ada@example.com".into(),
///     first_name: "Ada".into(),
///     last_name: "Lovelace".into(),
/// };
/// let json = serde_json::to_value(&user).expect("serialise user");
/// assert_eq!(json["firstName"], "Ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    pub id: UserId,
    /// Unique login name.
    #[schema(example = "ada")]
    pub username: String,
    /// Contact address, possibly empty.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Given name, possibly empty.
    pub first_name: String,
    /// Family name, possibly empty.
    pub last_name: String,
}

/// Fields required to create a user row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique login name.
    pub username: String,
    /// Contact address.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

impl NewUser {
    /// Materialise the record once storage has assigned an identifier.
    #[must_use]
    pub fn into_user(self, id: UserId) -> User {
        User {
            id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
        }
    }
}
