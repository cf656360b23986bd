//! Membership guard.
//!
//! Pure checks deciding whether a user may act on a project. Services call
//! these before any write so a denied operation never partially executes.

use std::fmt;

use super::{Project, UserId};

/// Why an actor was refused access to a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenied {
    /// The actor is not in the member set.
    NotMember,
    /// The operation is reserved to the owner.
    NotOwner,
}

impl fmt::Display for AccessDenied {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotMember => write!(f, "Must be a member of the project!"),
            Self::NotOwner => write!(f, "Only the project owner can do this."),
        }
    }
}

impl std::error::Error for AccessDenied {}

/// Allow `actor` only when they are a member of `project`.
///
/// # Examples
/// ```
/// use std::collections::BTreeSet;
/// use chrono::Utc;
/// use taskboard::domain::{membership, Project, ProjectId, ProjectName, UserId};
///
/// let project = Project {
///     id: ProjectId::new(1),
///     name: ProjectName::new("Launch").expect("name"),
///     owner: UserId::new(1),
///     members: BTreeSet::from([UserId::new(1)]),
///     created_at: Utc::now(),
///     updated_at: Utc::now(),
/// };
/// assert!(membership::ensure_member(&project, UserId::new(1)).is_ok());
/// assert!(membership::ensure_member(&project, UserId::new(2)).is_err());
/// ```
pub fn ensure_member(project: &Project, actor: UserId) -> Result<(), AccessDenied> {
    if project.is_member(actor) {
        Ok(())
    } else {
        Err(AccessDenied::NotMember)
    }
}

/// Allow `actor` only when they own `project`.
pub fn ensure_owner(project: &Project, actor: UserId) -> Result<(), AccessDenied> {
    if project.is_owner(actor) {
        Ok(())
    } else {
        Err(AccessDenied::NotOwner)
    }
}

/// Why a member cannot be removed from a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRemovalError {
    /// The target owns the project.
    Owner,
    /// The target is not a member.
    NotMember,
}

impl fmt::Display for MemberRemovalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "Can't remove the project owner!"),
            Self::NotMember => write!(f, "User isn't a member of the project!"),
        }
    }
}

impl std::error::Error for MemberRemovalError {}

/// Decide whether `target` may be removed from `project`'s members.
///
/// The owner can never be removed, which keeps the owner inside the member set.
pub fn ensure_removable(project: &Project, target: UserId) -> Result<(), MemberRemovalError> {
    if project.is_owner(target) {
        return Err(MemberRemovalError::Owner);
    }
    if !project.is_member(target) {
        return Err(MemberRemovalError::NotMember);
    }
    Ok(())
}
