//! Diesel and pool error translation shared by the repositories.
//!
//! Each repository owns its port error type, so the helpers here classify
//! a storage failure once and let the caller pick the variant.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// What went wrong at the storage layer, stripped of SQL detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StorageFault {
    /// The connection dropped mid-operation.
    Connection(&'static str),
    /// A unique constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A foreign key rejected the write or delete.
    ForeignKeyViolation { constraint: Option<String> },
    /// Anything else.
    Query(&'static str),
}

/// Classify a Diesel error, logging its kind at `debug`.
pub(crate) fn classify(error: DieselError) -> StorageFault {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StorageFault::Query("record not found"),
        DieselError::QueryBuilderError(_) => StorageFault::Query("database query error"),
        DieselError::DatabaseError(kind, info) => match kind {
            DatabaseErrorKind::UniqueViolation => StorageFault::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ForeignKeyViolation => StorageFault::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            },
            DatabaseErrorKind::ClosedConnection => {
                StorageFault::Connection("database connection error")
            }
            _ => StorageFault::Query("database error"),
        },
        _ => StorageFault::Query("database error"),
    }
}

/// Map a pool failure through the repository's connection constructor.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    connection(error.into_message())
}

/// Failure inside a transaction: either a domain outcome that aborts the
/// transaction or a Diesel error.
///
/// Diesel requires the closure's error type to absorb `diesel::result::Error`,
/// so repositories wrap their own port error in [`TxError::Abort`].
#[derive(Debug)]
pub(crate) enum TxError<E> {
    Abort(E),
    Diesel(DieselError),
}

impl<E> From<DieselError> for TxError<E> {
    fn from(error: DieselError) -> Self {
        Self::Diesel(error)
    }
}

impl<E> TxError<E> {
    /// Collapse into the port error, translating Diesel failures with `map`.
    pub(crate) fn resolve(self, map: impl FnOnce(DieselError) -> E) -> E {
        match self {
            Self::Abort(error) => error,
            Self::Diesel(error) => map(error),
        }
    }
}

/// Convert a domain position into the `order` column type.
pub(crate) fn position_to_db(position: u32) -> Result<i32, String> {
    i32::try_from(position).map_err(|_| format!("position {position} exceeds column range"))
}

/// Convert a stored `order` value into a domain position.
pub(crate) fn position_from_db(position: i32) -> Result<u32, String> {
    u32::try_from(position).map_err(|_| format!("negative position {position} in database"))
}
