//! Owner scoping at the handler boundary.

use tracing::warn;
use uuid::Uuid;

use crate::error::AppError;

/// A row that belongs to exactly one user.
pub trait Owned {
    const KIND: &'static str;

    fn owner_id(&self) -> Uuid;
}

/// Hands the resource back only when `caller_id` owns it.
///
/// A mismatch is reported as `NotFound`, the same as a missing row, so callers
/// cannot discover other users' ids.
pub fn require_owner<T: Owned>(resource: T, caller_id: Uuid) -> Result<T, AppError> {
    if resource.owner_id() == caller_id {
        Ok(resource)
    } else {
        warn!(
            kind = T::KIND,
            owner_id = %resource.owner_id(),
            caller_id = %caller_id,
            "cross-user access attempt"
        );
        Err(AppError::NotFound(T::KIND))
    }
}

/// `require_owner` over an optional lookup result.
pub fn require_owned<T: Owned>(resource: Option<T>, caller_id: Uuid) -> Result<T, AppError> {
    match resource {
        Some(resource) => require_owner(resource, caller_id),
        None => Err(AppError::NotFound(T::KIND)),
    }
}
