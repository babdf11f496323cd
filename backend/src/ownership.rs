//! Ownership guard for image records
//!
//! Mutation and deletion are gated on the acting identity owning the record.
//! The check is pure and must run before any store or gateway call so a
//! failure leaves no partial effect.

use image_storage::image_record::ImageRecord;
use thiserror::Error;

use crate::auth::AuthenticatedUser;

/// The acting identity does not own the record it tried to mutate
#[derive(Debug, Error, PartialEq, Eq)]
#[error("acting identity does not own this record")]
pub struct OwnershipError;

/// Fails when `record.owner` differs from the acting identity's id
///
/// # Errors
///
/// Returns [`OwnershipError`] on mismatch; the caller surfaces it as 403.
pub fn check_ownership(user: &AuthenticatedUser, record: &ImageRecord) -> Result<(), OwnershipError> {
    if record.owner == user.user_id {
        Ok(())
    } else {
        Err(OwnershipError)
    }
}
