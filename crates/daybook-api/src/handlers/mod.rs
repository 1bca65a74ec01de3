pub mod folders;
pub mod profile;
pub mod schedules;
pub mod session;
pub mod tasks;

use crate::error::ApiError;
use daybook_domain::RecordId;

/// Path ids that are not even well-formed map to 404, same as ids that
/// point at nothing.
fn record_id(raw: &str) -> Result<RecordId, ApiError> {
    RecordId::from_string(raw.to_string()).map_err(|_| ApiError::NotFound)
}
