use crate::types::EntryId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid entry id: {0}")]
    InvalidId(i64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Entry {id} failed schema validation: {reason}")]
    Schema { id: EntryId, reason: String },
}
