use super::domain::{Assessment, AssessmentDraft, AssessmentId};

/// Record store seam. The store assigns id and creation timestamp at insert;
/// there is no update or delete, records are write-once.
pub trait AssessmentRepository: Send + Sync {
    fn insert(
        &self,
        draft: AssessmentDraft,
        user_id: Option<String>,
    ) -> Result<Assessment, StorageError>;

    /// All records, newest first.
    fn list(&self) -> Result<Vec<Assessment>, StorageError>;

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, StorageError>;
}

/// Opaque store failure. The message is surfaced verbatim to the user, who
/// retries manually; a failed insert leaves nothing behind to undo.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("record store unavailable: {0}")]
    Unavailable(String),
    #[error("record store rejected the write: {0}")]
    Rejected(String),
}
