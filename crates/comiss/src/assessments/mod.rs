//! Assessment intake: validation, scoring, interpretation, and assembly of
//! immutable records, plus the HTTP surface and report content builder.

pub mod assembler;
pub mod domain;
pub mod interpretation;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod validator;

#[cfg(test)]
mod tests;

pub use assembler::{assemble, draft, StoredMeta};
pub use domain::{
    Assessment, AssessmentDraft, AssessmentId, AssessmentReceipt, AssessmentSubmission,
    ClinicalContext, Gender, PatientDetails, ScoreInputs, SessionContext, SymptomScores,
    UserIdentity,
};
pub use interpretation::{Interpretation, InterpretationScheme, SeverityBand};
pub use report::{ReportRenderer, ReportView, RenderError};
pub use repository::{AssessmentRepository, StorageError};
pub use router::assessment_router;
pub use scoring::{SymptomSchema, MAX_TOTAL_SCORE, URTICARIA_BONUS};
pub use service::{AssessmentService, DashboardSummary, ExportError, SubmissionError};
pub use validator::{FieldPolicy, ValidatedAssessment, ValidationError, Validator};
