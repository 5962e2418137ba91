use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::info;

use super::assembler;
use super::domain::{Assessment, AssessmentId, AssessmentSubmission, SessionContext};
use super::interpretation::{InterpretationScheme, SeverityBand};
use super::repository::{AssessmentRepository, StorageError};
use super::validator::{FieldPolicy, ValidationError, Validator};
use crate::config::ScoringConfig;

/// Service composing the validator, scoring aggregator, classifier, and the
/// record store seam. One submission is processed per call; there is no
/// shared mutable state between assessments.
pub struct AssessmentService<R> {
    validator: Validator,
    scheme: InterpretationScheme,
    repository: Arc<R>,
}

impl<R> AssessmentService<R>
where
    R: AssessmentRepository + 'static,
{
    pub fn new(repository: Arc<R>, scoring: ScoringConfig) -> Self {
        Self::with_policy(repository, scoring, FieldPolicy::default())
    }

    pub fn with_policy(repository: Arc<R>, scoring: ScoringConfig, policy: FieldPolicy) -> Self {
        Self {
            validator: Validator::new(policy, scoring.schema),
            scheme: scoring.scheme,
            repository,
        }
    }

    /// Validate, enforce consent, score, classify, and persist one
    /// submission. Fails fast: no storage call happens after a local error.
    pub fn submit(
        &self,
        submission: AssessmentSubmission,
        session: &SessionContext,
    ) -> Result<Assessment, SubmissionError> {
        let today = Local::now().date_naive();
        let validated = self.validator.validate(&submission, today)?;

        if !submission.consent {
            return Err(SubmissionError::ConsentRequired);
        }

        let draft = assembler::draft(validated, self.scheme);
        let record = self.repository.insert(draft, session.user_id())?;

        info!(
            id = %record.id.0,
            total_score = record.total_score,
            band = %record.interpretation.label,
            "assessment stored"
        );

        Ok(record)
    }

    pub fn get(&self, id: &AssessmentId) -> Result<Option<Assessment>, StorageError> {
        self.repository.fetch(id)
    }

    pub fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        self.repository.list()
    }

    /// Dashboard statistics over every stored record. Band counts use the
    /// clinical thresholds independently of the deployed classifier.
    pub fn summary(&self) -> Result<DashboardSummary, StorageError> {
        let records = self.repository.list()?;
        let total = records.len();
        let mut mild = 0;
        let mut moderate = 0;
        let mut severe = 0;
        let mut score_sum: u32 = 0;

        for record in &records {
            score_sum += u32::from(record.total_score);
            match SeverityBand::from_total(record.total_score) {
                SeverityBand::Mild => mild += 1,
                SeverityBand::Moderate => moderate += 1,
                SeverityBand::Severe => severe += 1,
            }
        }

        let average_score = if total == 0 {
            0.0
        } else {
            let raw = score_sum as f64 / total as f64;
            (raw * 10.0).round() / 10.0
        };

        Ok(DashboardSummary {
            total,
            mild,
            moderate,
            severe,
            average_score,
        })
    }

    /// Flat CSV of every record, column-compatible with the dashboard
    /// spreadsheet export. Missing optional fields render as "-".
    pub fn export_csv(&self) -> Result<String, ExportError> {
        let records = self.repository.list()?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "Date",
                "Patient Name",
                "Age (months)",
                "Gender",
                "Guardian Name",
                "Guardian Phone",
                "Clinician",
                "Hospital/Clinic",
                "City",
                "Country",
                "Crying Score",
                "Regurgitation Score",
                "Stool Score",
                "Skin Score",
                "Respiratory Score",
                "Total Score",
                "Notes",
            ])
            .map_err(|err| ExportError::Csv(err.to_string()))?;

        for record in &records {
            writer
                .write_record([
                    record.context.assessment_date.format("%Y-%m-%d").to_string(),
                    dash(record.patient.name.as_deref()),
                    record.patient.age_months.to_string(),
                    record.patient.gender.label().to_string(),
                    dash(record.context.guardian_name.as_deref()),
                    dash(record.context.guardian_phone.as_deref()),
                    dash(record.context.clinician_name.as_deref()),
                    dash(record.context.hospital_clinic.as_deref()),
                    dash(record.context.city.as_deref()),
                    dash(record.context.country.as_deref()),
                    record.scores.crying().to_string(),
                    record.scores.regurgitation().to_string(),
                    record.scores.stool().to_string(),
                    record.skin_score.to_string(),
                    record.scores.respiratory().to_string(),
                    record.total_score.to_string(),
                    dash(record.notes.as_deref()),
                ])
                .map_err(|err| ExportError::Csv(err.to_string()))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Csv(err.to_string()))?;
        String::from_utf8(bytes).map_err(|err| ExportError::Csv(err.to_string()))
    }
}

fn dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}

/// Dashboard stat row: counts per clinical band plus the mean total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub total: usize,
    pub mild: usize,
    pub moderate: usize,
    pub severe: usize,
    pub average_score: f64,
}

/// Error raised while handling a submission.
#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("consent must be given before an assessment can be stored")]
    ConsentRequired,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error raised by the CSV export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("csv export failed: {0}")]
    Csv(String),
}
