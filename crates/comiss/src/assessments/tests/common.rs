use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::assessments::domain::{
    Assessment, AssessmentDraft, AssessmentId, AssessmentSubmission, ScoreInputs, SessionContext,
    SymptomScores,
};
use crate::assessments::repository::{AssessmentRepository, StorageError};
use crate::assessments::validator::{FieldPolicy, ValidatedAssessment, Validator};
use crate::assessments::{assembler, assessment_router, AssessmentService};
use crate::config::ScoringConfig;
use crate::assessments::interpretation::InterpretationScheme;
use crate::assessments::scoring::SymptomSchema;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date")
}

pub(super) fn extended_config() -> ScoringConfig {
    ScoringConfig {
        schema: SymptomSchema::Extended,
        scheme: InterpretationScheme::Report,
    }
}

pub(super) fn classic_config() -> ScoringConfig {
    ScoringConfig {
        schema: SymptomSchema::Classic,
        scheme: InterpretationScheme::Likelihood,
    }
}

/// Baseline extended submission: valid, consented, total score 7.
pub(super) fn submission() -> AssessmentSubmission {
    AssessmentSubmission {
        patient_name: Some("Lina Al Harthy".to_string()),
        gender: Some("Female".to_string()),
        age_months: Some("6".to_string()),
        assessment_date: Some("2026-03-01".to_string()),
        guardian_name: Some("Huda Al Harthy".to_string()),
        guardian_phone: Some("+968 9123 4567".to_string()),
        clinician_name: Some("Dr. Salim Al Busaidi".to_string()),
        hospital_clinic: Some("Muscat Children's Clinic".to_string()),
        country: Some("Oman".to_string()),
        city: Some("Muscat".to_string()),
        scores: ScoreInputs {
            crying: Some("2".to_string()),
            regurgitation: Some("1".to_string()),
            stool: Some("3".to_string()),
            skin: None,
            skin_head_neck_trunk: Some("1".to_string()),
            skin_limbs: Some("0".to_string()),
            urticaria: Some(false),
            respiratory: Some("0".to_string()),
        },
        notes: Some("Symptoms for two weeks, no fever.".to_string()),
        consent: true,
    }
}

/// Valid submission under the classic single-skin schema.
pub(super) fn classic_submission() -> AssessmentSubmission {
    let mut submission = submission();
    submission.scores = ScoreInputs {
        crying: Some("4".to_string()),
        regurgitation: Some("3".to_string()),
        stool: Some("6".to_string()),
        skin: Some("2".to_string()),
        skin_head_neck_trunk: None,
        skin_limbs: None,
        urticaria: None,
        respiratory: Some("1".to_string()),
    };
    submission
}

/// All five domains at zero, extended schema.
pub(super) fn zero_submission() -> AssessmentSubmission {
    let mut submission = submission();
    submission.scores = ScoreInputs {
        crying: Some("0".to_string()),
        regurgitation: Some("0".to_string()),
        stool: Some("0".to_string()),
        skin: None,
        skin_head_neck_trunk: Some("0".to_string()),
        skin_limbs: Some("0".to_string()),
        urticaria: Some(false),
        respiratory: Some("0".to_string()),
    };
    submission
}

pub(super) fn validator() -> Validator {
    Validator::new(FieldPolicy::default(), SymptomSchema::Extended)
}

pub(super) fn classic_validator() -> Validator {
    Validator::new(FieldPolicy::default(), SymptomSchema::Classic)
}

/// Rebuild a raw submission from a validated record, for idempotency checks.
pub(super) fn resubmit(validated: &ValidatedAssessment, consent: bool) -> AssessmentSubmission {
    let scores = match validated.scores {
        SymptomScores::Classic {
            crying,
            regurgitation,
            stool,
            skin,
            respiratory,
        } => ScoreInputs {
            crying: Some(crying.to_string()),
            regurgitation: Some(regurgitation.to_string()),
            stool: Some(stool.to_string()),
            skin: Some(skin.to_string()),
            skin_head_neck_trunk: None,
            skin_limbs: None,
            urticaria: None,
            respiratory: Some(respiratory.to_string()),
        },
        SymptomScores::Extended {
            crying,
            regurgitation,
            stool,
            skin_head_neck_trunk,
            skin_limbs,
            urticaria,
            respiratory,
        } => ScoreInputs {
            crying: Some(crying.to_string()),
            regurgitation: Some(regurgitation.to_string()),
            stool: Some(stool.to_string()),
            skin: None,
            skin_head_neck_trunk: Some(skin_head_neck_trunk.to_string()),
            skin_limbs: Some(skin_limbs.to_string()),
            urticaria: Some(urticaria),
            respiratory: Some(respiratory.to_string()),
        },
    };

    AssessmentSubmission {
        patient_name: validated.patient.name.clone(),
        gender: Some(validated.patient.gender.label().to_string()),
        age_months: Some(validated.patient.age_months.to_string()),
        assessment_date: Some(
            validated
                .context
                .assessment_date
                .format("%Y-%m-%d")
                .to_string(),
        ),
        guardian_name: validated.context.guardian_name.clone(),
        guardian_phone: validated.context.guardian_phone.clone(),
        clinician_name: validated.context.clinician_name.clone(),
        hospital_clinic: validated.context.hospital_clinic.clone(),
        country: validated.context.country.clone(),
        city: validated.context.city.clone(),
        scores,
        notes: validated.notes.clone(),
        consent,
    }
}

pub(super) fn build_service(
    config: ScoringConfig,
) -> (AssessmentService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = AssessmentService::new(repository.clone(), config);
    (service, repository)
}

pub(super) fn anonymous() -> SessionContext {
    SessionContext::anonymous()
}

/// In-memory store assigning sequential ids and deterministic timestamps.
#[derive(Default)]
pub(super) struct MemoryRepository {
    sequence: AtomicU64,
    records: Mutex<Vec<Assessment>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(
        &self,
        draft: AssessmentDraft,
        user_id: Option<String>,
    ) -> Result<Assessment, StorageError> {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed);
        let meta = assembler::StoredMeta {
            id: AssessmentId(format!("asmt-{:06}", sequence + 1)),
            created_at: Utc
                .with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
                .single()
                .expect("valid timestamp")
                + chrono::Duration::seconds(sequence as i64),
        };
        let record = assembler::assemble(draft, meta, user_id);
        self.records
            .lock()
            .expect("repository mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records.iter().rev().cloned().collect())
    }

    fn fetch(&self, id: &AssessmentId) -> Result<Option<Assessment>, StorageError> {
        let records = self.records.lock().expect("repository mutex poisoned");
        Ok(records.iter().find(|record| &record.id == id).cloned())
    }
}

/// Store that is down: every call fails with an opaque message.
pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(
        &self,
        _draft: AssessmentDraft,
        _user_id: Option<String>,
    ) -> Result<Assessment, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<Assessment>, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AssessmentId) -> Result<Option<Assessment>, StorageError> {
        Err(StorageError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn assessment_router_with_service(
    service: AssessmentService<MemoryRepository>,
) -> axum::Router {
    assessment_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
