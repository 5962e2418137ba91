use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::interpretation::Interpretation;

/// Identifier wrapper for stored assessments. Assigned by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssessmentId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub const fn label(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Raw form payload, exactly as captured: numbers arrive as strings, flags as
/// booleans. Nothing here is trusted until the validator has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub age_months: Option<String>,
    #[serde(default)]
    pub assessment_date: Option<String>,
    #[serde(default)]
    pub guardian_name: Option<String>,
    #[serde(default)]
    pub guardian_phone: Option<String>,
    #[serde(default)]
    pub clinician_name: Option<String>,
    #[serde(default)]
    pub hospital_clinic: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub scores: ScoreInputs,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub consent: bool,
}

/// Symptom fields as submitted. Which ones must be present depends on the
/// active symptom schema; the single `skin` field belongs to the classic
/// revision, the region pair and urticaria flag to the extended one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    #[serde(default)]
    pub crying: Option<String>,
    #[serde(default)]
    pub regurgitation: Option<String>,
    #[serde(default)]
    pub stool: Option<String>,
    #[serde(default)]
    pub skin: Option<String>,
    #[serde(default)]
    pub skin_head_neck_trunk: Option<String>,
    #[serde(default)]
    pub skin_limbs: Option<String>,
    #[serde(default)]
    pub urticaria: Option<bool>,
    #[serde(default)]
    pub respiratory: Option<String>,
}

/// Demographics block of the canonical record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientDetails {
    pub name: Option<String>,
    pub gender: Gender,
    pub age_months: u16,
}

/// Encounter context: who assessed, where, and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalContext {
    pub assessment_date: NaiveDate,
    pub guardian_name: Option<String>,
    pub guardian_phone: Option<String>,
    pub clinician_name: Option<String>,
    pub hospital_clinic: Option<String>,
    pub country: Option<String>,
    /// Omani governorate. Always `None` unless `country` is Oman.
    pub city: Option<String>,
}

/// Validated symptom sub-scores under the schema revision they were captured
/// with. Values are members of the schema's discrete sets, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "schema", rename_all = "snake_case")]
pub enum SymptomScores {
    Classic {
        crying: u8,
        regurgitation: u8,
        stool: u8,
        skin: u8,
        respiratory: u8,
    },
    Extended {
        crying: u8,
        regurgitation: u8,
        stool: u8,
        skin_head_neck_trunk: u8,
        skin_limbs: u8,
        urticaria: bool,
        respiratory: u8,
    },
}

/// Validated draft: everything the caller supplies plus the computed
/// aggregates, missing only the store-assigned identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub patient: PatientDetails,
    pub context: ClinicalContext,
    pub scores: SymptomScores,
    pub skin_score: u8,
    pub total_score: u8,
    pub interpretation: Interpretation,
    pub notes: Option<String>,
}

/// Canonical persisted record. Immutable after creation: the store exposes
/// insert and read, never update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub id: AssessmentId,
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub patient: PatientDetails,
    pub context: ClinicalContext,
    pub scores: SymptomScores,
    pub skin_score: u8,
    pub total_score: u8,
    pub interpretation: Interpretation,
    pub notes: Option<String>,
}

impl Assessment {
    pub fn receipt(&self) -> AssessmentReceipt {
        AssessmentReceipt {
            id: self.id.clone(),
            created_at: self.created_at,
            skin_score: self.skin_score,
            total_score: self.total_score,
            interpretation: self.interpretation.clone(),
        }
    }
}

/// Response view returned to the form after a successful save.
#[derive(Debug, Clone, Serialize)]
pub struct AssessmentReceipt {
    pub id: AssessmentId,
    pub created_at: DateTime<Utc>,
    pub skin_score: u8,
    pub total_score: u8,
    pub interpretation: Interpretation,
}

/// Identity attached to a record when the submitter is signed in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: String,
    pub email: Option<String>,
}

/// Explicit session handle passed to the service. Replaces any notion of
/// process-global auth state; anonymous submissions are first-class.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub user: Option<UserIdentity>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn for_user(id: impl Into<String>, email: Option<String>) -> Self {
        Self {
            user: Some(UserIdentity {
                id: id.into(),
                email,
            }),
        }
    }

    pub fn user_id(&self) -> Option<String> {
        self.user.as_ref().map(|user| user.id.clone())
    }
}
