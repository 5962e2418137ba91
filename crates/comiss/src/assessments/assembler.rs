//! Pure assembly of canonical records: validated fields plus computed
//! aggregates, then the store-assigned identity. Persistence and rendering
//! stay with the caller.

use chrono::{DateTime, Utc};

use super::domain::{Assessment, AssessmentDraft, AssessmentId};
use super::interpretation::InterpretationScheme;
use super::validator::ValidatedAssessment;

/// Identity a record store hands back for a fresh insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMeta {
    pub id: AssessmentId,
    pub created_at: DateTime<Utc>,
}

/// Attach the computed aggregates and band to a validated field set.
pub fn draft(validated: ValidatedAssessment, scheme: InterpretationScheme) -> AssessmentDraft {
    let ValidatedAssessment {
        patient,
        context,
        scores,
        notes,
    } = validated;

    let skin_score = scores.skin_score();
    let total_score = scores.total_score();
    let interpretation = scheme.band(total_score);

    AssessmentDraft {
        patient,
        context,
        scores,
        skin_score,
        total_score,
        interpretation,
        notes,
    }
}

/// Combine a draft with its store-assigned identity and the session owner.
pub fn assemble(draft: AssessmentDraft, meta: StoredMeta, user_id: Option<String>) -> Assessment {
    let AssessmentDraft {
        patient,
        context,
        scores,
        skin_score,
        total_score,
        interpretation,
        notes,
    } = draft;

    Assessment {
        id: meta.id,
        user_id,
        created_at: meta.created_at,
        patient,
        context,
        scores,
        skin_score,
        total_score,
        interpretation,
        notes,
    }
}
