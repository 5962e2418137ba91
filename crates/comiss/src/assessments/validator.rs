//! Field validation and coercion for raw assessment submissions.
//!
//! Rules run in a fixed order and the first violation wins; callers surface
//! exactly one error per attempt. Successful validation only trims text and
//! parses numbers, so validating an already-validated record reproduces it.

use chrono::NaiveDate;

use super::domain::{
    AssessmentSubmission, ClinicalContext, Gender, PatientDetails, ScoreInputs, SymptomScores,
};
use super::scoring::{
    ScoreSet, SymptomSchema, CRYING, REGURGITATION_CLASSIC, REGURGITATION_EXTENDED, RESPIRATORY,
    SKIN, SKIN_HEAD_NECK_TRUNK, SKIN_LIMBS, STOOL,
};
use crate::reference;

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_LOCATION_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 2000;
pub const MIN_PHONE_LEN: usize = 7;
pub const MAX_PHONE_LEN: usize = 20;
pub const MAX_AGE_MONTHS: u16 = 240;

/// Which free-text fields a deployment insists on. Gender and age are always
/// required; everything here defaults to optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldPolicy {
    pub require_patient_name: bool,
    pub require_guardian_name: bool,
    pub require_guardian_phone: bool,
    pub require_clinician_name: bool,
    pub require_hospital_clinic: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("gender must be Male or Female (got '{value}')")]
    InvalidGender { value: String },
    #[error("age must be a whole number of months between 0 and 240 (got '{value}')")]
    InvalidAge { value: String },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },
    #[error(
        "guardian phone must be {MIN_PHONE_LEN}-{MAX_PHONE_LEN} characters: an optional leading \
         '+' followed by digits, spaces, dashes, or parentheses"
    )]
    InvalidPhone,
    #[error("assessment date must be YYYY-MM-DD (got '{value}')")]
    InvalidDate { value: String },
    #[error("{field} must be {allowed} (got '{value}')")]
    InvalidScore {
        field: &'static str,
        allowed: &'static str,
        value: String,
    },
}

/// Validated field set, ready for scoring and assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAssessment {
    pub patient: PatientDetails,
    pub context: ClinicalContext,
    pub scores: SymptomScores,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct Validator {
    policy: FieldPolicy,
    schema: SymptomSchema,
}

impl Validator {
    pub fn new(policy: FieldPolicy, schema: SymptomSchema) -> Self {
        Self { policy, schema }
    }

    pub fn schema(&self) -> SymptomSchema {
        self.schema
    }

    /// Validate and coerce one submission. `today` supplies the default
    /// assessment date so the function stays deterministic under test.
    pub fn validate(
        &self,
        submission: &AssessmentSubmission,
        today: NaiveDate,
    ) -> Result<ValidatedAssessment, ValidationError> {
        let gender = parse_gender(submission.gender.as_deref())?;
        let age_months = parse_age(submission.age_months.as_deref())?;

        let patient_name = text_field(
            "patient_name",
            submission.patient_name.as_deref(),
            self.policy.require_patient_name,
            MAX_NAME_LEN,
        )?;
        let guardian_name = text_field(
            "guardian_name",
            submission.guardian_name.as_deref(),
            self.policy.require_guardian_name,
            MAX_NAME_LEN,
        )?;
        let clinician_name = text_field(
            "clinician_name",
            submission.clinician_name.as_deref(),
            self.policy.require_clinician_name,
            MAX_NAME_LEN,
        )?;
        let hospital_clinic = text_field(
            "hospital_clinic",
            submission.hospital_clinic.as_deref(),
            self.policy.require_hospital_clinic,
            MAX_NAME_LEN,
        )?;

        let guardian_phone = parse_phone(
            submission.guardian_phone.as_deref(),
            self.policy.require_guardian_phone,
        )?;

        let country = text_field("country", submission.country.as_deref(), false, MAX_LOCATION_LEN)?;
        let city = text_field("city", submission.city.as_deref(), false, MAX_LOCATION_LEN)?;
        // Governorates only carry meaning for Oman; anything else loses the city.
        let city = match &country {
            Some(country) if reference::is_oman(country) => city,
            _ => None,
        };

        let assessment_date = parse_date(submission.assessment_date.as_deref(), today)?;

        let scores = self.parse_scores(&submission.scores)?;

        let notes = text_field("notes", submission.notes.as_deref(), false, MAX_NOTES_LEN)?;

        Ok(ValidatedAssessment {
            patient: PatientDetails {
                name: patient_name,
                gender,
                age_months,
            },
            context: ClinicalContext {
                assessment_date,
                guardian_name,
                guardian_phone,
                clinician_name,
                hospital_clinic,
                country,
                city,
            },
            scores,
            notes,
        })
    }

    fn parse_scores(&self, inputs: &ScoreInputs) -> Result<SymptomScores, ValidationError> {
        match self.schema {
            SymptomSchema::Classic => Ok(SymptomScores::Classic {
                crying: parse_score(&CRYING, inputs.crying.as_deref())?,
                regurgitation: parse_score(
                    &REGURGITATION_CLASSIC,
                    inputs.regurgitation.as_deref(),
                )?,
                stool: parse_score(&STOOL, inputs.stool.as_deref())?,
                skin: parse_score(&SKIN, inputs.skin.as_deref())?,
                respiratory: parse_score(&RESPIRATORY, inputs.respiratory.as_deref())?,
            }),
            SymptomSchema::Extended => Ok(SymptomScores::Extended {
                crying: parse_score(&CRYING, inputs.crying.as_deref())?,
                regurgitation: parse_score(
                    &REGURGITATION_EXTENDED,
                    inputs.regurgitation.as_deref(),
                )?,
                stool: parse_score(&STOOL, inputs.stool.as_deref())?,
                skin_head_neck_trunk: parse_score(
                    &SKIN_HEAD_NECK_TRUNK,
                    inputs.skin_head_neck_trunk.as_deref(),
                )?,
                skin_limbs: parse_score(&SKIN_LIMBS, inputs.skin_limbs.as_deref())?,
                urticaria: inputs.urticaria.unwrap_or(false),
                respiratory: parse_score(&RESPIRATORY, inputs.respiratory.as_deref())?,
            }),
        }
    }
}

fn parse_gender(raw: Option<&str>) -> Result<Gender, ValidationError> {
    match raw.map(str::trim) {
        Some("Male") => Ok(Gender::Male),
        Some("Female") => Ok(Gender::Female),
        other => Err(ValidationError::InvalidGender {
            value: other.unwrap_or_default().to_string(),
        }),
    }
}

fn parse_age(raw: Option<&str>) -> Result<u16, ValidationError> {
    let value = raw.map(str::trim).unwrap_or_default();
    match value.parse::<i64>() {
        Ok(age) if (0..=MAX_AGE_MONTHS as i64).contains(&age) => Ok(age as u16),
        _ => Err(ValidationError::InvalidAge {
            value: value.to_string(),
        }),
    }
}

/// Trim, drop empties to `None`, enforce the length cap, and enforce
/// requiredness. Character counts, not bytes.
fn text_field(
    field: &'static str,
    raw: Option<&str>,
    required: bool,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        if required {
            return Err(ValidationError::MissingField { field });
        }
        return Ok(None);
    }
    if trimmed.chars().count() > max {
        return Err(ValidationError::FieldTooLong { field, max });
    }
    Ok(Some(trimmed.to_string()))
}

fn parse_phone(raw: Option<&str>, required: bool) -> Result<Option<String>, ValidationError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        if required {
            return Err(ValidationError::MissingField {
                field: "guardian_phone",
            });
        }
        return Ok(None);
    }
    if !phone_shape_ok(trimmed) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(Some(trimmed.to_string()))
}

fn phone_shape_ok(value: &str) -> bool {
    let len = value.chars().count();
    if !(MIN_PHONE_LEN..=MAX_PHONE_LEN).contains(&len) {
        return false;
    }
    value.chars().enumerate().all(|(index, ch)| match ch {
        '+' => index == 0,
        '0'..='9' | ' ' | '-' | '(' | ')' => true,
        _ => false,
    })
}

fn parse_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let trimmed = raw.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return Ok(today);
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        value: trimmed.to_string(),
    })
}

fn parse_score(set: &ScoreSet, raw: Option<&str>) -> Result<u8, ValidationError> {
    let value = raw.map(str::trim).unwrap_or_default();
    let parsed = value
        .parse::<u8>()
        .map_err(|_| ValidationError::InvalidScore {
            field: set.field,
            allowed: set.allowed,
            value: value.to_string(),
        })?;
    if !set.contains(parsed) {
        return Err(ValidationError::InvalidScore {
            field: set.field,
            allowed: set.allowed,
            value: value.to_string(),
        });
    }
    Ok(parsed)
}
