//! Layout-agnostic report content. The view carries the ordered sections a
//! renderer lays out; the renderer itself (PDF, text, anything else) lives
//! behind the `ReportRenderer` trait in the hosting service.

use chrono::NaiveDate;
use serde::Serialize;

use super::domain::{Assessment, SymptomScores};
use super::interpretation::Interpretation;
use super::scoring::MAX_TOTAL_SCORE;

pub const REPORT_TITLE: &str = "CoMiSS Assessment Report";
pub const REPORT_PREFIX: &str = "CoMiSS_Assessment";
pub const REPORT_FOOTER: &str = "Confidential - for clinical use only";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSection {
    pub heading: &'static str,
    pub rows: Vec<ReportRow>,
}

/// Everything a renderer needs to produce the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportView {
    pub title: &'static str,
    pub sections: Vec<ReportSection>,
    pub total_score: u8,
    pub max_score: u8,
    pub interpretation: Interpretation,
    pub footer: &'static str,
    pub filename_stem: String,
}

impl ReportView {
    pub fn from_assessment(record: &Assessment) -> Self {
        let mut patient_rows = vec![
            row("Name", record.patient.name.as_deref().unwrap_or("-")),
            row("Gender", record.patient.gender.label()),
            row("Age", &format!("{} months", record.patient.age_months)),
            row(
                "Date",
                &record.context.assessment_date.format("%Y-%m-%d").to_string(),
            ),
        ];
        if let Some(guardian) = record.context.guardian_name.as_deref() {
            patient_rows.push(row("Guardian", guardian));
        }
        if let Some(phone) = record.context.guardian_phone.as_deref() {
            patient_rows.push(row("Phone", phone));
        }

        let mut clinician_rows = Vec::new();
        if let Some(clinician) = record.context.clinician_name.as_deref() {
            clinician_rows.push(row("Clinician", clinician));
        }
        if let Some(hospital) = record.context.hospital_clinic.as_deref() {
            clinician_rows.push(row("Hospital/Clinic", hospital));
        }
        if let Some(country) = record.context.country.as_deref() {
            clinician_rows.push(row("Country", country));
        }
        if let Some(city) = record.context.city.as_deref() {
            clinician_rows.push(row("City", city));
        }

        let mut score_rows = vec![
            row("Crying", &record.scores.crying().to_string()),
            row("Regurgitation", &record.scores.regurgitation().to_string()),
            row("Stool", &record.scores.stool().to_string()),
        ];
        match record.scores {
            SymptomScores::Classic { skin, .. } => {
                score_rows.push(row("Skin", &skin.to_string()));
            }
            SymptomScores::Extended {
                skin_head_neck_trunk,
                skin_limbs,
                urticaria,
                ..
            } => {
                score_rows.push(row(
                    "Skin (head/neck/trunk)",
                    &skin_head_neck_trunk.to_string(),
                ));
                score_rows.push(row("Skin (arms/hands/legs/feet)", &skin_limbs.to_string()));
                score_rows.push(row("Urticaria", if urticaria { "Yes" } else { "No" }));
            }
        }
        score_rows.push(row("Respiratory", &record.scores.respiratory().to_string()));

        let mut sections = vec![
            ReportSection {
                heading: "Patient Details",
                rows: patient_rows,
            },
            ReportSection {
                heading: "Clinician Details",
                rows: clinician_rows,
            },
            ReportSection {
                heading: "CoMiSS Scores",
                rows: score_rows,
            },
        ];
        if let Some(notes) = record.notes.as_deref() {
            sections.push(ReportSection {
                heading: "Notes",
                rows: vec![row("Notes", notes)],
            });
        }

        Self {
            title: REPORT_TITLE,
            sections,
            total_score: record.total_score,
            max_score: MAX_TOTAL_SCORE,
            interpretation: record.interpretation.clone(),
            footer: REPORT_FOOTER,
            filename_stem: filename_stem(
                REPORT_PREFIX,
                record.patient.name.as_deref(),
                record.context.assessment_date,
            ),
        }
    }

    pub fn filename(&self, extension: &str) -> String {
        format!("{}.{}", self.filename_stem, extension)
    }
}

fn row(label: &'static str, value: &str) -> ReportRow {
    ReportRow {
        label,
        value: value.to_string(),
    }
}

/// `<prefix>_<patient name, whitespace collapsed to underscores>_<date>`.
pub fn filename_stem(prefix: &str, patient_name: Option<&str>, date: NaiveDate) -> String {
    let name = patient_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("patient");
    let name: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");
    format!("{}_{}_{}", prefix, name, date.format("%Y-%m-%d"))
}

/// Renderer seam. Implementations own layout and asset choices; the engine
/// only guarantees the field values.
pub trait ReportRenderer {
    fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("report rendering failed: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn filename_replaces_whitespace_runs() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");
        assert_eq!(
            filename_stem(REPORT_PREFIX, Some("Lina  Al Harthy"), date),
            "CoMiSS_Assessment_Lina_Al_Harthy_2026-03-14"
        );
    }

    #[test]
    fn filename_falls_back_for_anonymous_patients() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).expect("valid date");
        assert_eq!(
            filename_stem(REPORT_PREFIX, None, date),
            "CoMiSS_Assessment_patient_2026-03-14"
        );
        assert_eq!(
            filename_stem(REPORT_PREFIX, Some("   "), date),
            "CoMiSS_Assessment_patient_2026-03-14"
        );
    }
}
