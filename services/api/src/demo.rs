use crate::infra::InMemoryAssessmentRepository;
use chrono::NaiveDate;
use clap::Args;
use comiss::assessments::report::{RenderError, ReportRenderer, ReportView};
use comiss::assessments::{
    AssessmentService, InterpretationScheme, ScoreInputs, SessionContext, SymptomSchema,
};
use comiss::assessments::AssessmentSubmission;
use comiss::config::ScoringConfig;
use comiss::error::AppError;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Assessment date (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) date: Option<NaiveDate>,
    /// Use the high-score sample instead of the moderate one.
    #[arg(long)]
    pub(crate) severe: bool,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { date, severe } = args;

    let repository = Arc::new(InMemoryAssessmentRepository::default());
    let service = AssessmentService::new(
        repository,
        ScoringConfig {
            schema: SymptomSchema::Extended,
            scheme: InterpretationScheme::Report,
        },
    );

    let submission = if severe {
        severe_submission(date)
    } else {
        sample_submission(date)
    };

    let record = service.submit(submission, &SessionContext::anonymous())?;
    let view = ReportView::from_assessment(&record);

    let rendered = TextReportRenderer
        .render(&view)
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err.to_string()))?;
    println!("{}", String::from_utf8_lossy(&rendered));
    println!("Suggested filename: {}", view.filename("pdf"));

    let summary = service
        .summary()
        .map_err(comiss::assessments::SubmissionError::from)?;
    println!(
        "\nDashboard after save: {} total, {} mild / {} moderate / {} severe, mean {:.1}",
        summary.total, summary.mild, summary.moderate, summary.severe, summary.average_score
    );

    Ok(())
}

fn sample_submission(date: Option<NaiveDate>) -> AssessmentSubmission {
    AssessmentSubmission {
        patient_name: Some("Demo Infant".to_string()),
        gender: Some("Female".to_string()),
        age_months: Some("5".to_string()),
        assessment_date: date.map(|date| date.format("%Y-%m-%d").to_string()),
        guardian_name: Some("Demo Guardian".to_string()),
        guardian_phone: Some("+968 9123 4567".to_string()),
        clinician_name: Some("Dr. Demo".to_string()),
        hospital_clinic: Some("Demo Clinic".to_string()),
        country: Some("Oman".to_string()),
        city: Some("Muscat".to_string()),
        scores: ScoreInputs {
            crying: Some("2".to_string()),
            regurgitation: Some("2".to_string()),
            stool: Some("3".to_string()),
            skin: None,
            skin_head_neck_trunk: Some("1".to_string()),
            skin_limbs: Some("0".to_string()),
            urticaria: Some(false),
            respiratory: Some("0".to_string()),
        },
        notes: Some("Sample data for the CLI demo.".to_string()),
        consent: true,
    }
}

fn severe_submission(date: Option<NaiveDate>) -> AssessmentSubmission {
    let mut submission = sample_submission(date);
    submission.scores = ScoreInputs {
        crying: Some("6".to_string()),
        regurgitation: Some("6".to_string()),
        stool: Some("6".to_string()),
        skin: None,
        skin_head_neck_trunk: Some("3".to_string()),
        skin_limbs: Some("3".to_string()),
        urticaria: Some(true),
        respiratory: Some("3".to_string()),
    };
    submission
}

/// Plain-text renderer used by the demo; real deployments plug a PDF layout
/// into the same trait.
struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn render(&self, view: &ReportView) -> Result<Vec<u8>, RenderError> {
        let mut out = String::new();
        out.push_str(view.title);
        out.push('\n');
        out.push_str(&"=".repeat(view.title.len()));
        out.push('\n');

        for section in &view.sections {
            out.push('\n');
            out.push_str(section.heading);
            out.push('\n');
            for row in &section.rows {
                out.push_str(&format!("  {}: {}\n", row.label, row.value));
            }
        }

        out.push_str(&format!(
            "\nTotal Score: {} / {}\n",
            view.total_score, view.max_score
        ));
        out.push_str(&format!("Interpretation: {}\n", view.interpretation.label));
        if let Some(recommendation) = view.interpretation.recommendation.as_deref() {
            out.push_str(&format!("Recommendation: {recommendation}\n"));
        }
        if view.interpretation.product_recommended {
            out.push_str("Product recommendation: applicable\n");
        }
        out.push('\n');
        out.push_str(view.footer);
        out.push('\n');

        Ok(out.into_bytes())
    }
}
