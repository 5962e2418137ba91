//! Threshold tables mapping a total score to a severity or likelihood band.
//!
//! Three band tables shipped in different revisions of the tool. They are
//! deliberately kept as separate schemes selected by configuration; merging
//! their thresholds would silently change clinical meaning.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationScheme {
    /// Dashboard-style severity bands.
    Clinical,
    /// Form-style CMPA likelihood bands with care recommendations.
    Likelihood,
    /// Report-style bands from the richest revision. Canonical default; the
    /// top band raises the product recommendation flag.
    Report,
}

impl InterpretationScheme {
    pub const fn label(self) -> &'static str {
        match self {
            InterpretationScheme::Clinical => "clinical",
            InterpretationScheme::Likelihood => "likelihood",
            InterpretationScheme::Report => "report",
        }
    }

    /// Pure band lookup. No state, no side effects.
    pub fn band(self, total_score: u8) -> Interpretation {
        match self {
            InterpretationScheme::Clinical => {
                let label = match total_score {
                    0..=5 => "Mild",
                    6..=11 => "Moderate",
                    _ => "Severe",
                };
                Interpretation {
                    scheme: self,
                    label: label.to_string(),
                    recommendation: None,
                    product_recommended: false,
                }
            }
            InterpretationScheme::Likelihood => {
                let (label, recommendation) = match total_score {
                    0..=10 => ("Low likelihood of CMPA", "Continue monitoring"),
                    11..=15 => ("Moderate likelihood of CMPA", "Consider dietary changes"),
                    _ => ("High likelihood of CMPA", "Consider referral"),
                };
                Interpretation {
                    scheme: self,
                    label: label.to_string(),
                    recommendation: Some(recommendation.to_string()),
                    product_recommended: false,
                }
            }
            InterpretationScheme::Report => match total_score {
                0..=5 => Interpretation {
                    scheme: self,
                    label: "Not likely related to cow's milk".to_string(),
                    recommendation: Some("Look for other causes".to_string()),
                    product_recommended: false,
                },
                6..=9 => Interpretation {
                    scheme: self,
                    label: "More investigation needed".to_string(),
                    recommendation: None,
                    product_recommended: false,
                },
                _ => Interpretation {
                    scheme: self,
                    label: "Suggestive of cow's milk-related symptoms, potentially CMA"
                        .to_string(),
                    recommendation: None,
                    product_recommended: true,
                },
            },
        }
    }
}

/// Band assignment produced at submission time and stored with the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub scheme: InterpretationScheme,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    pub product_recommended: bool,
}

/// Severity buckets used by the dashboard statistics. Fixed to the clinical
/// thresholds regardless of which scheme a deployment classifies with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Mild,
    Moderate,
    Severe,
}

impl SeverityBand {
    pub fn from_total(total_score: u8) -> Self {
        match total_score {
            0..=5 => SeverityBand::Mild,
            6..=11 => SeverityBand::Moderate,
            _ => SeverityBand::Severe,
        }
    }
}
