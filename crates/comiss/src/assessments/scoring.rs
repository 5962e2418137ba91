//! Symptom score sets and aggregation.
//!
//! Two schema revisions coexist and are selected once at deployment. The
//! classic revision mirrors the single-skin-field form; the extended revision
//! splits atopic eczema into two body regions and adds the urticaria bonus.
//! Aggregation is a pure function of the validated sub-scores.

use serde::{Deserialize, Serialize};

use super::domain::SymptomScores;

/// Highest total reachable under any schema revision (extended: 6 crying +
/// 6 regurgitation + 6 stool + 12 skin + 3 respiratory).
pub const MAX_TOTAL_SCORE: u8 = 33;

/// Fixed bonus added to the skin score when urticaria is present.
pub const URTICARIA_BONUS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymptomSchema {
    /// First form revision: one 0-3 skin grade, 0-3 regurgitation.
    Classic,
    /// Later revision: per-region eczema grades, urticaria flag, 0-6
    /// regurgitation. Canonical default.
    Extended,
}

impl SymptomSchema {
    pub const fn label(self) -> &'static str {
        match self {
            SymptomSchema::Classic => "classic",
            SymptomSchema::Extended => "extended",
        }
    }
}

/// Discrete set of admissible values for one symptom field. Out-of-set values
/// are rejected by the validator, never rounded or clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreSet {
    pub field: &'static str,
    pub allowed: &'static str,
    kind: SetKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SetKind {
    Range(u8, u8),
    Values(&'static [u8]),
}

impl ScoreSet {
    const fn range(field: &'static str, min: u8, max: u8, allowed: &'static str) -> Self {
        Self {
            field,
            allowed,
            kind: SetKind::Range(min, max),
        }
    }

    const fn values(field: &'static str, values: &'static [u8], allowed: &'static str) -> Self {
        Self {
            field,
            allowed,
            kind: SetKind::Values(values),
        }
    }

    pub fn contains(&self, value: u8) -> bool {
        match self.kind {
            SetKind::Range(min, max) => value >= min && value <= max,
            SetKind::Values(values) => values.contains(&value),
        }
    }
}

pub const CRYING: ScoreSet = ScoreSet::range("crying", 0, 6, "0-6");
pub const REGURGITATION_CLASSIC: ScoreSet = ScoreSet::range("regurgitation", 0, 3, "0-3");
pub const REGURGITATION_EXTENDED: ScoreSet = ScoreSet::range("regurgitation", 0, 6, "0-6");
/// Brussels Infant and Toddler Stool Scale buckets.
pub const STOOL: ScoreSet = ScoreSet::values("stool", &[0, 3, 6], "0, 3, or 6");
pub const SKIN: ScoreSet = ScoreSet::range("skin", 0, 3, "0-3");
pub const SKIN_HEAD_NECK_TRUNK: ScoreSet =
    ScoreSet::range("skin_head_neck_trunk", 0, 3, "0-3");
pub const SKIN_LIMBS: ScoreSet = ScoreSet::range("skin_limbs", 0, 3, "0-3");
pub const RESPIRATORY: ScoreSet = ScoreSet::range("respiratory", 0, 3, "0-3");

impl SymptomScores {
    pub const fn schema(&self) -> SymptomSchema {
        match self {
            SymptomScores::Classic { .. } => SymptomSchema::Classic,
            SymptomScores::Extended { .. } => SymptomSchema::Extended,
        }
    }

    pub const fn crying(&self) -> u8 {
        match *self {
            SymptomScores::Classic { crying, .. } | SymptomScores::Extended { crying, .. } => {
                crying
            }
        }
    }

    pub const fn regurgitation(&self) -> u8 {
        match *self {
            SymptomScores::Classic { regurgitation, .. }
            | SymptomScores::Extended { regurgitation, .. } => regurgitation,
        }
    }

    pub const fn stool(&self) -> u8 {
        match *self {
            SymptomScores::Classic { stool, .. } | SymptomScores::Extended { stool, .. } => stool,
        }
    }

    pub const fn respiratory(&self) -> u8 {
        match *self {
            SymptomScores::Classic { respiratory, .. }
            | SymptomScores::Extended { respiratory, .. } => respiratory,
        }
    }

    /// Skin aggregate: the single grade under the classic schema, the region
    /// sum plus the urticaria bonus under the extended one.
    pub fn skin_score(&self) -> u8 {
        match *self {
            SymptomScores::Classic { skin, .. } => skin,
            SymptomScores::Extended {
                skin_head_neck_trunk,
                skin_limbs,
                urticaria,
                ..
            } => {
                let bonus = if urticaria { URTICARIA_BONUS } else { 0 };
                skin_head_neck_trunk + skin_limbs + bonus
            }
        }
    }

    /// Arithmetic sum of the five symptom domains. Never stored
    /// independently of the sub-scores it was computed from.
    pub fn total_score(&self) -> u8 {
        match *self {
            SymptomScores::Classic {
                crying,
                regurgitation,
                stool,
                respiratory,
                ..
            }
            | SymptomScores::Extended {
                crying,
                regurgitation,
                stool,
                respiratory,
                ..
            } => crying + regurgitation + stool + self.skin_score() + respiratory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stool_set_is_sparse() {
        assert!(STOOL.contains(0));
        assert!(STOOL.contains(3));
        assert!(STOOL.contains(6));
        assert!(!STOOL.contains(2));
        assert!(!STOOL.contains(4));
    }

    #[test]
    fn extended_maximum_hits_the_cap() {
        let scores = SymptomScores::Extended {
            crying: 6,
            regurgitation: 6,
            stool: 6,
            skin_head_neck_trunk: 3,
            skin_limbs: 3,
            urticaria: true,
            respiratory: 3,
        };
        assert_eq!(scores.skin_score(), 12);
        assert_eq!(scores.total_score(), MAX_TOTAL_SCORE);
    }
}
