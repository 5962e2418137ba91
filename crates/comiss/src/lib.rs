//! Scoring engine and HTTP surface for CoMiSS infant symptom assessments.
//!
//! The library validates raw form submissions, computes the weighted symptom
//! score, classifies the total against the configured interpretation scheme,
//! and assembles immutable assessment records for storage and report
//! rendering. Storage, notification delivery, and report layout are seams
//! (traits) implemented by the hosting service.

pub mod assessments;
pub mod config;
pub mod contact;
pub mod error;
pub mod reference;
pub mod telemetry;
