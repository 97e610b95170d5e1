//! Domain types and scoring for TrustNet-AI content analysis.

pub mod entity;
pub mod scoring;

// Re-export commonly used types
pub use entity::{AnalysisReport, FactorType, RiskFactor};
pub use scoring::{Confidence, RiskBreakdown, RiskResult, RiskScoreCalculator, TrustLevel};
