//! Risk scoring module
//!
//! Turns the AI-reported risk factors into:
//! - Risk Score (0-100): weighted severity, normalized against max severity
//! - Trust Level (high/medium/low): inverse buckets of the risk score
//! - Confidence (high/medium/low): how many factors were reported
//! - Risk Breakdown: summed severity per known category

pub mod risk_score;

pub use risk_score::{Confidence, RiskBreakdown, RiskResult, RiskScoreCalculator, TrustLevel};
