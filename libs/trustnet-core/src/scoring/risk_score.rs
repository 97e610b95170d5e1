//! Risk Score Calculator
//!
//! Calculates a risk score from 0-100 for analyzed content. A higher
//! risk score means a lower trust level.
//!
//! Score Components:
//! - Weighted severity: each factor contributes severity * category weight
//! - Normalization: divided by what the same factors would score at max severity

use serde::Serialize;

use crate::entity::{FactorType, RiskFactor};

mod defaults {
    /// Weight for factors outside the known categories
    pub const WEIGHT: u32 = 10;
    /// Severity assumed when the AI omits it
    pub const SEVERITY: i64 = 5;
    pub const MAX_SEVERITY: u32 = 10;
}

/// Trust classification, inverse to the risk score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    High,
    Medium,
    Low,
}

/// Rough signal of analysis thoroughness, from the number of factors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Result of risk score calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResult {
    /// Normalized score (0-100)
    pub risk_score: u8,
    pub trust_level: TrustLevel,
    pub confidence: Confidence,
}

/// Summed severity per known category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RiskBreakdown {
    pub misinformation: i64,
    pub bias: i64,
    pub manipulation: i64,
    pub credibility: i64,
    pub verification: i64,
}

impl RiskBreakdown {
    pub fn get(&self, factor_type: FactorType) -> i64 {
        match factor_type {
            FactorType::Misinformation => self.misinformation,
            FactorType::Bias => self.bias,
            FactorType::Manipulation => self.manipulation,
            FactorType::Credibility => self.credibility,
            FactorType::Verification => self.verification,
        }
    }

    fn slot_mut(&mut self, factor_type: FactorType) -> &mut i64 {
        match factor_type {
            FactorType::Misinformation => &mut self.misinformation,
            FactorType::Bias => &mut self.bias,
            FactorType::Manipulation => &mut self.manipulation,
            FactorType::Credibility => &mut self.credibility,
            FactorType::Verification => &mut self.verification,
        }
    }
}

/// Risk score calculator
pub struct RiskScoreCalculator;

impl RiskScoreCalculator {
    /// Calculate the risk score, trust level and confidence for a factor list
    ///
    /// Unknown categories count with the default weight. A missing or zero
    /// severity counts as the default severity.
    pub fn calculate(factors: &[RiskFactor]) -> RiskResult {
        let mut raw_score = 0.0_f64;
        let mut total_weight = 0.0_f64;

        for factor in factors {
            let weight = Self::weight(factor.kind());
            let severity = match factor.severity {
                Some(s) if s != 0 => s,
                _ => defaults::SEVERITY,
            };

            raw_score += severity as f64 * weight as f64;
            total_weight += (weight * defaults::MAX_SEVERITY) as f64;
        }

        let normalized = if total_weight > 0.0 {
            (raw_score / total_weight) * 100.0
        } else {
            0.0
        };

        RiskResult {
            risk_score: normalized.round().clamp(0.0, 100.0) as u8,
            trust_level: Self::trust_level(normalized),
            confidence: Self::confidence(factors.len()),
        }
    }

    /// Sum severities per known category
    ///
    /// Unlike `calculate`, factors of unknown categories are ignored here and a
    /// missing severity adds nothing.
    pub fn breakdown(factors: &[RiskFactor]) -> RiskBreakdown {
        let mut breakdown = RiskBreakdown::default();

        for factor in factors {
            if let Some(kind) = factor.kind() {
                let slot = breakdown.slot_mut(kind);
                *slot = slot.saturating_add(factor.severity.unwrap_or(0));
            }
        }

        breakdown
    }

    /// Weight for a category, or the default for unknown ones
    pub fn weight(factor_type: Option<FactorType>) -> u32 {
        factor_type.map_or(defaults::WEIGHT, |t| t.weight())
    }

    /// Bucket a normalized score: < 30 high, < 60 medium, else low
    pub fn trust_level(normalized_score: f64) -> TrustLevel {
        match normalized_score {
            s if s < 30.0 => TrustLevel::High,
            s if s < 60.0 => TrustLevel::Medium,
            _ => TrustLevel::Low,
        }
    }

    pub fn confidence(factor_count: usize) -> Confidence {
        match factor_count {
            n if n >= 5 => Confidence::High,
            n if n >= 3 => Confidence::Medium,
            _ => Confidence::Low,
        }
    }
}
