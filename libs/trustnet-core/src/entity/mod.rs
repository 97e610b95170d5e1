pub mod analysis;
pub mod risk_factor;

// Re-exports for convenience
pub use analysis::AnalysisReport;
pub use risk_factor::{FactorType, RiskFactor};
