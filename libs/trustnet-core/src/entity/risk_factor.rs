use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value as JsonValue;

/// Known risk factor categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactorType {
    Misinformation,
    Bias,
    Manipulation,
    Credibility,
    Verification,
}

impl FactorType {
    pub const ALL: [FactorType; 5] = [
        FactorType::Misinformation,
        FactorType::Bias,
        FactorType::Manipulation,
        FactorType::Credibility,
        FactorType::Verification,
    ];

    /// Exact, case-sensitive lookup. Anything else is a generic factor.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "misinformation" => Some(FactorType::Misinformation),
            "bias" => Some(FactorType::Bias),
            "manipulation" => Some(FactorType::Manipulation),
            "credibility" => Some(FactorType::Credibility),
            "verification" => Some(FactorType::Verification),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorType::Misinformation => "misinformation",
            FactorType::Bias => "bias",
            FactorType::Manipulation => "manipulation",
            FactorType::Credibility => "credibility",
            FactorType::Verification => "verification",
        }
    }

    /// Scoring weight for this category
    pub const fn weight(&self) -> u32 {
        match self {
            FactorType::Misinformation => 30,
            FactorType::Bias => 20,
            FactorType::Manipulation => 25,
            FactorType::Credibility => 15,
            FactorType::Verification => 10,
        }
    }
}

/// A single concern reported by the AI about submitted content.
///
/// The shape comes straight from model output, so every field is optional on
/// the way in. `factor_type` keeps the raw string so unknown categories
/// survive the round trip back to the client.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub factor_type: String,
    #[serde(
        default,
        deserialize_with = "lenient_severity",
        skip_serializing_if = "Option::is_none"
    )]
    pub severity: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub evidence: String,
}

impl RiskFactor {
    pub fn new(factor_type: impl Into<String>, severity: Option<i64>) -> Self {
        Self {
            factor_type: factor_type.into(),
            severity,
            ..Default::default()
        }
    }

    /// Known category of this factor, if any
    pub fn kind(&self) -> Option<FactorType> {
        FactorType::parse(&self.factor_type)
    }
}

/// Treats an explicit `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts integers, floats (rounded) and numeric strings; anything else is missing
fn lenient_severity<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = JsonValue::deserialize(deserializer)?;

    let severity = match value {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(round_finite)),
        JsonValue::String(s) => s.trim().parse::<f64>().ok().and_then(round_finite),
        _ => None,
    };

    Ok(severity)
}

fn round_finite(value: f64) -> Option<i64> {
    value.is_finite().then(|| value.round() as i64)
}
