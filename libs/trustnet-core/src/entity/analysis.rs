use serde::{Deserialize, Serialize};

use super::risk_factor::{null_as_default, RiskFactor};

mod defaults {
    pub const SUMMARY_PREVIEW_CHARS: usize = 200;

    pub const UNSTRUCTURED_RECOMMENDATION: &str =
        "Unable to parse detailed analysis. Please review the content carefully.";
    pub const UNSTRUCTURED_ASSESSMENT: &str = "Analysis completed but structured data unavailable";

    pub const MALFORMED_SUMMARY: &str = "Error parsing analysis results";
    pub const MALFORMED_RECOMMENDATION: &str = "Analysis completed with parsing errors";
    pub const MALFORMED_ASSESSMENT: &str = "Please review the content manually";
}

/// Structured analysis returned by the AI for a piece of content
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub summary: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub factors: Vec<RiskFactor>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub overall_assessment: String,
}

impl AnalysisReport {
    /// Parse a raw model reply.
    ///
    /// The reply is expected to contain a JSON object somewhere in it, possibly
    /// wrapped in prose or a code fence. Everything from the first `{` to the
    /// last `}` is parsed. This never fails: a reply without an object, or with
    /// one that does not parse, yields a degraded report instead.
    pub fn from_llm_reply(reply: &str) -> Self {
        let Some(candidate) = extract_json_object(reply) else {
            return Self::unstructured(reply);
        };

        serde_json::from_str(candidate).unwrap_or_else(|_| Self::malformed())
    }

    /// Fallback when the reply holds no JSON object at all
    pub fn unstructured(reply: &str) -> Self {
        Self {
            summary: reply.chars().take(defaults::SUMMARY_PREVIEW_CHARS).collect(),
            factors: Vec::new(),
            recommendations: vec![defaults::UNSTRUCTURED_RECOMMENDATION.to_string()],
            overall_assessment: defaults::UNSTRUCTURED_ASSESSMENT.to_string(),
        }
    }

    /// Fallback when the JSON object in the reply cannot be parsed
    pub fn malformed() -> Self {
        Self {
            summary: defaults::MALFORMED_SUMMARY.to_string(),
            factors: Vec::new(),
            recommendations: vec![defaults::MALFORMED_RECOMMENDATION.to_string()],
            overall_assessment: defaults::MALFORMED_ASSESSMENT.to_string(),
        }
    }
}

/// Slice from the first `{` to the last `}`, inclusive
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;

    (end > start).then(|| &text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANNED_REPLY: &str = r#"Here is my analysis:
```json
{
  "summary": "Claims a miracle cure",
  "factors": [
    {"type": "misinformation", "severity": 9, "description": "Unproven claim", "evidence": "cures everything"},
    {"type": "manipulation", "severity": 6, "description": "Urgency", "evidence": "act now"}
  ],
  "recommendations": ["Check medical sources"],
  "overallAssessment": "Low trust"
}
```
Let me know if you need more."#;

    #[test]
    fn test_extracts_object_from_prose() {
        let report = AnalysisReport::from_llm_reply(CANNED_REPLY);

        assert_eq!(report.summary, "Claims a miracle cure");
        assert_eq!(report.factors.len(), 2);
        assert_eq!(report.factors[0].severity, Some(9));
        assert_eq!(report.recommendations, vec!["Check medical sources"]);
        assert_eq!(report.overall_assessment, "Low trust");
    }

    #[test]
    fn test_no_object_falls_back_to_preview() {
        let reply = "x".repeat(500);
        let report = AnalysisReport::from_llm_reply(&reply);

        assert_eq!(report.summary.chars().count(), 200);
        assert!(report.factors.is_empty());
        assert_eq!(
            report.recommendations,
            vec![defaults::UNSTRUCTURED_RECOMMENDATION]
        );
        assert_eq!(report.overall_assessment, defaults::UNSTRUCTURED_ASSESSMENT);
    }

    #[test]
    fn test_preview_respects_char_boundaries() {
        let reply = "é".repeat(300);
        let report = AnalysisReport::from_llm_reply(&reply);
        assert_eq!(report.summary, "é".repeat(200));
    }

    #[test]
    fn test_reversed_braces_are_not_an_object() {
        let report = AnalysisReport::from_llm_reply("} nothing here {");
        assert_eq!(report.overall_assessment, defaults::UNSTRUCTURED_ASSESSMENT);
        assert_eq!(report.summary, "} nothing here {");
    }

    #[test]
    fn test_malformed_object_falls_back() {
        let report = AnalysisReport::from_llm_reply(r#"{"summary": "cut off", "factors": [}"#);
        assert_eq!(report, AnalysisReport::malformed());
    }

    #[test]
    fn test_partial_object_uses_defaults() {
        let report = AnalysisReport::from_llm_reply(r#"{"summary": "Short", "factors": null}"#);

        assert_eq!(report.summary, "Short");
        assert!(report.factors.is_empty());
        assert!(report.recommendations.is_empty());
        assert!(report.overall_assessment.is_empty());
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(AnalysisReport::malformed()).unwrap();
        assert_eq!(json["overallAssessment"], defaults::MALFORMED_ASSESSMENT);
    }
}
