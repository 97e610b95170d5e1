//! Prompt text sent to the chat completion provider

use serde_json::Value as JsonValue;

pub const ANALYST_SYSTEM_PROMPT: &str = "You are an expert content analyst specializing in identifying misinformation, bias, manipulation tactics, and assessing credibility. Provide structured analysis in JSON format.";

pub const IMAGE_SYSTEM_PROMPT: &str = "You are an expert at detecting scams, fake offers, phishing attempts, and manipulative content in images. Analyze images for trust and safety.";

pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant specializing in content safety, scam detection, and digital literacy. Answer user questions about their analysis results in a clear, concise, and helpful manner.";

const NOT_AVAILABLE: &str = "N/A";

/// JSON shape the model is asked to reply with; `evidence_hint` describes what
/// the evidence field should quote.
fn response_schema(summary_hint: &str, evidence_hint: &str, audience: &str, assessment_hint: &str) -> String {
    format!(
        r#"{{
  "summary": "{summary_hint}",
  "factors": [
    {{
      "type": "misinformation|bias|manipulation|credibility|verification",
      "severity": 1-10,
      "description": "Description of the risk factor",
      "evidence": "{evidence_hint}"
    }}
  ],
  "recommendations": ["List of recommendations for the {audience}"],
  "overallAssessment": "{assessment_hint}"
}}"#
    )
}

fn depth_instruction(detailed: bool) -> &'static str {
    if detailed {
        "Provide detailed analysis for each factor."
    } else {
        "Provide concise analysis."
    }
}

pub fn text_analysis_prompt(text: &str, detailed: bool) -> String {
    let schema = response_schema(
        "Brief summary of the analysis",
        "Specific evidence from the content",
        "reader",
        "Overall assessment of content trustworthiness",
    );

    format!(
        r#"Analyze the following content for trustworthiness and identify potential risks:

Content: "{text}"

Please provide a detailed analysis in the following JSON format:
{schema}

Focus on:
1. Factual accuracy and potential misinformation
2. Bias and one-sided perspectives
3. Manipulation tactics (emotional appeals, logical fallacies)
4. Source credibility indicators
5. Verification status of claims

{}"#,
        depth_instruction(detailed)
    )
}

pub fn image_analysis_prompt(detailed: bool) -> String {
    let schema = response_schema(
        "Brief summary of what you see and the risk level",
        "Specific visual elements that indicate this risk",
        "viewer",
        "Overall safety assessment of this image",
    );

    format!(
        r#"Analyze this image for potential scams, fraud, or manipulative content.

Please provide a detailed analysis in the following JSON format:
{schema}

Focus on:
1. Fake job offers or "too good to be true" promises
2. Requests for money, payment, or personal information
3. Urgency tactics ("Limited time", "Act now")
4. Suspicious URLs or QR codes
5. Impersonation of legitimate brands
6. Poor quality or manipulated images
7. Grammatical errors or unprofessional design

{}"#,
        depth_instruction(detailed)
    )
}

/// System message carrying a previous analysis into the chat
///
/// `context` is whatever the client echoed back from `/analyze`; only
/// `riskScore`, `trustLevel` and `analysis.summary` are read.
pub fn analysis_context_prompt(context: &JsonValue) -> String {
    let risk_score = display_value(context.get("riskScore"));
    let trust_level = display_value(context.get("trustLevel"));
    let summary = display_value(context.get("analysis").and_then(|a| a.get("summary")));

    format!(
        "Context from previous analysis:\nRisk Score: {risk_score}\nTrust Level: {trust_level}\nSummary: {summary}\n\nUse this context to answer the user's questions."
    )
}

fn display_value(value: Option<&JsonValue>) -> String {
    match value {
        Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
        Some(JsonValue::Number(n)) => n.to_string(),
        Some(JsonValue::Bool(b)) => b.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_prompt_embeds_content() {
        let prompt = text_analysis_prompt("The moon is made of cheese.", false);

        assert!(prompt.contains(r#"Content: "The moon is made of cheese.""#));
        assert!(prompt.contains(r#""overallAssessment": "Overall assessment of content trustworthiness""#));
        assert!(prompt.ends_with("Provide concise analysis."));
    }

    #[test]
    fn test_detailed_flag() {
        assert!(text_analysis_prompt("abc", true).ends_with("Provide detailed analysis for each factor."));
        assert!(image_analysis_prompt(true).ends_with("Provide detailed analysis for each factor."));
        assert!(image_analysis_prompt(false).contains("Suspicious URLs or QR codes"));
    }

    #[test]
    fn test_context_prompt() {
        let context = json!({
            "riskScore": 72,
            "trustLevel": "low",
            "analysis": {"summary": "Phishing attempt"}
        });

        let prompt = analysis_context_prompt(&context);
        assert!(prompt.contains("Risk Score: 72\n"));
        assert!(prompt.contains("Trust Level: low\n"));
        assert!(prompt.contains("Summary: Phishing attempt\n"));
    }

    #[test]
    fn test_context_prompt_missing_fields() {
        let prompt = analysis_context_prompt(&json!({"analysis": {"summary": ""}}));

        assert!(prompt.contains("Risk Score: N/A\n"));
        assert!(prompt.contains("Trust Level: N/A\n"));
        assert!(prompt.contains("Summary: N/A\n"));
    }
}
