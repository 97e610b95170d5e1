//! Content analysis routes

use std::sync::Arc;

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        Multipart, State,
    },
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use trustnet_core::{AnalysisReport, Confidence, RiskBreakdown, RiskScoreCalculator, TrustLevel};

use crate::error::ApiError;
use crate::routes::ApiResponse;
use crate::service::timestamp;
use crate::AppState;

mod defaults {
    pub const MIN_TEXT_CHARS: usize = 10;
    pub const MAX_TEXT_CHARS: usize = 10_000;
    pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
    pub const IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];
}

/// Body of POST /api/analyze
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Kept untyped so a non-string gets the same message as a missing one
    #[serde(default)]
    pub text: Option<JsonValue>,
    #[serde(default)]
    pub options: Option<AnalyzeOptions>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AnalyzeOptions {
    #[serde(default)]
    pub detailed: bool,
}

/// Analysis response payload - matches the frontend result card
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisData {
    pub risk_score: u8,
    pub trust_level: TrustLevel,
    pub confidence: Confidence,
    pub analysis: AnalysisDetail,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisDetail {
    #[serde(flatten)]
    pub report: AnalysisReport,
    pub risk_breakdown: RiskBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub analyzed_at: String,
}

impl AnalysisData {
    /// Score a parsed report and wrap it for the client
    pub fn from_report(report: AnalysisReport, metadata: AnalysisMetadata) -> Self {
        let risk = RiskScoreCalculator::calculate(&report.factors);
        let risk_breakdown = RiskScoreCalculator::breakdown(&report.factors);

        Self {
            risk_score: risk.risk_score,
            trust_level: risk.trust_level,
            confidence: risk.confidence,
            analysis: AnalysisDetail {
                report,
                risk_breakdown,
            },
            metadata,
        }
    }
}

/// Length in UTF-16 code units, the unit browsers count in
fn text_length(text: &str) -> usize {
    text.encode_utf16().count()
}

fn validate_text(text: Option<&JsonValue>) -> Result<&str, ApiError> {
    let text = match text {
        Some(JsonValue::String(s)) if !s.is_empty() => s.as_str(),
        _ => {
            return Err(ApiError::validation(
                "Text content is required and must be a string",
            ))
        }
    };

    if text_length(text.trim()) < defaults::MIN_TEXT_CHARS {
        return Err(ApiError::validation(
            "Text content must be at least 10 characters long",
        ));
    }

    if text_length(text) > defaults::MAX_TEXT_CHARS {
        return Err(ApiError::validation(
            "Text content must not exceed 10,000 characters",
        ));
    }

    Ok(text)
}

/// POST /api/analyze
/// Analyzes text content and returns a scored report
pub async fn analyze_text(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalysisData>>, ApiError> {
    let Json(payload) = payload?;
    let text = validate_text(payload.text.as_ref())?;
    let detailed = payload.options.unwrap_or_default().detailed;

    let report = state.ai.analyze_content(text, detailed).await?;

    tracing::debug!(
        factors = report.factors.len(),
        text_length = text_length(text),
        "Text analysis completed"
    );

    let metadata = AnalysisMetadata {
        text_length: Some(text_length(text)),
        image_size: None,
        mime_type: None,
        analyzed_at: timestamp(),
    };

    Ok(Json(ApiResponse::ok(AnalysisData::from_report(report, metadata))))
}

/// Uploaded image pulled out of the multipart form
struct ImageUpload {
    bytes: Vec<u8>,
    mime_type: String,
}

/// POST /api/analyze-image
/// Analyzes an uploaded JPEG/PNG (multipart field `image`) for scams
pub async fn analyze_image(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<ApiResponse<AnalysisData>>, ApiError> {
    let mut multipart = multipart?;
    let mut image: Option<ImageUpload> = None;
    let mut detailed = false;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);

        match name.as_deref() {
            Some("image") => {
                let mime_type = field.content_type().unwrap_or_default().to_ascii_lowercase();
                if !defaults::IMAGE_TYPES.contains(&mime_type.as_str()) {
                    return Err(ApiError::validation(
                        "Only JPG, JPEG, and PNG files are allowed",
                    ));
                }

                let bytes = field.bytes().await?;
                if bytes.len() > defaults::MAX_IMAGE_BYTES {
                    return Err(ApiError::validation("File size must be less than 5MB"));
                }

                image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    mime_type: normalize_mime(&mime_type),
                });
            }
            Some("detailed") => {
                detailed = field.text().await?.trim().eq_ignore_ascii_case("true");
            }
            _ => {}
        }
    }

    let image = image.ok_or_else(|| ApiError::validation("Image file is required"))?;

    let report = state
        .ai
        .analyze_image(&image.bytes, &image.mime_type, detailed)
        .await?;

    tracing::debug!(
        factors = report.factors.len(),
        image_size = image.bytes.len(),
        "Image analysis completed"
    );

    let metadata = AnalysisMetadata {
        text_length: None,
        image_size: Some(image.bytes.len()),
        mime_type: Some(image.mime_type),
        analyzed_at: timestamp(),
    };

    Ok(Json(ApiResponse::ok(AnalysisData::from_report(report, metadata))))
}

/// `image/jpg` is not a registered type; providers expect `image/jpeg`
fn normalize_mime(mime_type: &str) -> String {
    match mime_type {
        "image/jpg" => "image/jpeg".to_string(),
        other => other.to_string(),
    }
}
