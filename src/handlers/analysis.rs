use base64::{engine::general_purpose, Engine};
use std::sync::Arc;

use crate::models::{AnalysisResult, MaterialRecord};
use crate::services::{AnalysisError, InferenceService};

/// Schema instructions sent as the system message. The parser below relies
/// on the model following this shape, so the field names here are the same
/// ones `MaterialRecord` deserializes.
const SYSTEM_PROMPT: &str = r#"You are an expert recycling assistant. Analyze images of materials and provide:
1. Identified materials (be specific, e.g., "plastic water bottle", "cardboard box")
2. Recyclability status (Recyclable, Not Recyclable, or Conditionally Recyclable)
3. Specific recycling instructions for each material
4. Any preparation steps needed (cleaning, removing labels, etc.)
5. Environmental impact notes

Format your response as JSON with this structure:
{
  "materials": [
    {
      "name": "material name",
      "type": "plastic/paper/metal/glass/organic/other",
      "recyclable": "yes/no/conditional",
      "instructions": "detailed recycling instructions",
      "preparation": "preparation steps",
      "binType": "which bin to use",
      "notes": "additional environmental notes"
    }
  ],
  "summary": "brief overall recycling guidance"
}"#;

const USER_INSTRUCTION: &str =
    "Please identify all recyclable materials in this image and provide detailed recycling instructions.";

/// The boundary between image submission and the inference provider: one
/// stateless request/response transform per call, no retries, no retained
/// session state.
pub struct AnalysisHandler {
    inference: Arc<dyn InferenceService>,
}

impl AnalysisHandler {
    pub fn new(inference: Arc<dyn InferenceService>) -> Self {
        Self { inference }
    }

    pub async fn analyze(&self, image_data: &str) -> Result<AnalysisResult, AnalysisError> {
        if image_data.trim().is_empty() {
            log::warn!("⚠️ Analysis request rejected: no image data provided");
            return Err(AnalysisError::MissingInput);
        }

        log::info!("📸 Analyzing image for recyclable materials...");

        let image_url = normalize_image_payload(image_data);
        let content = self
            .inference
            .describe_image(SYSTEM_PROMPT, USER_INSTRUCTION, &image_url)
            .await?;

        log::info!("✅ Successfully analyzed image ({} bytes of reply)", content.len());

        Ok(parse_reply(&content))
    }
}

/// Accept either a ready-made data URI or bare base64 image bytes; bare
/// payloads get wrapped with a MIME type sniffed from the leading bytes.
fn normalize_image_payload(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("data:") {
        trimmed.to_string()
    } else {
        format!("data:{};base64,{}", detect_image_mime(trimmed), trimmed)
    }
}

/// Magic-number sniff over the decoded head of a base64 payload.
/// Unknown or undecodable payloads fall back to image/jpeg.
fn detect_image_mime(payload: &str) -> &'static str {
    // 24 base64 chars decode to 18 bytes, enough for every magic we check
    let head_len = payload.len().min(24) & !3;
    let head = match general_purpose::STANDARD.decode(&payload.as_bytes()[..head_len]) {
        Ok(bytes) => bytes,
        Err(_) => return "image/jpeg",
    };

    if head.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if head.starts_with(b"GIF8") {
        "image/gif"
    } else if head.starts_with(b"RIFF") && head.len() >= 12 && &head[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Models often wrap JSON in a markdown fence. Prefer a ```json block, then
/// an untagged ``` block, otherwise hand back the whole trimmed reply.
fn extract_json_candidate(content: &str) -> &str {
    for tag in ["```json", "```"] {
        if let Some(start) = content.find(tag) {
            let interior = &content[start + tag.len()..];
            if let Some(end) = interior.find("```") {
                return interior[..end].trim();
            }
        }
    }
    content.trim()
}

/// Coerce the model's reply into the result schema. A reply that fails to
/// parse in every extraction form becomes a degraded single-record result
/// carrying the raw text, never an error.
fn parse_reply(content: &str) -> AnalysisResult {
    let candidate = extract_json_candidate(content);

    match serde_json::from_str::<AnalysisResult>(candidate) {
        Ok(result) => result,
        Err(e) => {
            log::warn!("⚠️ Failed to parse structured reply ({}), returning raw analysis text", e);
            fallback_result(content)
        }
    }
}

fn fallback_result(content: &str) -> AnalysisResult {
    AnalysisResult {
        materials: vec![MaterialRecord {
            name: "Analysis Result".to_string(),
            material_type: "other".to_string(),
            recyclable: "conditional".to_string(),
            instructions: content.to_string(),
            preparation: "See instructions".to_string(),
            bin_type: "See instructions".to_string(),
            notes: "Please review the full analysis above".to_string(),
        }],
        summary: "Unable to parse structured response. See details above.".to_string(),
    }
}
