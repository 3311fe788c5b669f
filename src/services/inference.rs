use thiserror::Error;

/// Everything that can go wrong between accepting an image and handing the
/// caller a structured result. Each variant maps to one stable wire code;
/// unparsable model *content* is not in here on purpose (the handler absorbs
/// it into a degraded result instead).
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No image data provided")]
    MissingInput,

    #[error("AI gateway credential is not configured")]
    Configuration,

    #[error("Rate limit exceeded. Please try again in a moment.")]
    RateLimited,

    #[error("AI service quota exceeded. Please contact support.")]
    QuotaExceeded,

    #[error("Failed to analyze image: {0}")]
    Inference(String),

    #[error("No response from AI model")]
    EmptyResponse,
}

impl AnalysisError {
    /// Stable machine-readable code for the error payload.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::MissingInput => "missing_input",
            AnalysisError::Configuration => "configuration",
            AnalysisError::RateLimited => "rate_limited",
            AnalysisError::QuotaExceeded => "quota_exceeded",
            AnalysisError::Inference(_) => "inference_failed",
            AnalysisError::EmptyResponse => "empty_response",
        }
    }

    /// Extra hint shown to the user alongside the message, where one helps.
    pub fn details(&self) -> Option<&'static str> {
        match self {
            AnalysisError::MissingInput => {
                Some("Please resubmit with a photo of the item.")
            }
            AnalysisError::Inference(_) | AnalysisError::EmptyResponse => {
                Some("Please try again with a clear photo of recyclable materials.")
            }
            _ => None,
        }
    }
}

/// Trait for multimodal inference backends (AI gateway in production, mocks
/// in tests). Takes the prompt pair plus the image as a data URI and returns
/// the model's raw text reply.
#[async_trait::async_trait]
pub trait InferenceService: Send + Sync {
    async fn describe_image(
        &self,
        system_prompt: &str,
        instruction: &str,
        image_url: &str,
    ) -> Result<String, AnalysisError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_distinct_and_stable() {
        let errors = [
            AnalysisError::MissingInput,
            AnalysisError::Configuration,
            AnalysisError::RateLimited,
            AnalysisError::QuotaExceeded,
            AnalysisError::Inference("boom".to_string()),
            AnalysisError::EmptyResponse,
        ];

        let codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        let mut deduped = codes.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), codes.len());

        assert_eq!(AnalysisError::RateLimited.code(), "rate_limited");
        assert_eq!(AnalysisError::QuotaExceeded.code(), "quota_exceeded");
        assert_eq!(
            AnalysisError::Inference(String::new()).code(),
            "inference_failed"
        );
    }
}
