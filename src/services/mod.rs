pub mod gateway; // Chat-completions AI gateway client
pub mod inference; // Inference seam + error taxonomy

pub use gateway::AiGatewayClient;
pub use inference::{AnalysisError, InferenceService};
