use crate::{error::RecommenderErrorType, pipeline::BatchSource, recommendation::RecommendationBatch};
use serde::{Deserialize, Serialize};

/// Metadata about the request that produced a batch
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecommendationMetadata {
    pub model: String,
    pub prompt_hash: String,
    pub source: BatchSource,
}

/// Error information
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorInfo {
    pub error_type: RecommenderErrorType,
    pub message: String,
}

/// Output format for a successful request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RecommendationOutput {
    pub request: String, // "quiz" or "random"
    pub result: String,  // "recommended"
    #[serde(flatten)]
    pub batch: RecommendationBatch,
    pub metadata: RecommendationMetadata,
}

/// Output format for errors. The batch is always present and empty so
/// consumers can read `recommendations` unconditionally.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ErrorOutput {
    pub request: String,
    pub result: String, // "error"
    #[serde(flatten)]
    pub batch: RecommendationBatch,
    pub error: ErrorInfo,
    pub metadata: Option<PartialMetadata>,
}

/// Partial metadata available even on error
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct PartialMetadata {
    pub model: String,
    pub prompt_hash: String,
}

impl RecommendationOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ErrorOutput {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
