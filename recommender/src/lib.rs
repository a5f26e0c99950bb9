pub mod cli_args;
pub mod completion;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod prompt;
pub mod quiz;
pub mod recommendation;
pub mod recovery;
pub mod sanitize;
pub mod schema;

pub use crate::{
    config::RecommenderConfig,
    error::{RecommenderError, RecommenderErrorType},
    pipeline::{BatchSource, IngestedBatch, Recommender},
    prompt::RecommendationRequest,
    recommendation::{RecommendationBatch, RecommendationRecord},
};

use crate::prompt::PromptPair;
use sha2::{Digest, Sha256};

/// Compute SHA256 hash over both prompts of a request
pub fn compute_prompt_hash(prompts: &PromptPair) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prompts.system.as_bytes());
    hasher.update(b"\n");
    hasher.update(prompts.user.as_bytes());
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
