use crate::error::RecommenderError;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tracing::{error, info, warn};

lazy_static! {
    static ref JSON_FENCE: Regex =
        Regex::new(r"(?s)```json\s*(.*?)\s*```").expect("fence pattern is valid");
}

/// Return the interior of the first ```json fenced block, if any.
pub fn fenced_json_block(text: &str) -> Option<&str> {
    JSON_FENCE
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .filter(|interior| !interior.is_empty())
}

/// Turn model output into a JSON value: the whole text first, then the first
/// fenced block. No coercion beyond plain JSON parsing.
pub fn parse_model_content(text: &str) -> Result<Value, RecommenderError> {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(direct_err) => {
            warn!(
                "Model content is not plain JSON ({}), looking for a fenced block",
                direct_err
            );
            let interior = fenced_json_block(text).ok_or_else(|| {
                error!("Model content has no fenced JSON block: {}", text);
                RecommenderError::UnrecoverableContent
            })?;

            let value = serde_json::from_str::<Value>(interior).map_err(|e| {
                error!("Fenced JSON block did not parse: {}", e);
                RecommenderError::UnrecoverableContent
            })?;

            info!("Recovered JSON from fenced block");
            Ok(value)
        }
    }
}
