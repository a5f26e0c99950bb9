use crate::{
    completion::{extract_content, CompletionClient},
    config::RecommenderConfig,
    error::RecommenderError,
    prompt::{RecommendationRequest, APPROVED_IMAGE_HOST},
    recommendation::RecommendationBatch,
    recovery::parse_model_content,
    sanitize::{backfill_ai_hints, sanitize_batch},
    schema::validate_batch,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::EnumString;
use tracing::{debug, error, info, warn};
use url::Url;

/// Which acceptance tier produced a batch.
#[derive(Debug, EnumString, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BatchSource {
    Validated,
    Sanitized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IngestedBatch {
    pub batch: RecommendationBatch,
    pub source: BatchSource,
}

/// Strict validation first, then sanitization, then give up. The backfill
/// pass runs on whichever tier succeeded.
pub fn ingest_value(value: &Value) -> Result<IngestedBatch, RecommenderError> {
    let (mut batch, source) = match validate_batch(value) {
        Ok(batch) => {
            info!(
                "Recommendations parsed and validated: {}",
                batch.len()
            );
            (batch, BatchSource::Validated)
        }
        Err(RecommenderError::SchemaValidation(issues)) => {
            for issue in &issues {
                error!("Schema validation issue: {}", issue);
            }
            let batch = sanitize_batch(value).ok_or_else(|| {
                warn!("Validation failed and there is no recommendations array to salvage");
                RecommenderError::Unsalvageable
            })?;
            warn!(
                "Validation failed but a recommendations array exists, using {} sanitized record(s)",
                batch.len()
            );
            (batch, BatchSource::Sanitized)
        }
        Err(e) => return Err(e),
    };

    backfill_ai_hints(&mut batch);
    warn_off_host_covers(&batch);

    Ok(IngestedBatch { batch, source })
}

/// Cover hosts are only restricted in the prompt; flag the ones that slipped
/// through so they show up in logs.
fn warn_off_host_covers(batch: &RecommendationBatch) {
    for record in &batch.recommendations {
        let Some(cover) = record.cover_image.as_deref() else {
            continue;
        };
        let host = Url::parse(cover)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string));
        if host.as_deref() != Some(APPROVED_IMAGE_HOST) {
            warn!(
                "Cover image for \"{}\" is not on {}: {}",
                record.title, APPROVED_IMAGE_HOST, cover
            );
        }
    }
}

/// The ingestion pipeline shared by the quiz and random flows.
#[derive(Debug, Clone)]
pub struct Recommender {
    client: CompletionClient,
}

impl Recommender {
    pub fn new(config: RecommenderConfig) -> Self {
        Self {
            client: CompletionClient::new(config),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        self.client.config()
    }

    /// Run one request through every stage, surfacing the first stage that
    /// gives up.
    pub async fn try_recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<IngestedBatch, RecommenderError> {
        info!("Starting {} recommendation request", request.kind());
        debug!("Request: {:?}", request);

        let prompts = request.prompts();
        let body = self
            .client
            .complete(&prompts, request.generation_params())
            .await?;

        let content = extract_content(&body)?;
        debug!("Model content: {}", content);

        let value = parse_model_content(&content)?;
        ingest_value(&value)
    }

    /// Never fails: any error is logged and becomes an empty batch.
    pub async fn recommend(&self, request: &RecommendationRequest) -> RecommendationBatch {
        match self.try_recommend(request).await {
            Ok(ingested) => ingested.batch,
            Err(e) => {
                error!(
                    "{} recommendation request failed ({}): {}",
                    request.kind(),
                    e.to_error_type(),
                    e
                );
                RecommendationBatch::empty()
            }
        }
    }

    pub async fn request_recommendations(
        &self,
        quiz_answers: Vec<String>,
        preferences: String,
    ) -> RecommendationBatch {
        self.recommend(&RecommendationRequest::Quiz {
            quiz_answers,
            preferences,
        })
        .await
    }

    pub async fn request_random_recommendations(&self) -> RecommendationBatch {
        self.recommend(&RecommendationRequest::Random).await
    }
}
