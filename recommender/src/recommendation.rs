use serde::{Deserialize, Serialize};

/// A single recommended anime as handed to the UI layer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationRecord {
    pub title: String,
    /// Comma-joined genre labels.
    pub genre: String,
    pub synopsis: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Placeholder label shown when no cover renders. Never blank once a
    /// record leaves the pipeline.
    pub data_ai_hint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episodes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details_link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kitsu_approval_rating: Option<String>,
}

/// Everything returned for one request, in the order the model produced it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RecommendationBatch {
    pub recommendations: Vec<RecommendationRecord>,
}

impl RecommendationBatch {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recommendations.len()
    }
}
