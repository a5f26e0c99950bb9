use crate::recommendation::{RecommendationBatch, RecommendationRecord};
use serde_json::{Map, Value};
use tracing::warn;

pub const TITLE_PLACEHOLDER: &str = "Название отсутствует";
pub const GENRE_PLACEHOLDER: &str = "Жанр отсутствует";
pub const SYNOPSIS_PLACEHOLDER: &str = "Описание отсутствует";
pub const FALLBACK_AI_HINT: &str = "anime art";

const AI_HINT_TITLE_CHARS: usize = 20;

/// Build a placeholder label from a title: first 20 characters, trimmed,
/// lower-cased, runs of whitespace collapsed to one space.
pub fn derive_ai_hint(title: &str) -> String {
    let prefix: String = title.chars().take(AI_HINT_TITLE_CHARS).collect();
    let hint = prefix
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if hint.is_empty() {
        FALLBACK_AI_HINT.to_string()
    } else {
        hint
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn http_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    string_field(obj, key).filter(|value| value.starts_with("http"))
}

/// Rebuild one record from whatever the model sent, keeping only well-typed
/// values. Anything that is not an object is treated as an empty one.
pub fn sanitize_record(element: &Value) -> RecommendationRecord {
    let empty = Map::new();
    let obj = element.as_object().unwrap_or(&empty);

    let title = string_field(obj, "title");
    let data_ai_hint = string_field(obj, "dataAiHint")
        .map(|hint| hint.trim().to_string())
        .filter(|hint| !hint.is_empty())
        .unwrap_or_else(|| derive_ai_hint(title.as_deref().unwrap_or("")));

    RecommendationRecord {
        title: title.unwrap_or_else(|| TITLE_PLACEHOLDER.to_string()),
        genre: string_field(obj, "genre").unwrap_or_else(|| GENRE_PLACEHOLDER.to_string()),
        synopsis: string_field(obj, "synopsis")
            .unwrap_or_else(|| SYNOPSIS_PLACEHOLDER.to_string()),
        cover_image: http_field(obj, "coverImage"),
        data_ai_hint,
        episodes: string_field(obj, "episodes"),
        status: string_field(obj, "status"),
        age_rating: string_field(obj, "ageRating"),
        details_link: http_field(obj, "detailsLink"),
        kitsu_approval_rating: string_field(obj, "kitsuApprovalRating"),
    }
}

/// Salvage a payload that failed strict validation. Returns `None` when there
/// is no `recommendations` array to work with.
pub fn sanitize_batch(value: &Value) -> Option<RecommendationBatch> {
    let elements = value.get("recommendations")?.as_array()?;

    Some(RecommendationBatch {
        recommendations: elements.iter().map(sanitize_record).collect(),
    })
}

/// Make sure every record carries a non-blank `dataAiHint`.
pub fn backfill_ai_hints(batch: &mut RecommendationBatch) {
    for record in &mut batch.recommendations {
        if record.data_ai_hint.trim().is_empty() {
            warn!(
                "Recommendation \"{}\" has no dataAiHint, deriving one from the title",
                record.title
            );
            record.data_ai_hint = derive_ai_hint(&record.title);
        }
    }
}
