use crate::{
    error::RecommenderError,
    recommendation::{RecommendationBatch, RecommendationRecord},
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use url::Url;

/// One reason a payload failed strict validation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SchemaIssue {
    pub path: String,
    pub message: String,
}

impl fmt::Display for SchemaIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Default)]
struct IssueCollector {
    issues: Vec<SchemaIssue>,
}

impl IssueCollector {
    fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.issues.push(SchemaIssue {
            path: path.into(),
            message: message.into(),
        });
    }

    fn required_string(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> String {
        match obj.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                self.push(
                    format!("{}.{}", path, key),
                    format!("expected string, received {}", type_name(other)),
                );
                String::new()
            }
            None => {
                self.push(format!("{}.{}", path, key), "required");
                String::new()
            }
        }
    }

    fn optional_string(
        &mut self,
        obj: &Map<String, Value>,
        path: &str,
        key: &str,
    ) -> Option<String> {
        match obj.get(key) {
            None => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.push(
                    format!("{}.{}", path, key),
                    format!("expected string, received {}", type_name(other)),
                );
                None
            }
        }
    }

    fn optional_url(&mut self, obj: &Map<String, Value>, path: &str, key: &str) -> Option<String> {
        let value = self.optional_string(obj, path, key)?;
        if Url::parse(&value).is_err() {
            self.push(format!("{}.{}", path, key), "invalid url");
            return None;
        }
        Some(value)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn validate_record(
    collector: &mut IssueCollector,
    index: usize,
    element: &Value,
) -> Option<RecommendationRecord> {
    let path = format!("recommendations[{}]", index);
    let Value::Object(obj) = element else {
        collector.push(
            path,
            format!("expected object, received {}", type_name(element)),
        );
        return None;
    };

    let before = collector.issues.len();
    let title = collector.required_string(obj, &path, "title");
    let genre = collector.required_string(obj, &path, "genre");
    let synopsis = collector.required_string(obj, &path, "synopsis");
    let data_ai_hint = collector.required_string(obj, &path, "dataAiHint");
    if matches!(obj.get("dataAiHint"), Some(Value::String(s)) if s.is_empty()) {
        collector.push(format!("{}.dataAiHint", path), "must contain at least 1 character");
    }

    let record = RecommendationRecord {
        title,
        genre,
        synopsis,
        cover_image: collector.optional_url(obj, &path, "coverImage"),
        data_ai_hint,
        episodes: collector.optional_string(obj, &path, "episodes"),
        status: collector.optional_string(obj, &path, "status"),
        age_rating: collector.optional_string(obj, &path, "ageRating"),
        details_link: collector.optional_url(obj, &path, "detailsLink"),
        kitsu_approval_rating: collector.optional_string(obj, &path, "kitsuApprovalRating"),
    };

    (collector.issues.len() == before).then_some(record)
}

/// Strict acceptance check. Every issue in the payload is reported, not just
/// the first. Unknown keys are ignored; optional fields must be absent or a
/// string, never `null`.
pub fn validate_batch(value: &Value) -> Result<RecommendationBatch, RecommenderError> {
    let mut collector = IssueCollector::default();

    let Value::Object(root) = value else {
        collector.push(
            "",
            format!("expected object, received {}", type_name(value)),
        );
        return Err(RecommenderError::SchemaValidation(collector.issues));
    };

    let elements = match root.get("recommendations") {
        Some(Value::Array(elements)) => elements,
        Some(other) => {
            collector.push(
                "recommendations",
                format!("expected array, received {}", type_name(other)),
            );
            return Err(RecommenderError::SchemaValidation(collector.issues));
        }
        None => {
            collector.push("recommendations", "required");
            return Err(RecommenderError::SchemaValidation(collector.issues));
        }
    };

    let records: Vec<RecommendationRecord> = elements
        .iter()
        .enumerate()
        .filter_map(|(index, element)| validate_record(&mut collector, index, element))
        .collect();

    if !collector.issues.is_empty() {
        return Err(RecommenderError::SchemaValidation(collector.issues));
    }

    Ok(RecommendationBatch {
        recommendations: records,
    })
}
