use crate::{error::RecommenderError, prompt::RecommendationRequest};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

lazy_static! {
    static ref PARENTHESISED: Regex =
        Regex::new(r"\(.*?\)").expect("parenthesis pattern is valid");
}

const LIKED_BEFORE_PREFIX: &str = "Ранее понравившиеся аниме";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Checkbox,
    Radio,
    Text,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub text: String,
    pub kind: QuestionKind,
    pub field_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub min_selections: Option<usize>,
    #[serde(default)]
    pub max_selections: Option<usize>,
    /// Overrides the generic "choose at least one" message.
    #[serde(default)]
    pub min_message: Option<String>,
    /// Overrides the generic "choose at most N" message.
    #[serde(default)]
    pub max_message: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Questionnaire {
    pub questions: Vec<QuizQuestion>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QuizAnswer {
    Single(String),
    Multiple(Vec<String>),
}

/// Answers keyed by question field name.
pub type QuizResponses = HashMap<String, QuizAnswer>;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QuizIssue {
    pub field_name: String,
    pub message: String,
}

impl Questionnaire {
    pub fn from_toml_str(content: &str) -> Result<Self, RecommenderError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, RecommenderError> {
        info!("Loading questionnaire from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn question(&self, field_name: &str) -> Option<&QuizQuestion> {
        self.questions.iter().find(|q| q.field_name == field_name)
    }

    /// Parse `field=value` pairs. Checkbox values are comma separated.
    pub fn parse_answers(&self, raw: &[String]) -> Result<QuizResponses, RecommenderError> {
        let mut responses = QuizResponses::new();
        for pair in raw {
            let (field, value) = pair.split_once('=').ok_or_else(|| {
                RecommenderError::InvalidAnswer(format!("expected field=value, got {:?}", pair))
            })?;
            let question = self.question(field.trim()).ok_or_else(|| {
                RecommenderError::InvalidAnswer(format!("unknown question field {:?}", field))
            })?;

            let answer = match question.kind {
                QuestionKind::Checkbox => QuizAnswer::Multiple(
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|v| !v.is_empty())
                        .map(str::to_string)
                        .collect(),
                ),
                QuestionKind::Radio | QuestionKind::Text => {
                    QuizAnswer::Single(value.to_string())
                }
            };
            responses.insert(question.field_name.clone(), answer);
        }
        Ok(responses)
    }

    /// Check every question and report all problems at once.
    pub fn validate(&self, responses: &QuizResponses) -> Vec<QuizIssue> {
        let mut issues = Vec::new();
        for question in &self.questions {
            if let Some(message) = question.check(responses.get(&question.field_name)) {
                issues.push(QuizIssue {
                    field_name: question.field_name.clone(),
                    message,
                });
            }
        }
        issues
    }

    /// Turn answers into a quiz request: one answer string per answered
    /// question plus a sentence-per-question preference summary.
    pub fn summarize(&self, responses: &QuizResponses) -> RecommendationRequest {
        let mut quiz_answers = Vec::new();
        let mut preference_parts = Vec::new();

        for question in &self.questions {
            let answer = match (question.kind, responses.get(&question.field_name)) {
                (QuestionKind::Checkbox, Some(QuizAnswer::Multiple(values)))
                    if !values.is_empty() =>
                {
                    values.join(", ")
                }
                (QuestionKind::Radio, Some(QuizAnswer::Single(value))) => value.clone(),
                (QuestionKind::Text, Some(QuizAnswer::Single(value))) => {
                    value.trim().to_string()
                }
                _ => continue,
            };
            if answer.is_empty() {
                continue;
            }

            let sentence = match question.kind {
                QuestionKind::Text => format!("{}: {}.", LIKED_BEFORE_PREFIX, answer),
                _ => format!("{}: {}.", question.summary_label(), answer),
            };
            quiz_answers.push(answer);
            preference_parts.push(sentence);
        }

        RecommendationRequest::Quiz {
            quiz_answers,
            preferences: preference_parts.join(" "),
        }
    }
}

impl QuizQuestion {
    /// Question text with any parenthesised hints removed.
    pub fn summary_label(&self) -> String {
        PARENTHESISED.replace_all(&self.text, "").trim().to_string()
    }

    fn min_required(&self) -> usize {
        self.min_selections
            .unwrap_or(if self.required { 1 } else { 0 })
    }

    /// Report the first value not among the listed options. Questions
    /// without options accept anything.
    fn check_options<'a>(&self, values: impl IntoIterator<Item = &'a String>) -> Option<String> {
        if self.options.is_empty() {
            return None;
        }
        values
            .into_iter()
            .find(|value| !self.options.contains(value))
            .map(|value| {
                format!(
                    "Недопустимый вариант \"{}\". Допустимые варианты: {}.",
                    value,
                    self.options.join(", ")
                )
            })
    }

    fn check(&self, answer: Option<&QuizAnswer>) -> Option<String> {
        match self.kind {
            QuestionKind::Checkbox => {
                let values: Vec<&String> = match answer {
                    Some(QuizAnswer::Multiple(values)) => values.iter().collect(),
                    Some(QuizAnswer::Single(value)) if !value.is_empty() => vec![value],
                    _ => Vec::new(),
                };
                if values.len() < self.min_required() {
                    return Some(self.min_message.clone().unwrap_or_else(|| {
                        "Пожалуйста, выберите хотя бы один вариант.".to_string()
                    }));
                }
                if let Some(max) = self.max_selections {
                    if values.len() > max {
                        return Some(self.max_message.clone().unwrap_or_else(|| {
                            format!("Пожалуйста, выберите не более {} вариантов.", max)
                        }));
                    }
                }
                self.check_options(values)
            }
            QuestionKind::Radio => match answer {
                Some(QuizAnswer::Single(value)) if !value.is_empty() => {
                    self.check_options([value])
                }
                _ if self.required => Some("Пожалуйста, выберите вариант.".to_string()),
                _ => None,
            },
            QuestionKind::Text => match answer {
                Some(QuizAnswer::Single(value)) if !value.trim().is_empty() => None,
                _ if self.required => {
                    Some("Это поле обязательно для заполнения.".to_string())
                }
                _ => None,
            },
        }
    }
}
