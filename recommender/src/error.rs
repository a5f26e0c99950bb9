use crate::{quiz::QuizIssue, schema::SchemaIssue};
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;
use thiserror::Error;

/// Semantic error types that say which pipeline stage gave up
#[derive(Debug, EnumString, Serialize, Deserialize, Clone, PartialEq)]
#[strum(serialize_all = "PascalCase")]
#[serde(rename_all = "PascalCase")]
pub enum RecommenderErrorType {
    QuestionnaireReadError,
    QuestionnaireParseError,
    InvalidQuizAnswerError,
    QuizValidationError,
    CompletionApiConnectionError,
    CompletionApiError,
    MalformedEnvelopeError,
    UnrecoverableContentError,
    SchemaValidationError,
    UnsalvageableShapeError,
}

impl fmt::Display for RecommenderErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::QuestionnaireReadError => write!(f, "QuestionnaireReadError"),
            Self::QuestionnaireParseError => {
                write!(f, "QuestionnaireParseError")
            }
            Self::InvalidQuizAnswerError => write!(f, "InvalidQuizAnswerError"),
            Self::QuizValidationError => write!(f, "QuizValidationError"),
            Self::CompletionApiConnectionError => {
                write!(f, "CompletionApiConnectionError")
            }
            Self::CompletionApiError => write!(f, "CompletionApiError"),
            Self::MalformedEnvelopeError => write!(f, "MalformedEnvelopeError"),
            Self::UnrecoverableContentError => {
                write!(f, "UnrecoverableContentError")
            }
            Self::SchemaValidationError => write!(f, "SchemaValidationError"),
            Self::UnsalvageableShapeError => {
                write!(f, "UnsalvageableShapeError")
            }
        }
    }
}

/// Internal error type with detailed context
#[derive(Error, Debug)]
pub enum RecommenderError {
    #[error("Completion API returned {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed completion envelope: {0}")]
    MalformedEnvelope(String),

    #[error("Completion envelope is not JSON: {0}")]
    EnvelopeParse(#[from] serde_json::Error),

    #[error("Model content is neither JSON nor a fenced JSON block")]
    UnrecoverableContent,

    #[error("Schema validation failed with {} issue(s)", .0.len())]
    SchemaValidation(Vec<SchemaIssue>),

    #[error("Parsed content has no recommendations array to salvage")]
    Unsalvageable,

    #[error("Questionnaire read error: {0}")]
    QuestionnaireRead(#[from] std::io::Error),

    #[error("Questionnaire parse error: {0}")]
    QuestionnaireParse(#[from] toml::de::Error),

    #[error("Invalid quiz answer: {0}")]
    InvalidAnswer(String),

    #[error("Quiz answers failed validation: {}", format_quiz_issues(.0))]
    QuizValidation(Vec<QuizIssue>),
}

fn format_quiz_issues(issues: &[QuizIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("{}: {}", issue.field_name, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl RecommenderError {
    /// Convert internal error to semantic error type
    pub fn to_error_type(&self) -> RecommenderErrorType {
        match self {
            RecommenderError::Transport { .. } => {
                RecommenderErrorType::CompletionApiError
            }
            RecommenderError::Http(e) => {
                if e.is_connect() || e.is_timeout() {
                    RecommenderErrorType::CompletionApiConnectionError
                } else {
                    RecommenderErrorType::CompletionApiError
                }
            }
            RecommenderError::MalformedEnvelope(_)
            | RecommenderError::EnvelopeParse(_) => {
                RecommenderErrorType::MalformedEnvelopeError
            }
            RecommenderError::UnrecoverableContent => {
                RecommenderErrorType::UnrecoverableContentError
            }
            RecommenderError::SchemaValidation(_) => {
                RecommenderErrorType::SchemaValidationError
            }
            RecommenderError::Unsalvageable => {
                RecommenderErrorType::UnsalvageableShapeError
            }
            RecommenderError::QuestionnaireRead(_) => {
                RecommenderErrorType::QuestionnaireReadError
            }
            RecommenderError::QuestionnaireParse(_) => {
                RecommenderErrorType::QuestionnaireParseError
            }
            RecommenderError::InvalidAnswer(_) => {
                RecommenderErrorType::InvalidQuizAnswerError
            }
            RecommenderError::QuizValidation(_) => {
                RecommenderErrorType::QuizValidationError
            }
        }
    }
}
