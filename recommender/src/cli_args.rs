use crate::config::{AppEnvironment, DEFAULT_API_URL, DEFAULT_MODEL};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
  name = "anirec-recommender",
  version,
  about = "Anime recommendations from an LLM chat-completion endpoint"
)]
pub struct CliArgs {
  /// API key for the completion endpoint.
  #[arg(long, env = "OPENROUTER_API_KEY", hide_env_values = true)]
  pub api_key: String,

  /// Chat-completions endpoint URL.
  #[arg(long, env = "OPENROUTER_API_URL", default_value = DEFAULT_API_URL)]
  pub api_url: String,

  /// Model identifier to request.
  #[arg(long, env = "OPENROUTER_MODEL", default_value = DEFAULT_MODEL)]
  pub model: String,

  /// Public URL of the calling application, sent as the referer.
  #[arg(long, env = "APP_URL")]
  pub app_url: Option<String>,

  /// Application title sent alongside the referer.
  #[arg(long, env = "APP_TITLE")]
  pub app_title: Option<String>,

  /// Deployment environment (development or production).
  #[arg(long, env = "APP_ENV", default_value = "development")]
  pub app_env: AppEnvironment,

  /// Output format (json or human-readable).
  #[arg(long, env = "OUTPUT", default_value = "human")]
  pub output: String,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
  /// Recommend a few arbitrary existing titles.
  Random,

  /// Recommend titles matching quiz answers.
  Quiz {
    /// Path to the questionnaire TOML file.
    #[arg(long, env = "QUESTIONNAIRE", default_value = "questionnaire.toml")]
    questionnaire: PathBuf,

    /// Answer as field=value; checkbox values are comma separated.
    #[arg(long = "answer", value_name = "FIELD=VALUE")]
    answers: Vec<String>,
  },
}
