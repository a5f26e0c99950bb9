use anirec_common::logging::{init_logging, redact_secret};
use anirec_recommender::{
    cli_args::{CliArgs, Command},
    compute_prompt_hash,
    config::{resolve_app_title, resolve_referer},
    error::RecommenderError,
    output::{ErrorInfo, ErrorOutput, PartialMetadata, RecommendationMetadata, RecommendationOutput},
    quiz::Questionnaire,
    RecommendationBatch, RecommendationRequest, Recommender, RecommenderConfig,
};
use clap::Parser;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging();

    let args = CliArgs::parse();

    info!("Starting AniRec Recommender");
    info!("API URL: {}", args.api_url);
    info!("API key: {}", redact_secret(&args.api_key));
    info!("Model: {}", args.model);
    info!("Output format: {}", args.output);

    let result = run_request(&args).await;

    match args.output.as_str() {
        "json" => {
            // JSON output - always produce valid JSON
            let json = match result {
                Ok(output) => output.to_json().unwrap_or_else(|e| {
                    error!("Failed to serialize output: {}", e);
                    r#"{"recommendations": []}"#.to_string()
                }),
                Err(error_output) => error_output.to_json().unwrap_or_else(|e| {
                    error!("Failed to serialize error output: {}", e);
                    r#"{"recommendations": []}"#.to_string()
                }),
            };
            println!("{}", json);
        }
        _ => match result {
            Ok(output) => print_human(&output),
            Err(error_output) => {
                eprintln!("Recommendation Error:");
                eprintln!("  Request: {}", error_output.request);
                eprintln!("  Error Type: {}", error_output.error.error_type);
                eprintln!("  Message: {}", error_output.error.message);
                std::process::exit(1);
            }
        },
    }
}

fn print_human(output: &RecommendationOutput) {
    if output.batch.is_empty() {
        println!("No recommendations found.");
        return;
    }

    println!("Recommendations ({}):", output.request);
    for (index, record) in output.batch.recommendations.iter().enumerate() {
        println!();
        println!("{}. {}", index + 1, record.title);
        println!("   Genre: {}", record.genre);
        println!("   Synopsis: {}", record.synopsis);
        for (label, value) in [
            ("Episodes", &record.episodes),
            ("Status", &record.status),
            ("Age Rating", &record.age_rating),
            ("Kitsu Rating", &record.kitsu_approval_rating),
            ("Cover", &record.cover_image),
            ("Details", &record.details_link),
        ] {
            if let Some(value) = value {
                println!("   {}: {}", label, value);
            }
        }
        println!("   Hint: {}", record.data_ai_hint);
    }
    println!();
    println!("Source: {:?}", output.metadata.source);
    println!("Model: {}", output.metadata.model);
    println!("Prompt Hash: {}", output.metadata.prompt_hash);
}

fn error_output(
    request: &str,
    err: &RecommenderError,
    metadata: Option<PartialMetadata>,
) -> ErrorOutput {
    ErrorOutput {
        request: request.to_string(),
        result: "error".to_string(),
        batch: RecommendationBatch::empty(),
        error: ErrorInfo {
            error_type: err.to_error_type(),
            message: err.to_string(),
        },
        metadata,
    }
}

fn build_request(command: &Command) -> Result<RecommendationRequest, RecommenderError> {
    match command {
        Command::Random => Ok(RecommendationRequest::Random),
        Command::Quiz {
            questionnaire,
            answers,
        } => {
            let questionnaire = Questionnaire::load(questionnaire)?;
            let responses = questionnaire.parse_answers(answers)?;
            let issues = questionnaire.validate(&responses);
            if !issues.is_empty() {
                return Err(RecommenderError::QuizValidation(issues));
            }
            Ok(questionnaire.summarize(&responses))
        }
    }
}

async fn run_request(args: &CliArgs) -> Result<RecommendationOutput, ErrorOutput> {
    let request_kind = match args.command {
        Command::Random => "random",
        Command::Quiz { .. } => "quiz",
    };

    let request = build_request(&args.command).map_err(|e| {
        error!("Failed to build {} request: {}", request_kind, e);
        error_output(request_kind, &e, None)
    })?;

    let config = RecommenderConfig::new(args.api_key.clone())
        .with_api_url(args.api_url.clone())
        .with_model(args.model.clone())
        .with_referer(resolve_referer(args.app_url.as_deref(), args.app_env))
        .with_app_title(resolve_app_title(args.app_title.as_deref()));

    let prompt_hash = compute_prompt_hash(&request.prompts());
    info!("Prompt hash: {}", prompt_hash);

    let recommender = Recommender::new(config);
    let ingested = recommender.try_recommend(&request).await.map_err(|e| {
        error!("Failed to get recommendations: {}", e);
        error_output(
            request_kind,
            &e,
            Some(PartialMetadata {
                model: args.model.clone(),
                prompt_hash: prompt_hash.clone(),
            }),
        )
    })?;

    info!(
        "Recommendations complete: {} record(s), source={:?}",
        ingested.batch.len(),
        ingested.source
    );

    Ok(RecommendationOutput {
        request: request_kind.to_string(),
        result: "recommended".to_string(),
        batch: ingested.batch,
        metadata: RecommendationMetadata {
            model: args.model.clone(),
            prompt_hash,
            source: ingested.source,
        },
    })
}
