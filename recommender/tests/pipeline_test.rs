use anirec_recommender::{
    error::RecommenderError,
    pipeline::BatchSource,
    sanitize::{FALLBACK_AI_HINT, TITLE_PLACEHOLDER},
    RecommendationBatch, RecommendationRequest, Recommender, RecommenderConfig,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{body_partial_json, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";

/// Build a recommender pointed at the mock completion endpoint
fn recommender_for(mock_server: &MockServer) -> Recommender {
    let config = RecommenderConfig::new("test-key")
        .with_api_url(format!("{}{}", mock_server.uri(), COMPLETIONS_PATH))
        .with_referer("https://anirec.example")
        .with_app_title("AniRec Test");
    Recommender::new(config)
}

/// Wrap model content in a chat-completions envelope
fn envelope(content: &str) -> Value {
    json!({
        "id": "gen-123",
        "choices": [
            {
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }
        ]
    })
}

async fn mount_content(mock_server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(content)))
        .expect(1)
        .mount(mock_server)
        .await;
}

fn quiz_request() -> RecommendationRequest {
    RecommendationRequest::Quiz {
        quiz_answers: vec!["Экшен, Фэнтези".to_string(), "Сериал".to_string()],
        preferences: "Любимые жанры: Экшен, Фэнтези.".to_string(),
    }
}

#[tokio::test]
async fn test_quiz_request_sends_expected_headers_and_body() {
    let mock_server = MockServer::start().await;

    let content = json!({
        "recommendations": [
            {
                "title": "Стальной алхимик: Братство",
                "genre": "Экшен, Фэнтези",
                "synopsis": "Братья ищут философский камень.",
                "coverImage": "https://media.kitsu.app/anime/poster_images/3936/medium.jpg",
                "dataAiHint": "alchemy adventure",
                "episodes": "64",
                "status": "Завершён",
                "ageRating": "R - 17+",
                "detailsLink": "https://kitsu.io/anime/fullmetal-alchemist-brotherhood",
                "kitsuApprovalRating": "91%"
            }
        ]
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("HTTP-Referer", "https://anirec.example"))
        .and(header("X-Title", "AniRec Test"))
        .and(body_partial_json(json!({
            "model": "deepseek/deepseek-chat",
            "response_format": {"type": "json_object"},
            "temperature": 0.7,
            "max_tokens": 1800
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&content)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let recommender = recommender_for(&mock_server);
    let ingested = recommender
        .try_recommend(&quiz_request())
        .await
        .expect("Recommendation should succeed");

    assert_eq!(ingested.source, BatchSource::Validated);
    assert_eq!(ingested.batch.len(), 1);
    let record = &ingested.batch.recommendations[0];
    assert_eq!(record.title, "Стальной алхимик: Братство");
    assert_eq!(record.kitsu_approval_rating.as_deref(), Some("91%"));

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][1]["role"], "user");
    assert!(body["messages"][1]["content"]
        .as_str()
        .unwrap()
        .contains("Ответы на опрос: Экшен, Фэнтези; Сериал"));
}

#[tokio::test]
async fn test_random_request_uses_random_generation_params() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .and(body_partial_json(json!({
            "temperature": 0.9,
            "max_tokens": 1500
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(envelope(r#"{"recommendations": []}"#)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let batch = recommender_for(&mock_server)
        .request_random_recommendations()
        .await;

    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_fenced_content_is_recovered() {
    let mock_server = MockServer::start().await;
    mount_content(
        &mock_server,
        "```json\n{\"recommendations\":[{\"title\":\"A\",\"genre\":\"G\",\"synopsis\":\"S\",\"dataAiHint\":\"h\"}]}\n```",
    )
    .await;

    let batch = recommender_for(&mock_server)
        .request_recommendations(vec![], String::new())
        .await;

    assert_eq!(batch.len(), 1);
    assert_eq!(batch.recommendations[0].title, "A");
}

#[tokio::test]
async fn test_server_error_yields_empty_batch_without_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let recommender = recommender_for(&mock_server);
    let batch = recommender.request_random_recommendations().await;
    assert_eq!(batch, RecommendationBatch::empty());

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&mock_server)
        .await;

    let err = recommender_for(&mock_server)
        .try_recommend(&RecommendationRequest::Random)
        .await
        .unwrap_err();

    match err {
        RecommenderError::Transport { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "invalid key");
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_envelope_yields_empty_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&mock_server)
        .await;

    let recommender = recommender_for(&mock_server);
    let err = recommender
        .try_recommend(&RecommendationRequest::Random)
        .await
        .unwrap_err();
    assert!(matches!(err, RecommenderError::MalformedEnvelope(_)));

    let batch = recommender.request_random_recommendations().await;
    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_non_json_body_yields_empty_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
        .mount(&mock_server)
        .await;

    let batch = recommender_for(&mock_server)
        .request_random_recommendations()
        .await;
    assert!(batch.is_empty());
}

#[tokio::test]
async fn test_prose_content_yields_empty_batch() {
    let mock_server = MockServer::start().await;
    mount_content(&mock_server, "Извините, я не могу помочь с этим.").await;

    let err = recommender_for(&mock_server)
        .try_recommend(&quiz_request())
        .await
        .unwrap_err();
    assert!(matches!(err, RecommenderError::UnrecoverableContent));
}

#[tokio::test]
async fn test_unsalvageable_shape_yields_empty_batch() {
    let mock_server = MockServer::start().await;
    mount_content(&mock_server, r#"{"foo": "bar"}"#).await;

    let batch = recommender_for(&mock_server)
        .request_recommendations(vec!["Драма".to_string()], "Драма.".to_string())
        .await;

    assert_eq!(batch, RecommendationBatch::empty());
}

#[tokio::test]
async fn test_invalid_records_are_sanitized() {
    let mock_server = MockServer::start().await;

    let content = json!({
        "recommendations": [
            {
                "title": "Клинок, рассекающий демонов",
                "genre": "Экшен",
                "synopsis": "Юноша становится охотником на демонов.",
                "coverImage": "not-a-url",
                "episodes": 26,
                "status": "Завершён"
            },
            {
                "title": null,
                "genre": "Комедия",
                "synopsis": "Что-то смешное.",
                "dataAiHint": "comedy",
                "detailsLink": "https://anilist.co/anime/1"
            }
        ]
    })
    .to_string();
    mount_content(&mock_server, &content).await;

    let ingested = recommender_for(&mock_server)
        .try_recommend(&RecommendationRequest::Random)
        .await
        .expect("Sanitization should salvage the batch");

    assert_eq!(ingested.source, BatchSource::Sanitized);
    assert_eq!(ingested.batch.len(), 2);

    let first = &ingested.batch.recommendations[0];
    assert_eq!(first.cover_image, None);
    assert_eq!(first.episodes, None);
    assert_eq!(first.status.as_deref(), Some("Завершён"));
    assert_eq!(first.data_ai_hint, "клинок, рассекающий");

    let second = &ingested.batch.recommendations[1];
    assert_eq!(second.title, TITLE_PLACEHOLDER);
    assert_eq!(second.data_ai_hint, "comedy");
    assert_eq!(second.details_link.as_deref(), Some("https://anilist.co/anime/1"));
}

#[tokio::test]
async fn test_every_emitted_record_has_ai_hint() {
    let mock_server = MockServer::start().await;

    let content = json!({
        "recommendations": [
            {"title": "Ghost in the Shell", "genre": "G", "synopsis": "S", "dataAiHint": " "},
            {"title": "", "genre": "G", "synopsis": "S", "dataAiHint": "\t"},
            {"title": "Akira", "genre": "G", "synopsis": "S", "dataAiHint": "cyberpunk"}
        ]
    })
    .to_string();
    mount_content(&mock_server, &content).await;

    let batch = recommender_for(&mock_server)
        .request_random_recommendations()
        .await;

    assert_eq!(batch.len(), 3);
    assert_eq!(batch.recommendations[0].data_ai_hint, "ghost in the shell");
    assert_eq!(batch.recommendations[1].data_ai_hint, FALLBACK_AI_HINT);
    assert_eq!(batch.recommendations[2].data_ai_hint, "cyberpunk");
    for record in &batch.recommendations {
        assert!(!record.data_ai_hint.trim().is_empty());
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_empty_batch() {
    // Nothing listens on port 9 locally
    let config = RecommenderConfig::new("test-key").with_api_url("http://127.0.0.1:9/v1/chat/completions");
    let recommender = Recommender::new(config);

    let err = recommender
        .try_recommend(&RecommendationRequest::Random)
        .await
        .unwrap_err();
    assert!(matches!(err, RecommenderError::Http(_)));

    assert!(recommender.request_random_recommendations().await.is_empty());
}
