//! Tests for the provider HTTP clients
//! Uses wiremock to mock the Ollama and OpenAI-compatible APIs

use vox_polish::provider::{OllamaClient, OpenAiClient, ProviderKind, ProviderTarget};
use vox_polish::{EnhanceError, ProviderClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn ollama_target(base_url: &str) -> ProviderTarget {
    ProviderTarget {
        kind: ProviderKind::Ollama,
        base_url: base_url.to_string(),
        model: "llama3.2".to_string(),
        api_key: None,
    }
}

fn openai_target(base_url: &str, key: Option<&str>) -> ProviderTarget {
    ProviderTarget {
        kind: ProviderKind::OpenAi,
        base_url: base_url.to_string(),
        model: "gpt-4o-mini".to_string(),
        api_key: key.map(str::to_string),
    }
}

// ========================================================================
// Ollama
// ========================================================================

#[tokio::test]
async fn test_ollama_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_partial_json(serde_json::json!({
            "model": "llama3.2",
            "stream": false
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": "enhanced text"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    let result = client
        .generate(&ollama_target(&server.uri()), "fix it", "raw text")
        .await;

    assert_eq!(result.unwrap(), "enhanced text");
}

#[tokio::test]
async fn test_ollama_generate_server_error_is_custom() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model exploded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    let err = client
        .generate(&ollama_target(&server.uri()), "fix it", "raw text")
        .await
        .unwrap_err();

    match err {
        EnhanceError::Custom(msg) => assert!(msg.contains("model exploded")),
        other => panic!("expected Custom, got {:?}", other),
    }
}

#[tokio::test]
async fn test_ollama_generate_malformed_body_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    let err = client
        .generate(&ollama_target(&server.uri()), "fix it", "raw text")
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_ollama_generate_connection_refused_is_network() {
    // port 9 is discard; nothing listens there
    let client = OllamaClient::new(reqwest::Client::new());
    let err = client
        .generate(&ollama_target("http://127.0.0.1:9"), "fix it", "raw text")
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::Network(_)));
}

#[tokio::test]
async fn test_ollama_generate_timeout_is_network() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": "too late"}))
                .set_delay(std::time::Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::with_request_timeout(
        reqwest::Client::new(),
        std::time::Duration::from_millis(50),
    );
    let err = client
        .generate(&ollama_target(&server.uri()), "fix it", "raw text")
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::Network(_)));
}

#[tokio::test]
async fn test_ollama_list_models() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tags"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "llama3.2"}, {"name": "qwen2.5"}]
        })))
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    let models = client.list_models(&ollama_target(&server.uri())).await.unwrap();
    assert_eq!(models, vec!["llama3.2".to_string(), "qwen2.5".to_string()]);
}

#[tokio::test]
async fn test_ollama_check_connection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Ollama is running"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    assert!(client.check_connection(&ollama_target(&server.uri())).await);
    assert!(
        !client
            .check_connection(&ollama_target("http://127.0.0.1:9"))
            .await
    );
}

#[tokio::test]
async fn test_ollama_check_connection_rejects_http_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = OllamaClient::new(reqwest::Client::new());
    assert!(!client.check_connection(&ollama_target(&server.uri())).await);
}

// ========================================================================
// OpenAI-compatible
// ========================================================================

#[tokio::test]
async fn test_openai_generate_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "enhanced text"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new(reqwest::Client::new());
    let result = client
        .generate(
            &openai_target(&server.uri(), Some("sk-test")),
            "fix it",
            "raw text",
        )
        .await;

    assert_eq!(result.unwrap(), "enhanced text");
}

#[tokio::test]
async fn test_openai_generate_without_key_is_not_configured() {
    let client = OpenAiClient::new(reqwest::Client::new());
    let err = client
        .generate(&openai_target("http://127.0.0.1:9", None), "fix it", "raw")
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::NotConfigured));
}

#[tokio::test]
async fn test_openai_unauthorized_is_not_configured() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(reqwest::Client::new());
    let err = client
        .generate(
            &openai_target(&server.uri(), Some("sk-bad")),
            "fix it",
            "raw",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::NotConfigured));
}

#[tokio::test]
async fn test_openai_empty_choices_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new(reqwest::Client::new());
    let err = client
        .generate(
            &openai_target(&server.uri(), Some("sk-test")),
            "fix it",
            "raw",
        )
        .await
        .unwrap_err();

    assert!(matches!(err, EnhanceError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_openai_verify_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/models"))
        .and(header("Authorization", "Bearer sk-good"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": []})))
        .mount(&server)
        .await;

    let client = OpenAiClient::new(reqwest::Client::new());
    assert!(
        client
            .verify_api_key(&openai_target(&server.uri(), Some("sk-good")))
            .await
    );
    // wrong key gets a 404 from the mock, which is not success
    assert!(
        !client
            .verify_api_key(&openai_target(&server.uri(), Some("sk-bad")))
            .await
    );
    assert!(!client.verify_api_key(&openai_target(&server.uri(), None)).await);
}
