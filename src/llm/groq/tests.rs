use super::*;
use crate::config::GroqConfig;
use tokio::task::spawn_blocking;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn mock_config(server_uri: &str) -> GroqConfig {
    GroqConfig {
        api_url: server_uri.to_string(),
        model: "llama-3.1-8b-instant".to_string(),
        temperature: 0.2,
        api_key_env: "GROQ_API_KEY".to_string(),
    }
}

#[test]
fn client_configuration() {
    let config = GroqConfig {
        api_url: "https://api.groq.com/openai/v1".to_string(),
        model: "test-model".to_string(),
        temperature: 0.7,
        api_key_env: "GROQ_API_KEY".to_string(),
    };
    let client =
        GroqClient::new_with_key(&config, "test-key".to_string()).expect("Failed to create client");

    assert_eq!(client.model, "test-model");
    assert!((client.temperature - 0.7).abs() < f32::EPSILON);
    assert_eq!(client.api_key, "test-key");
    assert_eq!(client.retry_attempts, DEFAULT_RETRY_ATTEMPTS);
    // Trailing slash is enforced so endpoint joins append instead of replace
    assert!(client.base_url.as_str().ends_with('/'));
}

#[test]
fn missing_api_key_env_is_an_error() {
    let config = GroqConfig {
        api_url: "https://api.groq.com/openai/v1".to_string(),
        model: "test-model".to_string(),
        temperature: 0.2,
        api_key_env: "FOODIEBOT_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
    };

    let result = GroqClient::new(&config);
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn completion_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_json(serde_json::json!({
            "model": "llama-3.1-8b-instant",
            "messages": [{"role": "user", "content": "What burgers do you have?"}],
            "temperature": 0.2
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": "We have the Classic Burger."}}]
        })))
        .mount(&server)
        .await;

    let client = GroqClient::new_with_key(&mock_config(&server.uri()), "test-key".to_string())
        .expect("Failed to create client");

    let reply = spawn_blocking(move || client.complete("What burgers do you have?"))
        .await
        .expect("task completed")
        .expect("completion succeeded");

    assert_eq!(reply, "We have the Classic Burger.");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_choices_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let client = GroqClient::new_with_key(&mock_config(&server.uri()), "test-key".to_string())
        .expect("Failed to create client");

    let result = spawn_blocking(move || client.complete("hello"))
        .await
        .expect("task completed");
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn auth_failures_do_not_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let client = GroqClient::new_with_key(&mock_config(&server.uri()), "bad-key".to_string())
        .expect("Failed to create client");

    let result = spawn_blocking(move || client.complete("hello"))
        .await
        .expect("task completed");
    assert!(result.is_err());
}

#[tokio::test(flavor = "multi_thread")]
async fn server_errors_exhaust_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = GroqClient::new_with_key(&mock_config(&server.uri()), "test-key".to_string())
        .expect("Failed to create client")
        .with_retry_attempts(1);

    let result = spawn_blocking(move || client.complete("hello"))
        .await
        .expect("task completed");
    assert!(result.is_err());
}
