use super::*;
use crate::config::{Config, OllamaConfig};
use crate::index::IndexRecord;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config() -> (Config, TempDir) {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config = Config {
        base_dir: temp_dir.path().to_path_buf(),
        ..Config::default()
    };
    (config, temp_dir)
}

fn mock_ollama_config(server_uri: &str) -> OllamaConfig {
    let url = Url::parse(server_uri).expect("mock server URI is valid");
    OllamaConfig {
        protocol: url.scheme().to_string(),
        host: url.host_str().expect("mock server has a host").to_string(),
        port: url.port().expect("mock server has a port"),
        model: "nomic-embed-text".to_string(),
        batch_size: 16,
    }
}

fn menu_record(id: &str, name: &str, category: &str, allergens: &str, vector: Vec<f32>) -> IndexRecord {
    IndexRecord {
        id: id.to_string(),
        vector,
        name: name.to_string(),
        description: format!("{} description", name),
        ingredients: "potato; oil; salt".to_string(),
        calories: "480".to_string(),
        price: "4.49".to_string(),
        allergens: allergens.to_string(),
        category: category.to_string(),
        dietary_tags: "none".to_string(),
        document: format!("Item Name: {}.", name),
    }
}

async fn mock_embedding(server: &MockServer, vector: Vec<f32>) {
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "embedding": vector })),
        )
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn run_builds_context_from_matches() {
    let server = MockServer::start().await;
    mock_embedding(&server, vec![0.9, 0.1, 0.0]).await;

    let (config, _temp_dir) = create_test_config();
    let mut index = MenuIndex::new(&config).await.expect("should create index");
    index
        .rebuild(vec![menu_record(
            "FF001",
            "Classic Burger",
            "Burgers",
            "gluten",
            vec![1.0, 0.0, 0.0],
        )])
        .await
        .expect("rebuild should succeed");

    let embedder =
        OllamaClient::new(&mock_ollama_config(&server.uri())).expect("should create client");
    let turn = run(&embedder, &index, "a juicy burger", 5).await;

    assert!(turn.context.contains("Main Dishes:"));
    assert!(turn.context.contains("Classic Burger"));
    let top = turn.top_match.expect("should record a top match");
    assert_eq!(top.name, "Classic Burger");
    assert!(top.score > 0.9);
    assert!(turn.latency_ms >= 0.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn run_reports_top_match_before_filtering() {
    let server = MockServer::start().await;
    mock_embedding(&server, vec![0.9, 0.1, 0.0]).await;

    let (config, _temp_dir) = create_test_config();
    let mut index = MenuIndex::new(&config).await.expect("should create index");
    index
        .rebuild(vec![
            menu_record("FF002", "Cheesy Fries", "Sides", "dairy", vec![1.0, 0.0, 0.0]),
            menu_record("FF001", "Classic Burger", "Burgers", "", vec![0.0, 1.0, 0.0]),
        ])
        .await
        .expect("rebuild should succeed");

    let embedder =
        OllamaClient::new(&mock_ollama_config(&server.uri())).expect("should create client");
    let turn = run(&embedder, &index, "fries but no dairy please", 5).await;

    // Telemetry sees the raw nearest hit even though the filter removes it
    let top = turn.top_match.expect("should record a top match");
    assert_eq!(top.name, "Cheesy Fries");
    assert!(!turn.context.contains("Cheesy Fries"));
    assert!(turn.context.contains("Classic Burger"));
    assert_eq!(turn.constraints.allergens, vec!["dairy"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn run_with_empty_index_reports_no_items() {
    let server = MockServer::start().await;
    mock_embedding(&server, vec![0.1; 768]).await;

    let (config, _temp_dir) = create_test_config();
    let index = MenuIndex::new(&config).await.expect("should create index");

    let embedder =
        OllamaClient::new(&mock_ollama_config(&server.uri())).expect("should create client");
    let turn = run(&embedder, &index, "anything on the menu?", 5).await;

    assert_eq!(turn.context, NO_RELEVANT_ITEMS);
    assert!(turn.top_match.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn run_degrades_when_retrieval_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/embed"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (config, _temp_dir) = create_test_config();
    let index = MenuIndex::new(&config).await.expect("should create index");

    let embedder = OllamaClient::new(&mock_ollama_config(&server.uri()))
        .expect("should create client")
        .with_retry_attempts(1);
    let turn = run(&embedder, &index, "a snack with no dairy", 5).await;

    assert_eq!(turn.context, NO_RELEVANT_ITEMS);
    assert!(turn.top_match.is_none());
    assert_eq!(turn.constraints.allergens, vec!["dairy"]);
    assert_eq!(turn.constraints.intents, vec!["snack"]);
}
