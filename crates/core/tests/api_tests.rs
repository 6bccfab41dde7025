//! Library API integration tests
use referent_core::*;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn get_fixture_path(name: &str) -> String {
    format!("../../tests/fixtures/{}", name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(get_fixture_path(name)).unwrap()
}

#[test]
fn test_extract_article_fixture() {
    let record = extract_article(&read_fixture("article.html"));

    assert_eq!(record.title.as_deref(), Some("Rust Adoption Grows in Systems Programming"));
    assert_eq!(record.published_date.as_deref(), Some("2024-03-18T09:00:00Z"));

    let content = record.content.unwrap();
    assert!(content.contains("More teams are choosing Rust"));
    assert!(content.contains("long lived products."));
    assert!(!content.contains("Subscribe now"));
    assert!(!content.contains("borrow checker"));
    assert!(!content.contains("trackScroll"));
    assert!(!content.contains("Languages"));
    assert!(!content.contains("  "));
}

#[test]
fn test_empty_page_yields_nulls() {
    let record = extract_article(&read_fixture("empty_content.html"));
    assert!(record.is_empty());

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(json, serde_json::json!({ "title": null, "date": null, "content": null }));
}

#[test]
fn test_main_fallback_fixture() {
    let record = extract_article(&read_fixture("main_fallback.html"));
    assert_eq!(record.title.as_deref(), Some("Release notes"));
    assert_eq!(record.content.as_deref(), Some("Version 2.1 Bug fixes only."));
    assert!(record.published_date.is_none());
}

#[test]
fn test_custom_thresholds() {
    let html = "<html><body><article><p>Exactly forty characters of body text..</p></article></body></html>";
    assert!(extract_article(html).content.is_none());

    let config = ExtractConfig { content_min_chars: 20, ..Default::default() };
    assert!(extract_article_with_config(html, &config).content.is_some());
}

#[test]
fn test_normalization_idempotent_on_extracted_content() {
    let content = extract_article(&read_fixture("article.html")).content.unwrap();
    assert_eq!(normalize_whitespace(&content), content);
}

#[tokio::test]
async fn test_fetch_and_extract() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news/rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(read_fixture("article.html")))
        .mount(&server)
        .await;

    let record = fetch_and_extract(&format!("{}/news/rust", server.uri())).await.unwrap();
    assert_eq!(record.title.as_deref(), Some("Rust Adoption Grows in Systems Programming"));
}

#[tokio::test]
async fn test_fetch_and_extract_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET")).respond_with(ResponseTemplate::new(403)).mount(&server).await;

    let err = fetch_and_extract(&format!("{}/private", server.uri())).await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::HttpStatusFailure);
    assert_eq!(err.status_code(), 403);

    let shown = ErrorPresentation::from_error(&err, OperationKind::Parse);
    assert_eq!(shown.severity, Severity::Destructive);
    assert!(shown.message.contains("403"));
}

#[tokio::test]
async fn test_referent_builder_and_theses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "content": "1. Rust растёт\n2. Экосистема зрелая" } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ReferentConfig::builder()
        .chat_api_key("key")
        .chat_endpoint(format!("{}/v1/chat", server.uri()))
        .build();
    let referent = Referent::new(config).unwrap();

    let content = referent.parse_html(&read_fixture("article.html")).content.unwrap();
    let theses = referent.extract_theses(&content).await.unwrap();
    assert!(theses.starts_with("1."));
}
