mod test_utils;

use quiz_pages::config::{quiz_id_from_location, quiz_param, split_list};
use quiz_pages::defaults::default_document;
use quiz_pages::document::{QuizDocument, Validation};
use quiz_pages::error::SourceError;
use quiz_pages::sources::{
    document_from_row, first_row, FileSource, FlexibleSource, HostedTableConfig, HostedTableSource,
    MockResponse, MockSource, QuizSource, SourceType, StaticHostConfig, StaticHostSource,
    DEFAULT_LOOKUP_COLUMNS,
};
use serde_json::json;
use test_utils::quiz_json;

#[test]
fn static_host_url_joins_origin_path_and_id() {
    let source = StaticHostSource::new(StaticHostConfig::new("https://quiz.example.com", "3c-quiz/quizzes"));
    assert_eq!(
        source.quiz_url("personality-01").unwrap().as_str(),
        "https://quiz.example.com/3c-quiz/quizzes/personality-01.json"
    );

    let trailing = StaticHostSource::new(StaticHostConfig::new("https://quiz.example.com/", "/quizzes/"));
    assert_eq!(
        trailing.quiz_url(" q01 ").unwrap().as_str(),
        "https://quiz.example.com/quizzes/q01.json"
    );
}

#[test]
fn path_like_ids_are_rejected() {
    let source = StaticHostSource::new(StaticHostConfig::new("https://quiz.example.com", "quizzes"));
    for id in ["", "  ", "../secret", "a/b", "a\\b"] {
        assert!(
            matches!(source.quiz_url(id), Err(SourceError::NotFound(_))),
            "id {:?} should be rejected",
            id
        );
    }
    assert!(matches!(
        FileSource::new("quizzes").path_for("../etc/passwd"),
        Err(SourceError::NotFound(_))
    ));
}

#[test]
fn bad_origin_is_a_configuration_error() {
    let source = StaticHostSource::new(StaticHostConfig::new("not a url", "quizzes"));
    assert!(matches!(source.quiz_url("q01"), Err(SourceError::NotConfigured(_))));
}

#[test]
fn table_lookup_url() {
    let source = HostedTableSource::new(HostedTableConfig::new("https://db.example.com", "quizzes", "key"));
    let url = source.lookup_url("slug", "q01").unwrap();
    assert_eq!(url.path(), "/rest/v1/quizzes");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("slug".to_string(), "eq.q01".to_string()),
            ("select".to_string(), "*".to_string()),
            ("limit".to_string(), "1".to_string()),
        ]
    );
}

#[test]
fn table_needs_a_base_url() {
    let source = HostedTableSource::new(HostedTableConfig::new("", "quizzes", "key"));
    assert!(matches!(source.lookup_url("id", "q01"), Err(SourceError::NotConfigured(_))));
}

#[tokio::test]
async fn unconfigured_table_fails_before_any_request() {
    let source = HostedTableSource::new(HostedTableConfig::new("", "quizzes", "key"));
    assert!(matches!(source.fetch("q01").await, Err(SourceError::NotConfigured(_))));
}

#[test]
fn table_columns_can_be_overridden() {
    let config = HostedTableConfig::new("https://db.example.com", "quizzes", "key");
    assert_eq!(config.columns, DEFAULT_LOOKUP_COLUMNS.map(String::from).to_vec());
    let config = config.with_columns(split_list(" slug, ,id "));
    assert_eq!(config.columns, vec!["slug".to_string(), "id".to_string()]);
}

#[test]
fn first_row_of_table_responses() {
    assert_eq!(first_row(json!([{ "id": 1 }, { "id": 2 }])), Some(json!({ "id": 1 })));
    assert_eq!(first_row(json!({ "id": 3 })), Some(json!({ "id": 3 })));
    assert_eq!(first_row(json!([])), None);
    assert_eq!(first_row(json!("nope")), None);
}

#[test]
fn documents_are_found_inside_rows() {
    let document = quiz_json();

    let row = document.clone();
    assert_eq!(document_from_row(row).unwrap(), document);

    let row = json!({ "id": 7, "config": document.clone() });
    assert_eq!(document_from_row(row).unwrap(), document);

    let row = json!({ "id": 7, "content": document.to_string() });
    assert_eq!(document_from_row(row).unwrap(), document);

    // An unparseable string is skipped in favour of the next field.
    let row = json!({ "content": "not json", "quiz": document.clone() });
    assert_eq!(document_from_row(row).unwrap(), document);

    let row = json!({ "id": 7, "title": "nothing here" });
    assert_eq!(document_from_row(row.clone()).unwrap(), row);
}

#[tokio::test]
async fn file_source_reads_documents() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("q01.json"), quiz_json().to_string()).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{ nope").unwrap();
    let source = FileSource::new(dir.path());

    assert_eq!(source.fetch("q01").await.unwrap(), quiz_json());
    assert!(matches!(source.fetch("absent").await, Err(SourceError::NotFound(_))));
    assert!(matches!(source.fetch("broken").await, Err(SourceError::Json(_))));
}

#[tokio::test]
async fn mock_replays_in_order_and_records_requests() {
    let (source, handle) = MockSource::with_responses(vec![
        MockResponse::NotFound,
        MockResponse::Document(json!({ "pages": [] })),
    ]);

    assert!(matches!(source.fetch("a").await, Err(SourceError::NotFound(_))));
    assert_eq!(source.fetch("b").await.unwrap(), json!({ "pages": [] }));
    assert!(matches!(source.fetch("c").await, Err(SourceError::Mock(_))));
    assert_eq!(handle.requests(), vec!["a", "b", "c"]);
    assert_eq!(handle.pending(), 0);
}

#[tokio::test]
async fn flexible_source_delegates_and_clones_share_state() {
    let (source, handle) = FlexibleSource::mock();
    let boxed: Box<dyn QuizSource> = source.clone_box();
    handle.add_document(quiz_json());
    handle.add_response(MockResponse::Failure("down".to_string()));

    assert_eq!(source.fetch("q01").await.unwrap(), quiz_json());
    assert!(matches!(boxed.fetch("q01").await, Err(SourceError::Mock(m)) if m == "down"));
    assert_eq!(handle.requests().len(), 2);
}

#[test]
fn source_type_names() {
    assert_eq!(SourceType::from_str("STATIC"), Ok(SourceType::StaticHost));
    assert_eq!(SourceType::from_str("hosted-table"), Ok(SourceType::HostedTable));
    assert_eq!(SourceType::from_str(" file "), Ok(SourceType::File));
    assert_eq!(SourceType::from_str("mock"), Ok(SourceType::Mock));
    assert!(SourceType::from_str("ftp").is_err());

    for source_type in [SourceType::StaticHost, SourceType::HostedTable, SourceType::File, SourceType::Mock] {
        assert_eq!(SourceType::from_str(&source_type.to_string()), Ok(source_type));
    }
}

#[test]
fn quiz_id_comes_from_the_location() {
    assert_eq!(
        quiz_id_from_location("https://quiz.example.com/3c-quiz/?quizUrl=personality-01"),
        Some("personality-01".to_string())
    );
    assert_eq!(quiz_id_from_location("?quizUrl=q01&lang=en"), Some("q01".to_string()));
    assert_eq!(quiz_id_from_location("lang=en&quizUrl=q%2002"), Some("q 02".to_string()));
    assert_eq!(quiz_id_from_location("?quizUrl="), None);
    assert_eq!(quiz_id_from_location("https://quiz.example.com/"), None);
    assert_eq!(quiz_id_from_location(""), None);
    assert_eq!(quiz_param("?lang=en", "lang"), Some("en".to_string()));
}

#[tokio::test]
async fn malformed_host_body_is_a_json_error() {
    let origin = test_utils::serve_once("200 OK", "{ \"pages\": [").await;
    let source = StaticHostSource::new(StaticHostConfig::new(origin, "quizzes"));
    assert!(matches!(source.fetch("q01").await, Err(SourceError::Json(_))));
}

#[tokio::test]
async fn host_serves_documents_and_reports_missing_ones() {
    let origin = test_utils::serve_once("200 OK", r#"{ "pages": [] }"#).await;
    let source = StaticHostSource::new(StaticHostConfig::new(origin, "quizzes"));
    assert_eq!(source.fetch("q01").await.unwrap(), json!({ "pages": [] }));

    let origin = test_utils::serve_once("404 Not Found", "").await;
    let source = StaticHostSource::new(StaticHostConfig::new(origin, "quizzes"));
    assert!(matches!(source.fetch("q01").await, Err(SourceError::NotFound(_))));
}

#[tokio::test]
async fn malformed_table_body_is_a_json_error() {
    let origin = test_utils::serve_once("200 OK", "[{ \"id\": ").await;
    let source = HostedTableSource::new(HostedTableConfig::new(origin, "quizzes", "key"));
    assert!(matches!(source.fetch("q01").await, Err(SourceError::Json(_))));
}

#[tokio::test]
async fn mock_source_type_serves_the_sample_quiz() {
    let source = FlexibleSource::from_type(SourceType::Mock);
    let raw = source.fetch("anything").await.unwrap();
    let document = QuizDocument::from_value(raw, Validation::Strict).unwrap();
    assert_eq!(document, default_document());
    // Still there on the next fetch.
    assert!(source.fetch("again").await.is_ok());
}

#[tokio::test]
async fn queued_responses_win_over_the_fallback() {
    let (source, handle) = MockSource::new();
    let source = source.with_fallback(json!({ "pages": [] }));
    handle.add_response(MockResponse::NotFound);

    assert!(matches!(source.fetch("a").await, Err(SourceError::NotFound(_))));
    assert_eq!(source.fetch("b").await.unwrap(), json!({ "pages": [] }));
}
