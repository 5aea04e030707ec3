#![allow(dead_code)]

use quiz_pages::controller::QuizController;
use quiz_pages::model::{Block, BlockKind, Letter, Page, PageType};
use quiz_pages::sources::{MockHandle, MockSource};
use serde_json::{json, Value};
use std::sync::{Arc, Once};

pub fn init_tracing() {
    static START: Once = Once::new();
    START.call_once(|| {
        let filter = if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::EnvFilter::from_default_env()
        } else {
            tracing_subscriber::EnvFilter::new("quiz_pages=debug")
        };
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .without_time()
            .with_env_filter(filter)
            .try_init();
    });
}

pub fn page(kind: PageType) -> Page {
    Page::new(kind, format!("static/{}.png", kind))
}

pub fn question(prompt: &str) -> Page {
    let mut blocks = vec![Block::new(BlockKind::Question, prompt)];
    blocks.extend(
        Letter::ALL
            .into_iter()
            .map(|letter| Block::answer(letter, format!("{}. option", letter))),
    );
    page(PageType::Question).with_blocks(blocks)
}

/// cover, intro, three questions, pre-results, resultA-D, thankyou
pub fn full_sequence() -> Vec<Page> {
    vec![
        page(PageType::Cover),
        page(PageType::Intro),
        question("Q1"),
        question("Q2"),
        question("Q3"),
        page(PageType::PreResults),
        page(PageType::Result(Letter::A)),
        page(PageType::Result(Letter::B)),
        page(PageType::Result(Letter::C)),
        page(PageType::Result(Letter::D)),
        page(PageType::ThankYou),
    ]
}

pub fn index_of(pages: &[Page], kind: PageType) -> usize {
    pages
        .iter()
        .position(|p| p.kind == kind)
        .unwrap_or_else(|| panic!("no {} page in fixture", kind))
}

/// A strict, well-formed document with two questions.
pub fn quiz_json() -> Value {
    json!({
        "showResult": "B",
        "pages": [
            { "type": "cover", "bg": "static/1.png" },
            { "type": "intro", "bg": "static/2.png", "blocks": [
                { "type": "title", "text": "Welcome", "fontSize": 18, "color": "#fff", "fontWeight": "bold" },
                { "type": "desc", "text": "Find out who you are", "x": 42, "y": 289, "width": 275, "height": 186 }
            ]},
            { "type": "question", "bg": "static/3a.png", "blocks": [
                { "type": "question", "text": "Pick a colour" },
                { "type": "answer", "text": "Blue", "resultType": "B" },
                { "type": "answer", "text": "Red", "resultType": "A" },
                { "type": "answer", "text": "Yellow", "resultType": "D" },
                { "type": "answer", "text": "Green", "resultType": "C" }
            ]},
            { "type": "question", "bg": "static/3b.png", "blocks": [
                { "type": "question", "text": "Pick an activity" },
                { "type": "answer", "text": "Reading", "resultType": "A" },
                { "type": "answer", "text": "Sports", "resultType": "B" },
                { "type": "answer", "text": "Music", "resultType": "C" },
                { "type": "answer", "text": "Art", "resultType": "D" }
            ]},
            { "type": "pre-results", "bg": "static/4.png" },
            { "type": "resultA", "bg": "static/5a.png" },
            { "type": "resultB", "bg": "static/5b.png" },
            { "type": "resultC", "bg": "static/5c.png" },
            { "type": "resultD", "bg": "static/5d.png" },
            { "type": "thankyou", "bg": "static/6.png" }
        ]
    })
}

pub fn mock_controller() -> (QuizController<MockSource>, Arc<MockHandle>) {
    init_tracing();
    let (source, handle) = MockSource::new();
    (QuizController::new(source), handle)
}

/// Answer the next HTTP request on a local port with `status` and `body`,
/// then close. Returns the origin to point a source at.
pub async fn serve_once(status: &'static str, body: &'static str) -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let origin = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut request = vec![0u8; 4096];
        let _ = socket.read(&mut request).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    origin
}
