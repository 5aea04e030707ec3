//! Built-in sample quiz, used when no quiz identifier is supplied.

use crate::document::QuizDocument;
use crate::model::{Block, BlockKind, BlockStyle, Letter, Page, PageType};

fn styled(size: f64, bold: bool) -> BlockStyle {
    BlockStyle {
        font_size: Some(size),
        color: Some("#fff".to_string()),
        font_weight: bold.then(|| "bold".to_string()),
        ..Default::default()
    }
}

fn title(text: &str, size: f64) -> Block {
    Block::new(BlockKind::Title, text).with_style(styled(size, true))
}

fn description(text: &str, size: f64) -> Block {
    Block::new(BlockKind::Description, text).with_style(styled(size, false))
}

fn question(bg: &str, prompt: &str, options: [&str; 4]) -> Page {
    let mut blocks = vec![Block::new(BlockKind::Question, prompt).with_style(styled(18.0, true))];
    blocks.extend(
        Letter::ALL
            .into_iter()
            .zip(options)
            .map(|(letter, option)| Block::answer(letter, format!("{}. {}", letter, option))),
    );
    Page::new(PageType::Question, bg).with_blocks(blocks)
}

fn result(letter: Letter, bg: &str, text: &str) -> Page {
    Page::new(PageType::Result(letter), bg).with_blocks(vec![
        title(&format!("Result {}", letter), 16.0),
        description(text, 13.0),
    ])
}

/// The sample page sequence: cover, intro, two questions, pre-results,
/// four results and a thank-you page.
pub fn default_pages() -> Vec<Page> {
    vec![
        Page::new(PageType::Cover, "static/1.png"),
        Page::new(PageType::Intro, "static/2.png").with_blocks(vec![
            title("Welcome to the Quiz", 18.0),
            description(
                "This is a sample quiz to test the positioning and functionality.",
                14.0,
            ),
        ]),
        question(
            "static/3a.png",
            "What is your favorite color?",
            ["Red", "Blue", "Green", "Yellow"],
        ),
        question(
            "static/3b.png",
            "What is your preferred activity?",
            ["Reading", "Sports", "Music", "Art"],
        ),
        Page::new(PageType::PreResults, "static/4.png").with_blocks(vec![title(
            "Click below to see your personalized result- based on your answers!",
            15.0,
        )]),
        result(
            Letter::A,
            "static/5a.png",
            "You are a passionate and energetic person! You love bold choices and aren't afraid to stand out.",
        ),
        result(
            Letter::B,
            "static/5b.png",
            "You are calm and thoughtful! You prefer stability and enjoy peaceful environments.",
        ),
        result(
            Letter::C,
            "static/5c.png",
            "You are balanced and harmonious! You appreciate nature and seek equilibrium in life.",
        ),
        result(
            Letter::D,
            "static/5d.png",
            "You are optimistic and creative! You bring sunshine and positivity wherever you go.",
        ),
        Page::new(PageType::ThankYou, "static/6.png").with_blocks(vec![title(
            "Thanks for taking our quiz! We hope you enjoyed discovering more about yourself.",
            14.0,
        )]),
    ]
}

pub fn default_document() -> QuizDocument {
    QuizDocument {
        pages: default_pages(),
        show_result: Letter::A,
    }
}
