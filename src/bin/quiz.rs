use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    terminal,
};
use quiz_pages::config::quiz_id_from_location;
use quiz_pages::controller::{PageView, QuizController, Screen};
use quiz_pages::document::{document_schema, QuizDocument, Validation};
use quiz_pages::model::Letter;
use quiz_pages::sources::{FileSource, FlexibleSource, SourceType};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about = "Play and check page-sequence personality quizzes", long_about = None)]
#[command(after_help = "ENVIRONMENT VARIABLES:
    QUIZ_SOURCE         static | table | file | mock
    QUIZ_BASE_URL       Origin of the static quiz host
    QUIZ_PATH           Path under the origin holding <id>.json files
    QUIZ_TABLE_URL      Base URL of the hosted table service
    QUIZ_TABLE_NAME     Table holding quiz rows (default: quizzes)
    QUIZ_TABLE_KEY      API key for the hosted table service
    QUIZ_TABLE_COLUMNS  Comma separated lookup columns
    QUIZ_DIR            Directory for the file source (default: quizzes)
    RUST_LOG            Log filter, e.g. quiz_pages=debug

EXAMPLES:
    quiz play                              # Built-in sample quiz
    quiz play --quiz personality-01        # Load a quiz from the configured source
    quiz play --location '/?quizUrl=q01'   # Take the id from a page URL
    quiz validate quizzes/q01.json --legacy
    quiz schema > quiz.schema.json")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Play a quiz in the terminal
    Play {
        /// Quiz identifier to load when leaving the cover
        #[arg(short, long)]
        quiz: Option<String>,

        /// Page URL or query string carrying a quizUrl parameter
        #[arg(long, conflicts_with = "quiz")]
        location: Option<String>,

        /// Source type [default: from QUIZ_SOURCE or detected settings]
        #[arg(short, long, value_parser = SourceType::from_str)]
        source: Option<SourceType>,

        /// Directory for the file source
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Accept untyped pages and free-text answer letters
        #[arg(long)]
        legacy: bool,
    },
    /// Check a quiz document and print a summary
    Validate {
        file: PathBuf,

        #[arg(long)]
        legacy: bool,

        /// Print the normalized pages as JSON
        #[arg(long)]
        print: bool,
    },
    /// Print the JSON schema of the strict document format
    Schema,
}

fn validation(legacy: bool) -> Validation {
    if legacy {
        Validation::Legacy
    } else {
        Validation::Strict
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env first so RUST_LOG in .env is seen
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();

    match Args::parse().command {
        Command::Play {
            quiz,
            location,
            source,
            dir,
            legacy,
        } => {
            let quiz_id = quiz.or_else(|| location.as_deref().and_then(quiz_id_from_location));
            let source = match (source.unwrap_or_default(), dir) {
                (SourceType::File, Some(dir)) => FlexibleSource::new(Box::new(FileSource::new(dir))),
                (source_type, _) => FlexibleSource::from_type(source_type),
            };
            let controller = QuizController::new(source).with_validation(validation(legacy));
            play(controller, quiz_id).await
        }
        Command::Validate { file, legacy, print } => validate(&file, validation(legacy), print),
        Command::Schema => {
            println!("{}", serde_json::to_string_pretty(&document_schema())?);
            Ok(())
        }
    }
}

fn validate(file: &Path, validation: Validation, print: bool) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let document = QuizDocument::from_json(&text, validation)
        .with_context(|| format!("validating {}", file.display()))?;

    println!("✅ {} is a valid quiz", file.display());
    println!("   Pages: {}", document.pages.len());
    println!("   Default result: {}", document.show_result);
    for (index, page) in document.pages.iter().enumerate() {
        let answers: String = page
            .answers()
            .map(|a| a.letter.map_or('?', Letter::as_char))
            .collect();
        if answers.is_empty() {
            println!("   {:>2}. {:<12} {}", index, page.kind.as_str(), page.background);
        } else {
            println!("   {:>2}. {:<12} {} [{}]", index, page.kind.as_str(), page.background, answers);
        }
    }

    if print {
        println!("{}", serde_json::to_string_pretty(&document.pages)?);
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Key {
    Answer(Letter),
    Next,
    Back,
    Skip,
    Reload,
    Quit,
    Other,
}

/// Raw mode for as long as the value lives, also on early return.
struct RawMode;

impl RawMode {
    fn enable() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Read one keystroke in raw mode.
fn read_key() -> anyhow::Result<Key> {
    let _raw = RawMode::enable()?;
    loop {
        if !event::poll(Duration::from_secs(60))? {
            continue;
        }
        if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
            if kind != KeyEventKind::Press {
                continue;
            }
            return Ok(key_for(code));
        }
    }
}

fn key_for(code: KeyCode) -> Key {
    match code {
        KeyCode::Char(c) => match (Letter::from_char(c), c) {
            (Some(letter), _) => Key::Answer(letter),
            (None, 'n') => Key::Next,
            (None, 's') => Key::Skip,
            (None, 'r') => Key::Reload,
            (None, 'q') => Key::Quit,
            _ => Key::Other,
        },
        KeyCode::Enter | KeyCode::Right => Key::Next,
        KeyCode::Left | KeyCode::Backspace => Key::Back,
        KeyCode::Esc => Key::Quit,
        _ => Key::Other,
    }
}

fn render_page(view: &PageView<'_>) {
    println!();
    println!("── {} · page {} · {}", view.kind, view.index + 1, view.background);
    if let Some(question) = view.question {
        println!("   Question {} of {}", question + 1, view.question_count);
    }
    for block in &view.blocks {
        if !block.text.is_empty() {
            println!("   {}", block.text);
        }
    }
    for option in &view.answers {
        let marker = if option.selected { "●" } else { "○" };
        println!("   {} [{}] {}", marker, option.letter, option.block.text);
    }

    let mut controls = Vec::new();
    if !view.answers.is_empty() {
        controls.push("a-d answer".to_string());
    }
    if view.show_back {
        controls.push("← back".to_string());
    }
    if view.show_next {
        controls.push(format!("⏎ {}", view.next_label));
    }
    controls.push("q quit".to_string());
    println!("   {}", controls.join("  ·  "));
}

fn render(screen: &Screen<'_>) {
    match screen {
        Screen::Loading => println!("Loading Quiz..."),
        Screen::Error { message, recoverable } => {
            println!();
            if *recoverable {
                println!("Error: Invalid page data");
            } else {
                println!("Error: Quiz Loading Failed");
            }
            println!("   {}", message);
            if *recoverable {
                println!("   s skip forward  ·  ← skip back  ·  r reload  ·  q quit");
            } else {
                println!("   ⏎ retry  ·  r reload  ·  q quit");
            }
        }
        Screen::Page(view) => render_page(view),
    }
}

async fn play(mut controller: QuizController<FlexibleSource>, quiz_id: Option<String>) -> anyhow::Result<()> {
    loop {
        let screen = controller.screen();
        render(&screen);
        let recoverable_error = matches!(screen, Screen::Error { recoverable: true, .. });

        match read_key()? {
            Key::Quit => break,
            Key::Reload => controller.reload(),
            Key::Skip if recoverable_error => controller.skip_forward(),
            Key::Back if recoverable_error => controller.skip_back(),
            Key::Answer(letter) => {
                if !controller.choose(letter) {
                    println!("   (no question on this page)");
                }
            }
            // Failures are already on the error screen.
            Key::Next => {
                if controller.loads_on_next(quiz_id.as_deref()) {
                    render(&Screen::Loading);
                }
                let _ = controller.next(quiz_id.as_deref()).await;
            }
            Key::Back => {
                let _ = controller.back();
            }
            Key::Skip | Key::Other => {}
        }
    }

    if let Some(result) = controller.session().result() {
        println!("Your result: {}", result);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_map_to_actions() {
        assert_eq!(key_for(KeyCode::Char('c')), Key::Answer(Letter::C));
        assert_eq!(key_for(KeyCode::Char('B')), Key::Answer(Letter::B));
        assert_eq!(key_for(KeyCode::Enter), Key::Next);
        assert_eq!(key_for(KeyCode::Char('n')), Key::Next);
        assert_eq!(key_for(KeyCode::Backspace), Key::Back);
        assert_eq!(key_for(KeyCode::Esc), Key::Quit);
        assert_eq!(key_for(KeyCode::Char('x')), Key::Other);
    }
}
