//! Drives a [`Session`] from player actions and a [`QuizSource`].
//!
//! The controller owns everything a renderer needs: the session, the loading
//! and error status, and the source used when the player leaves the cover.
//! Renderers call the action methods and paint whatever [`Screen`] comes back.

use crate::document::{QuizDocument, Validation};
use crate::error::QuizError;
use crate::model::{Block, Letter, PageType};
use crate::navigator::{self, Transition};
use crate::session::Session;
use crate::sources::QuizSource;
use tracing::{debug, error, info, instrument, warn};

/// What the controller is doing besides showing a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Loading,
    /// `recoverable` errors allow skipping forward or back; the others need a
    /// reload or a new start.
    Failed { message: String, recoverable: bool },
}

/// An answer button.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOption<'a> {
    pub letter: Letter,
    pub block: &'a Block,
    pub selected: bool,
}

/// Everything needed to paint the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    pub index: usize,
    pub kind: PageType,
    pub background: &'a str,
    /// Non-answer blocks in document order.
    pub blocks: Vec<&'a Block>,
    /// Answers with a known letter, ordered A to D.
    pub answers: Vec<AnswerOption<'a>>,
    pub question: Option<usize>,
    pub question_count: usize,
    pub result: Letter,
    pub next_label: &'static str,
    pub show_back: bool,
    pub show_next: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Screen<'a> {
    Loading,
    Error { message: String, recoverable: bool },
    Page(PageView<'a>),
}

/// Label of the forward button on a page of this type.
pub fn next_label(kind: PageType) -> &'static str {
    match kind {
        PageType::Cover => "Start",
        PageType::PreResults => "Get Results",
        PageType::Result(_) => "Finish",
        _ => "Next",
    }
}

#[derive(Debug, Clone)]
pub struct QuizController<S: QuizSource> {
    source: S,
    session: Session,
    status: Status,
    validation: Validation,
}

impl<S: QuizSource> QuizController<S> {
    /// Controller over the built-in sample quiz.
    pub fn new(source: S) -> Self {
        Self::with_session(source, Session::with_defaults())
    }

    pub fn with_session(source: S, session: Session) -> Self {
        info!(pages = session.pages().len(), "Creating quiz controller");
        Self {
            source,
            session,
            status: Status::Ready,
            validation: Validation::default(),
        }
    }

    /// How strictly loaded documents are validated.
    #[must_use]
    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validation = validation;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Leave the cover. With a quiz id the document is fetched and replaces
    /// the current pages first; on failure the cursor stays on the cover and
    /// calling `start` again simply retries.
    #[instrument(target = "quiz_pages::controller", skip(self))]
    pub async fn start(&mut self, quiz_id: Option<&str>) -> Result<(), QuizError> {
        let quiz_id = quiz_id.map(str::trim).filter(|id| !id.is_empty());

        let Some(quiz_id) = quiz_id else {
            info!("No quiz id supplied, using current pages");
            self.session.begin();
            self.status = Status::Ready;
            return Ok(());
        };

        self.status = Status::Loading;
        match self.load(quiz_id).await {
            Ok(()) => {
                self.session.begin();
                self.status = Status::Ready;
                info!(quiz_id, questions = self.session.question_count(), "Quiz loaded");
                Ok(())
            }
            Err(e) => {
                error!(quiz_id, error = %e, "Quiz loading failed");
                self.status = Status::Failed {
                    message: e.to_string(),
                    recoverable: e.is_recoverable(),
                };
                Err(e)
            }
        }
    }

    async fn load(&mut self, quiz_id: &str) -> Result<(), QuizError> {
        let raw = self.source.fetch(quiz_id).await?;
        let document = QuizDocument::from_value(raw, self.validation)?;
        self.session.replace(document)?;
        Ok(())
    }

    /// Whether [`QuizController::next`] with this id will fetch from the
    /// source. Renderers show [`Screen::Loading`] while that call is pending.
    pub fn loads_on_next(&self, quiz_id: Option<&str>) -> bool {
        let on_cover = matches!(self.session.current(), Ok(page) if page.kind == PageType::Cover);
        on_cover && quiz_id.is_some_and(|id| !id.trim().is_empty())
    }

    /// Forward button. On the cover this is [`QuizController::start`].
    pub async fn next(&mut self, quiz_id: Option<&str>) -> Result<(), QuizError> {
        match self.session.advance() {
            Ok(Transition::Start) => self.start(quiz_id).await,
            Ok(Transition::Move(_)) | Ok(Transition::Stay) => Ok(()),
            Err(e) => Err(self.fail_navigation(e.into())),
        }
    }

    /// Back button.
    pub fn back(&mut self) -> Result<(), QuizError> {
        match self.session.retreat() {
            Ok(_) => Ok(()),
            Err(e) => Err(self.fail_navigation(e.into())),
        }
    }

    /// Answer button. Ignored off question pages.
    pub fn choose(&mut self, letter: Letter) -> bool {
        self.session.choose(letter)
    }

    /// Error-screen escape hatch: one page forward, clamped.
    pub fn skip_forward(&mut self) {
        let target = navigator::step_forward(self.session.pages(), self.session.cursor());
        self.recover_at(target);
    }

    /// Error-screen escape hatch: one page back, clamped.
    pub fn skip_back(&mut self) {
        let target = navigator::step_back(self.session.pages(), self.session.cursor());
        self.recover_at(target);
    }

    /// Throw away all state, as a full reload would.
    pub fn reload(&mut self) {
        debug!("Reloading quiz session");
        self.session = Session::with_defaults();
        self.status = Status::Ready;
    }

    fn recover_at(&mut self, index: usize) {
        warn!(from = self.session.cursor(), to = index, "Skipping after error");
        self.session.jump_to(index);
        self.status = Status::Ready;
    }

    fn fail_navigation(&mut self, e: QuizError) -> QuizError {
        warn!(cursor = self.session.cursor(), error = %e, "Navigation failed");
        self.status = Status::Failed {
            message: e.to_string(),
            recoverable: e.is_recoverable(),
        };
        e
    }

    /// What to paint right now.
    pub fn screen(&self) -> Screen<'_> {
        match &self.status {
            Status::Loading => return Screen::Loading,
            Status::Failed { message, recoverable } => {
                return Screen::Error {
                    message: message.clone(),
                    recoverable: *recoverable,
                }
            }
            Status::Ready => {}
        }

        let page = match self.session.current() {
            Ok(page) => page,
            Err(e) => {
                return Screen::Error {
                    message: e.to_string(),
                    recoverable: true,
                }
            }
        };

        let selected = self.session.selected();
        let mut answers: Vec<AnswerOption<'_>> = page
            .answers()
            .filter_map(|block| {
                block.letter.map(|letter| AnswerOption {
                    letter,
                    block,
                    selected: selected == Some(letter),
                })
            })
            .collect();
        answers.sort_by_key(|option| option.letter);

        Screen::Page(PageView {
            index: self.session.cursor(),
            kind: page.kind,
            background: &page.background,
            blocks: page.blocks.iter().filter(|b| !b.is_answer()).collect(),
            answers,
            question: self.session.current_question(),
            question_count: self.session.question_count(),
            result: self.session.current_result(),
            next_label: next_label(page.kind),
            show_back: self.session.cursor() > 0,
            show_next: page.kind != PageType::ThankYou,
        })
    }
}
