//! Owned quiz session: the page list, the cursor and the answers given so far.

use crate::defaults::default_document;
use crate::document::QuizDocument;
use crate::error::{DocumentError, NavigationError};
use crate::model::{Letter, Page, PageType};
use crate::navigator::{self, Transition};
use crate::tally::tally;
use tracing::{debug, info};

/// State of one run through a quiz. Nothing here outlives the value.
#[derive(Debug, Clone)]
pub struct Session {
    pages: Vec<Page>,
    cursor: usize,
    /// One slot per question page, by question ordinal.
    answers: Vec<Option<Letter>>,
    result: Option<Letter>,
    show_result: Letter,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl Session {
    pub fn new(document: QuizDocument) -> Result<Self, DocumentError> {
        if document.pages.is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(Self {
            pages: document.pages,
            cursor: 0,
            answers: Vec::new(),
            result: None,
            show_result: document.show_result,
        })
    }

    /// Session over the built-in sample quiz.
    pub fn with_defaults() -> Self {
        let document = default_document();
        Self {
            pages: document.pages,
            cursor: 0,
            answers: Vec::new(),
            result: None,
            show_result: document.show_result,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current(&self) -> Result<&Page, NavigationError> {
        self.pages
            .get(self.cursor)
            .ok_or(NavigationError::InvalidPage { index: self.cursor })
    }

    pub fn answers(&self) -> &[Option<Letter>] {
        &self.answers
    }

    pub fn question_count(&self) -> usize {
        navigator::question_count(&self.pages)
    }

    /// Ordinal of the current question, `None` off question pages.
    pub fn current_question(&self) -> Option<usize> {
        match self.current() {
            Ok(page) if page.kind == PageType::Question => {
                Some(navigator::question_ordinal(&self.pages, self.cursor))
            }
            _ => None,
        }
    }

    /// Answer recorded for the current question.
    pub fn selected(&self) -> Option<Letter> {
        self.current_question()
            .and_then(|q| self.answers.get(q).copied().flatten())
    }

    /// Record `letter` for the current question. Returns `false` (and records
    /// nothing) when the cursor is not on a question page.
    pub fn choose(&mut self, letter: Letter) -> bool {
        let Some(question) = self.current_question() else {
            return false;
        };
        if self.answers.len() <= question {
            self.answers.resize(question + 1, None);
        }
        self.answers[question] = Some(letter);
        debug!(question, letter = %letter, "Answer recorded");
        true
    }

    /// Result computed at the last pre-results step, if any.
    pub fn result(&self) -> Option<Letter> {
        self.result
    }

    /// Result to display: the computed one, else the document default.
    pub fn current_result(&self) -> Letter {
        self.result.unwrap_or(self.show_result)
    }

    /// Step forward. Leaving pre-results tallies the answers and stores the
    /// winner as the current result. [`Transition::Start`] leaves the cursor
    /// on the cover for the caller to load and [`Session::begin`].
    pub fn advance(&mut self) -> Result<Transition, NavigationError> {
        let mut winner = self.current_result();
        if self.current()?.kind == PageType::PreResults {
            winner = tally(&self.answers);
            self.result = Some(winner);
            info!(result = %winner, answered = self.answers.iter().flatten().count(), "Result computed");
        }

        let transition = navigator::next(&self.pages, self.cursor, winner)?;
        if let Transition::Move(index) = transition {
            debug!(from = self.cursor, to = index, "Advancing");
            self.cursor = index;
        }
        Ok(transition)
    }

    /// Leave the cover for the first content page.
    pub fn begin(&mut self) {
        self.cursor = navigator::step_forward(&self.pages, 0);
    }

    pub fn retreat(&mut self) -> Result<usize, NavigationError> {
        let index = navigator::back(&self.pages, self.cursor)?;
        debug!(from = self.cursor, to = index, "Going back");
        self.cursor = index;
        Ok(index)
    }

    /// Move to `index`, clamped to the page list.
    pub fn jump_to(&mut self, index: usize) {
        self.cursor = index.min(self.pages.len().saturating_sub(1));
    }

    /// Swap in a freshly loaded quiz. Answers and result are reset and the
    /// cursor is clamped to the new list.
    pub fn replace(&mut self, document: QuizDocument) -> Result<(), DocumentError> {
        if document.pages.is_empty() {
            return Err(DocumentError::Empty);
        }
        self.pages = document.pages;
        self.show_result = document.show_result;
        self.answers.clear();
        self.result = None;
        self.jump_to(self.cursor);
        info!(pages = self.pages.len(), questions = self.question_count(), "Quiz pages replaced");
        Ok(())
    }
}
