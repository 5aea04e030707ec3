//! Page-sequence transitions as pure functions over the page list.
//!
//! The sequence is linear (`cover → intro → question… → pre-results →
//! result → thankyou`) with two jumps: pre-results goes straight to the
//! tallied result page, and any result page goes straight to thank-you.
//! Every index handed back is within `0..pages.len()`.

use crate::error::NavigationError;
use crate::model::{Letter, Page, PageType};

/// Outcome of a forward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Move the cursor to this index.
    Move(usize),
    /// Leaving the cover: load the configured quiz, then go to page 1.
    Start,
    /// Terminal page, nothing to do.
    Stay,
}

fn page_at(pages: &[Page], cursor: usize) -> Result<&Page, NavigationError> {
    pages.get(cursor).ok_or(NavigationError::InvalidPage { index: cursor })
}

fn last_index(pages: &[Page]) -> usize {
    pages.len().saturating_sub(1)
}

/// `cursor + 1`, clamped to the last page.
pub fn step_forward(pages: &[Page], cursor: usize) -> usize {
    (cursor + 1).min(last_index(pages))
}

/// `cursor - 1`, clamped to the first page.
pub fn step_back(pages: &[Page], cursor: usize) -> usize {
    cursor.saturating_sub(1).min(last_index(pages))
}

pub fn find(pages: &[Page], kind: PageType) -> Option<usize> {
    pages.iter().position(|p| p.kind == kind)
}

/// Result page for `letter`, falling back to `resultA`, then to the first
/// result page of any letter.
pub fn result_page(pages: &[Page], letter: Letter) -> Option<usize> {
    find(pages, PageType::Result(letter))
        .or_else(|| find(pages, PageType::Result(Letter::A)))
        .or_else(|| pages.iter().position(|p| p.kind.is_result()))
}

/// Forward transition from `cursor`. `result` is the tallied letter used when
/// leaving pre-results.
pub fn next(pages: &[Page], cursor: usize, result: Letter) -> Result<Transition, NavigationError> {
    let page = page_at(pages, cursor)?;
    let transition = match page.kind {
        PageType::Cover => Transition::Start,
        PageType::ThankYou => Transition::Stay,
        PageType::PreResults => {
            Transition::Move(result_page(pages, result).unwrap_or_else(|| step_forward(pages, cursor)))
        }
        PageType::Result(_) => Transition::Move(
            find(pages, PageType::ThankYou).unwrap_or_else(|| step_forward(pages, cursor)),
        ),
        PageType::Intro | PageType::Question => Transition::Move(step_forward(pages, cursor)),
    };
    Ok(transition)
}

/// Backward transition from `cursor`.
pub fn back(pages: &[Page], cursor: usize) -> Result<usize, NavigationError> {
    let page = page_at(pages, cursor)?;
    let target = match page.kind {
        PageType::ThankYou | PageType::Result(_) => find(pages, PageType::PreResults),
        PageType::PreResults => pages.iter().rposition(|p| p.kind == PageType::Question),
        _ => None,
    };
    Ok(target.unwrap_or_else(|| step_back(pages, cursor)))
}

/// 0-based position of the question at `cursor` among all question pages.
/// Off a question page this is the number of questions before `cursor`.
pub fn question_ordinal(pages: &[Page], cursor: usize) -> usize {
    pages
        .iter()
        .take(cursor)
        .filter(|p| p.kind == PageType::Question)
        .count()
}

pub fn question_count(pages: &[Page]) -> usize {
    pages.iter().filter(|p| p.kind == PageType::Question).count()
}
