//! Quiz configuration documents: wire schema, normalization and validation.
//!
//! A document is a JSON object with a `pages` field and an optional
//! `showResult` default letter. `pages` arrives in one of three shapes (an
//! array, a JSON string holding an array, or an object keyed by position),
//! all normalized to a plain array before the pages are validated.

use crate::error::DocumentError;
use crate::model::{Block, BlockKind, BlockStyle, Letter, Page, PageType, Rect};
use schemars::{schema_for, JsonSchema, Schema};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};

/// How forgiving parsing is about legacy documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Every page needs a `type` and every answer an explicit `resultType`.
    #[default]
    Strict,
    /// Guess missing page types and derive answer letters from answer text.
    Legacy,
}

/// Wire shape of a whole document.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
#[schemars(title = "Quiz Document", description = "Ordered pages of a personality quiz")]
pub struct WireDocument {
    /// Pages in display order.
    pub pages: Vec<WirePage>,
    /// Result letter shown when no answers were tallied.
    #[serde(default)]
    #[schemars(regex(pattern = r"^[ABCD]$"))]
    pub show_result: Option<String>,
}

/// Wire shape of one page.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct WirePage {
    /// One of: cover, intro, question, pre-results, resultA, resultB, resultC, resultD, thankyou.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Background image path.
    #[serde(default)]
    pub bg: Option<String>,
    /// Overlay blocks; `null` reads as none.
    #[serde(default)]
    pub blocks: Option<Vec<WireBlock>>,
    /// Older documents list answers here instead of as blocks.
    #[serde(default)]
    #[schemars(skip)]
    pub answers: Option<Value>,
}

/// Wire shape of one overlay block.
#[derive(Debug, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WireBlock {
    /// title, description (or desc), question, answer, result.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<Value>,
    pub color: Option<String>,
    pub font_weight: Option<Value>,
    pub line_height: Option<Value>,
    pub margin: Option<Value>,
    pub padding: Option<Value>,
    /// Result letter (A, B, C or D) an answer votes for. Required on answer
    /// blocks. Non-string values are ignored.
    #[serde(default, alias = "result")]
    #[schemars(with = "Option<String>")]
    pub result_type: Option<Value>,
}

/// A validated quiz. Serializes back to the strict wire format.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub pages: Vec<Page>,
    pub show_result: Letter,
}

impl QuizDocument {
    pub fn from_json(text: &str, validation: Validation) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value, validation)
    }

    #[instrument(target = "quiz_pages::document", skip(value))]
    pub fn from_value(value: Value, validation: Validation) -> Result<Self, DocumentError> {
        let mut object = match value {
            Value::Object(object) => object,
            _ => return Err(DocumentError::NotAnObject),
        };

        let raw_pages = object.remove("pages").ok_or(DocumentError::MissingPages)?;
        let raw_pages = normalize_pages(raw_pages)?;
        if raw_pages.is_empty() {
            return Err(DocumentError::Empty);
        }

        let total = raw_pages.len();
        let pages = raw_pages
            .into_iter()
            .enumerate()
            .map(|(index, raw)| parse_page(raw, index, total, validation))
            .collect::<Result<Vec<_>, _>>()?;

        let show_result = parse_show_result(object.get("showResult"), validation)?;

        debug!(pages = pages.len(), show_result = %show_result, "Parsed quiz document");
        Ok(Self { pages, show_result })
    }
}

/// JSON schema of the strict document format.
pub fn document_schema() -> Schema {
    schema_for!(WireDocument)
}

/// Flatten the accepted `pages` encodings into an array of raw pages.
pub fn normalize_pages(raw: Value) -> Result<Vec<Value>, DocumentError> {
    match raw {
        Value::Array(pages) => Ok(pages),
        Value::String(encoded) => match serde_json::from_str::<Value>(&encoded) {
            Ok(Value::Array(pages)) => Ok(pages),
            Ok(_) => Err(DocumentError::PagesNotArray),
            Err(e) => Err(DocumentError::EmbeddedPages(e)),
        },
        Value::Object(keyed) => Ok(keyed_values(keyed)),
        _ => Err(DocumentError::PagesNotArray),
    }
}

// Canonical integer keys go in numeric order ("10" after "2"), the rest keep
// document order. "01" is a named key.
fn keyed_values(keyed: Map<String, Value>) -> Vec<Value> {
    let mut numeric = Vec::new();
    let mut named = Vec::new();
    for (key, value) in keyed {
        match key.parse::<u32>() {
            Ok(n) if n.to_string() == key => numeric.push((n, value)),
            _ => named.push(value),
        }
    }
    numeric.sort_by_key(|(n, _)| *n);
    numeric.into_iter().map(|(_, v)| v).chain(named).collect()
}

fn parse_page(
    raw: Value,
    index: usize,
    total: usize,
    validation: Validation,
) -> Result<Page, DocumentError> {
    if !raw.is_object() {
        return Err(DocumentError::PageNotObject { index });
    }
    let wire: WirePage = serde_json::from_value(raw).map_err(|e| DocumentError::Page {
        index,
        reason: e.to_string(),
    })?;

    let declared = wire.kind.as_deref().map(str::trim).filter(|k| !k.is_empty());
    let kind = match (declared, validation) {
        (Some(kind), _) => kind.parse().map_err(|_| DocumentError::UnknownType {
            index,
            value: kind.to_string(),
        })?,
        (None, Validation::Legacy) => {
            let guessed = infer_page_type(&wire, index, total);
            warn!(index, guessed = %guessed, "Page has no type, guessed from position and background");
            guessed
        }
        (None, Validation::Strict) => return Err(DocumentError::MissingType { index }),
    };

    let blocks = wire
        .blocks
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(block_index, block)| parse_block(block, index, block_index, validation))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Page {
        kind,
        background: wire.bg.unwrap_or_default(),
        blocks,
    })
}

fn parse_block(
    wire: WireBlock,
    page: usize,
    block: usize,
    validation: Validation,
) -> Result<Block, DocumentError> {
    let kind = BlockKind::parse(wire.kind.as_deref().unwrap_or(""));
    let text = wire.text.unwrap_or_default();
    let explicit = wire.result_type.as_ref().and_then(Value::as_str);

    let letter = if kind == BlockKind::Answer {
        match validation {
            Validation::Strict => {
                let letter = explicit.and_then(|raw| raw.parse::<Letter>().ok());
                Some(letter.ok_or(DocumentError::MissingAnswerLetter { page, block })?)
            }
            Validation::Legacy => {
                let derived = derive_answer_letter(explicit, &text);
                if derived.is_none() {
                    warn!(page, block, "Answer letter could not be recovered, block will be ignored");
                }
                derived
            }
        }
    } else {
        None
    };

    let rect = match (wire.x, wire.y, wire.width, wire.height) {
        (Some(x), Some(y), Some(width), Some(height)) => Some(Rect { x, y, width, height }),
        _ => None,
    };

    let style = BlockStyle {
        font_size: wire.font_size.as_ref().and_then(leading_number),
        color: wire.color,
        font_weight: wire.font_weight.as_ref().and_then(style_text),
        line_height: wire.line_height.as_ref().and_then(style_text),
        margin: wire.margin.as_ref().and_then(style_text),
        padding: wire.padding.as_ref().and_then(style_text),
    };

    Ok(Block { kind, text, rect, style, letter })
}

fn parse_show_result(raw: Option<&Value>, validation: Validation) -> Result<Letter, DocumentError> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(Letter::A);
    };
    let text = style_text(raw).unwrap_or_default();
    match (text.parse::<Letter>(), validation) {
        (Ok(letter), _) => Ok(letter),
        (Err(_), Validation::Legacy) => Ok(Letter::A),
        (Err(_), Validation::Strict) => Err(DocumentError::InvalidShowResult(text)),
    }
}

/// Best-effort page role for legacy documents that omit `type`.
///
/// Checks run in a fixed order: answer-bearing pages are questions, then the
/// first page is the cover and the last the thank-you page, then the
/// background file name decides, and anything left over is an intro.
pub fn infer_page_type(page: &WirePage, index: usize, total: usize) -> PageType {
    let has_answers = page
        .answers
        .as_ref()
        .and_then(Value::as_array)
        .is_some_and(|answers| !answers.is_empty())
        || page
            .blocks
            .iter()
            .flatten()
            .any(|b| BlockKind::parse(b.kind.as_deref().unwrap_or("")) == BlockKind::Answer);
    if has_answers {
        return PageType::Question;
    }
    if index == 0 {
        return PageType::Cover;
    }
    if index + 1 == total {
        return PageType::ThankYou;
    }

    let bg = page.bg.as_deref().unwrap_or("");
    if bg.contains('4') {
        PageType::PreResults
    } else if bg.contains("5a") {
        PageType::Result(Letter::A)
    } else if bg.contains("5b") {
        PageType::Result(Letter::B)
    } else if bg.contains("5c") {
        PageType::Result(Letter::C)
    } else if bg.contains("5d") {
        PageType::Result(Letter::D)
    } else {
        PageType::Intro
    }
}

/// Recover the result letter of a legacy answer block.
///
/// A one-character explicit field wins (even when it is not A-D, in which
/// case the answer is unusable); otherwise an `"A."` prefix, otherwise the
/// first character of the text.
pub fn derive_answer_letter(explicit: Option<&str>, text: &str) -> Option<Letter> {
    if let Some(explicit) = explicit {
        let trimmed = explicit.trim();
        if explicit.chars().count() == 1 {
            return trimmed.chars().next().and_then(Letter::from_char);
        }
    }

    let text = text.trim();
    let mut chars = text.chars();
    let first = chars.next()?;
    if first.is_ascii_uppercase() && chars.next() == Some('.') {
        if let Some(letter) = Letter::from_char(first) {
            return Some(letter);
        }
    }
    Letter::from_char(first)
}

fn style_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Same leniency as a browser's parseFloat: "18px" is 18.
fn leading_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let end = s
                .char_indices()
                .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
                .map_or(s.len(), |(i, _)| i);
            s[..end].parse().ok()
        }
        _ => None,
    }
}
