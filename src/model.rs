//! Validated quiz model: letters, page types, pages and their overlay blocks.
//!
//! Everything here is produced once by [`crate::document`] (or
//! [`crate::defaults`]) and never mutated afterwards.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// One of the four result buckets an answer can vote for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    /// Fixed priority order, also used as the tally tie-break.
    pub const ALL: [Letter; 4] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Letter::A => 0,
            Letter::B => 1,
            Letter::C => 2,
            Letter::D => 3,
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = String;

    /// Accepts exactly one character (after trimming), case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Letter::from_char(c).ok_or_else(|| format!("'{}' is not one of A, B, C, D", s))
            }
            _ => Err(format!("'{}' is not a single answer letter", s)),
        }
    }
}

/// Role of a page in the quiz sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
    Cover,
    Intro,
    Question,
    PreResults,
    Result(Letter),
    ThankYou,
}

impl PageType {
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Cover => "cover",
            PageType::Intro => "intro",
            PageType::Question => "question",
            PageType::PreResults => "pre-results",
            PageType::Result(Letter::A) => "resultA",
            PageType::Result(Letter::B) => "resultB",
            PageType::Result(Letter::C) => "resultC",
            PageType::Result(Letter::D) => "resultD",
            PageType::ThankYou => "thankyou",
        }
    }

    pub fn is_result(self) -> bool {
        matches!(self, PageType::Result(_))
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cover" => Ok(PageType::Cover),
            "intro" => Ok(PageType::Intro),
            "question" => Ok(PageType::Question),
            "pre-results" => Ok(PageType::PreResults),
            "resultA" => Ok(PageType::Result(Letter::A)),
            "resultB" => Ok(PageType::Result(Letter::B)),
            "resultC" => Ok(PageType::Result(Letter::C)),
            "resultD" => Ok(PageType::Result(Letter::D)),
            "thankyou" => Ok(PageType::ThankYou),
            other => Err(format!("unknown page type '{}'", other)),
        }
    }
}

impl Serialize for PageType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PageType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Kind of an overlay block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Title,
    Description,
    Question,
    Answer,
    Result,
    Other(String),
}

impl BlockKind {
    /// Case-insensitive; `desc` is an alias of `description`.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_lowercase();
        match normalized.as_str() {
            "title" => BlockKind::Title,
            "description" | "desc" => BlockKind::Description,
            "question" => BlockKind::Question,
            "answer" => BlockKind::Answer,
            "result" => BlockKind::Result,
            _ => BlockKind::Other(normalized),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            BlockKind::Title => "title",
            BlockKind::Description => "description",
            BlockKind::Question => "question",
            BlockKind::Answer => "answer",
            BlockKind::Result => "result",
            BlockKind::Other(raw) => raw,
        }
    }
}

impl Serialize for BlockKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Design-space box of a block. Only present when all four coordinates are.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Presentation hints passed through to a renderer untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
}

/// One text or answer overlay on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub text: String,
    #[serde(flatten)]
    pub rect: Option<Rect>,
    #[serde(flatten)]
    pub style: BlockStyle,
    /// Result bucket of an answer block; `None` for other kinds and for
    /// legacy answers whose letter could not be recovered.
    #[serde(rename = "resultType", skip_serializing_if = "Option::is_none")]
    pub letter: Option<Letter>,
}

impl Block {
    pub fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            rect: None,
            style: BlockStyle::default(),
            letter: None,
        }
    }

    pub fn answer(letter: Letter, text: impl Into<String>) -> Self {
        Self {
            letter: Some(letter),
            ..Self::new(BlockKind::Answer, text)
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: BlockStyle) -> Self {
        self.style = style;
        self
    }

    pub fn is_answer(&self) -> bool {
        self.kind == BlockKind::Answer
    }
}

/// One screen of the quiz.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    #[serde(rename = "type")]
    pub kind: PageType,
    #[serde(rename = "bg")]
    pub background: String,
    pub blocks: Vec<Block>,
}

impl Page {
    pub fn new(kind: PageType, background: impl Into<String>) -> Self {
        Self {
            kind,
            background: background.into(),
            blocks: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_blocks(mut self, blocks: Vec<Block>) -> Self {
        self.blocks = blocks;
        self
    }

    /// Answer blocks in document order.
    pub fn answers(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_answer())
    }
}
