use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Quiz source error: {0}")]
    Source(#[from] SourceError),
    #[error("Malformed quiz document: {0}")]
    Document(#[from] DocumentError),
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
}

impl QuizError {
    /// Whether the player can move away from the error without reloading.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, QuizError::Navigation(_))
    }
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("Quiz not found: {0}")]
    NotFound(String),
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid JSON from source: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Source not configured: {0}")]
    NotConfigured(String),
    #[error("Mock source error: {0}")]
    Mock(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("quiz document is not a JSON object")]
    NotAnObject,
    #[error("quiz document has no `pages` field")]
    MissingPages,
    #[error("`pages` is not an array, an encoded array or a keyed object")]
    PagesNotArray,
    #[error("`pages` string is not valid JSON: {0}")]
    EmbeddedPages(#[source] serde_json::Error),
    #[error("quiz document has no pages")]
    Empty,
    #[error("page {index} is not an object")]
    PageNotObject { index: usize },
    #[error("page {index} has no `type`")]
    MissingType { index: usize },
    #[error("page {index} has unknown type `{value}`")]
    UnknownType { index: usize, value: String },
    #[error("answer block {block} on page {page} has no result letter")]
    MissingAnswerLetter { page: usize, block: usize },
    #[error("`showResult` must be one of A, B, C, D (got `{0}`)")]
    InvalidShowResult(String),
    #[error("page {index} is malformed: {reason}")]
    Page { index: usize, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Invalid page data at index {index}")]
    InvalidPage { index: usize },
}
