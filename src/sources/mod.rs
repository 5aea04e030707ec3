//! Where quiz documents come from.
//!
//! Every source answers one question: given a quiz identifier, produce the
//! raw JSON document (or fail). Parsing and validation happen elsewhere, in
//! [`crate::document`].

use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

pub mod file;
pub mod flexible;
#[cfg(feature = "hosted-table")]
pub mod hosted_table;
pub mod mock;
#[cfg(feature = "static-host")]
pub mod static_host;

pub use file::*;
pub use flexible::*;
#[cfg(feature = "hosted-table")]
pub use hosted_table::*;
pub use mock::*;
#[cfg(feature = "static-host")]
pub use static_host::*;

/// Retrieval of a raw quiz document by identifier.
#[async_trait]
pub trait QuizSource: Send + Sync + Debug {
    /// The only method that implementations must provide
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError>;

    /// Clone this source into a boxed trait object
    fn clone_box(&self) -> Box<dyn QuizSource>;
}

impl Clone for Box<dyn QuizSource> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[async_trait]
impl QuizSource for Box<dyn QuizSource> {
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        self.as_ref().fetch(quiz_id).await
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        self.as_ref().clone_box()
    }
}

/// Reject identifiers that could escape a path or URL segment.
pub(crate) fn check_quiz_id(quiz_id: &str) -> Result<&str, SourceError> {
    let id = quiz_id.trim();
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(SourceError::NotFound(format!("invalid quiz id '{}'", quiz_id)));
    }
    Ok(id)
}
