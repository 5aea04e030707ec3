use super::{FileSource, MockSource, QuizSource};
use crate::config::env_setting;
use crate::defaults::default_document;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Source kinds that can be picked at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    #[cfg(feature = "static-host")]
    StaticHost,
    #[cfg(feature = "hosted-table")]
    HostedTable,
    File,
    Mock,
}

impl From<SourceType> for Box<dyn QuizSource> {
    fn from(source_type: SourceType) -> Self {
        match source_type {
            #[cfg(feature = "static-host")]
            SourceType::StaticHost => Box::new(super::StaticHostSource::default()),
            #[cfg(feature = "hosted-table")]
            SourceType::HostedTable => Box::new(super::HostedTableSource::default()),
            SourceType::File => Box::new(FileSource::default()),
            SourceType::Mock => {
                // Nobody holds the handle, so every fetch gets the sample quiz.
                // Use FlexibleSource::mock() for a scripted one.
                let (source, _handle) = MockSource::new();
                match serde_json::to_value(default_document()) {
                    Ok(sample) => Box::new(source.with_fallback(sample)),
                    Err(e) => {
                        warn!(error = %e, "Sample quiz could not be encoded, mock source has no fallback");
                        Box::new(source)
                    }
                }
            }
        }
    }
}

impl Default for SourceType {
    /// `QUIZ_SOURCE` if set, else the first backend with settings present,
    /// else local files.
    fn default() -> Self {
        if let Some(choice) = env_setting("QUIZ_SOURCE").and_then(|s| Self::from_str(&s).ok()) {
            return choice;
        }
        configured_table()
            .or_else(configured_host)
            .unwrap_or(Self::File)
    }
}

#[cfg(feature = "hosted-table")]
fn configured_table() -> Option<SourceType> {
    env_setting("QUIZ_TABLE_URL").map(|_| SourceType::HostedTable)
}

#[cfg(not(feature = "hosted-table"))]
fn configured_table() -> Option<SourceType> {
    None
}

#[cfg(feature = "static-host")]
fn configured_host() -> Option<SourceType> {
    env_setting("QUIZ_BASE_URL").map(|_| SourceType::StaticHost)
}

#[cfg(not(feature = "static-host"))]
fn configured_host() -> Option<SourceType> {
    None
}

impl SourceType {
    /// Parse source type from string (case insensitive)
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            #[cfg(feature = "static-host")]
            "static" | "static-host" => Ok(Self::StaticHost),
            #[cfg(feature = "hosted-table")]
            "table" | "hosted-table" => Ok(Self::HostedTable),
            "file" => Ok(Self::File),
            "mock" => Ok(Self::Mock),
            _ => Err(format!(
                "Unknown source type: '{}'. Supported: static, table, file, mock",
                s
            )),
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "static-host")]
            SourceType::StaticHost => write!(f, "static"),
            #[cfg(feature = "hosted-table")]
            SourceType::HostedTable => write!(f, "table"),
            SourceType::File => write!(f, "file"),
            SourceType::Mock => write!(f, "mock"),
        }
    }
}

/// Wraps any source behind a shared handle so it can be swapped as a value.
#[derive(Debug, Clone)]
pub struct FlexibleSource {
    inner: Arc<Mutex<Box<dyn QuizSource>>>,
}

impl Default for FlexibleSource {
    fn default() -> Self {
        Self::from_type(SourceType::default())
    }
}

impl FlexibleSource {
    pub fn new(source: Box<dyn QuizSource>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(source)),
        }
    }

    pub fn from_type(source_type: SourceType) -> Self {
        Self::new(source_type.into())
    }

    /// A flexible mock plus the handle that scripts it
    pub fn mock() -> (Self, Arc<super::MockHandle>) {
        let (source, handle) = MockSource::new();
        (Self::new(Box::new(source)), handle)
    }

    pub fn into_inner(self) -> Box<dyn QuizSource> {
        self.snapshot()
    }

    fn snapshot(&self) -> Box<dyn QuizSource> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone_box()
    }
}

#[async_trait]
impl QuizSource for FlexibleSource {
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        // Clone out of the mutex so it is not held across the await
        let source = self.snapshot();
        source.fetch(quiz_id).await
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        Box::new(self.clone())
    }
}
