use super::{check_quiz_id, QuizSource};
use crate::config::env_setting;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, instrument};

/// Reads `<dir>/<quiz_id>.json` from the local file system.
#[derive(Debug, Clone)]
pub struct FileSource {
    base_path: PathBuf,
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new(env_setting("QUIZ_DIR").unwrap_or_else(|| "quizzes".to_string()))
    }
}

impl FileSource {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    pub fn path_for(&self, quiz_id: &str) -> Result<PathBuf, SourceError> {
        let id = check_quiz_id(quiz_id)?;
        Ok(self.base_path.join(format!("{}.json", id)))
    }
}

#[async_trait]
impl QuizSource for FileSource {
    #[instrument(skip(self), fields(base_path = %self.base_path.display()))]
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        let path = self.path_for(quiz_id)?;
        debug!(path = %path.display(), "Reading quiz document");

        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SourceError::NotFound(format!(
                    "Quiz file not found at: {}",
                    path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&text)?)
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        Box::new(self.clone())
    }
}
