use super::{check_quiz_id, QuizSource};
use crate::config::env_setting;
use crate::error::SourceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

/// Configuration for a static file host serving `<origin>/<path>/<id>.json`
#[derive(Debug, Clone)]
pub struct StaticHostConfig {
    pub origin: String,
    pub path: String,
}

impl Default for StaticHostConfig {
    fn default() -> Self {
        Self {
            origin: env_setting("QUIZ_BASE_URL").unwrap_or_else(|| "http://localhost:8000".to_string()),
            path: env_setting("QUIZ_PATH").unwrap_or_else(|| "3c-quiz/quizzes".to_string()),
        }
    }
}

impl StaticHostConfig {
    pub fn new(origin: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StaticHostSource {
    config: StaticHostConfig,
    client: Client,
}

impl Default for StaticHostSource {
    fn default() -> Self {
        Self::new(StaticHostConfig::default())
    }
}

impl StaticHostSource {
    pub fn new(config: StaticHostConfig) -> Self {
        info!(origin = %config.origin, path = %config.path, "Creating static host quiz source");
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Location of the document for `quiz_id`.
    pub fn quiz_url(&self, quiz_id: &str) -> Result<Url, SourceError> {
        let id = check_quiz_id(quiz_id)?;
        let mut url = Url::parse(&self.config.origin).map_err(|e| {
            SourceError::NotConfigured(format!("bad origin '{}': {}", self.config.origin, e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SourceError::NotConfigured(format!("origin '{}' cannot hold a path", self.config.origin))
            })?;
            segments.pop_if_empty();
            segments.extend(self.config.path.split('/').filter(|s| !s.is_empty()));
            segments.push(&format!("{}.json", id));
        }
        Ok(url)
    }
}

#[async_trait]
impl QuizSource for StaticHostSource {
    #[instrument(skip(self), fields(origin = %self.config.origin))]
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        let url = self.quiz_url(quiz_id)?;
        debug!(url = %url, "Fetching quiz document");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            error!(error = %e, "HTTP request failed");
            SourceError::Http(e.to_string())
        })?;

        let status = response.status();
        debug!(status = %status, "Received quiz document response");

        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!("Quiz file not found at: {}", url)));
        }

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %body, "Static host error");
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            SourceError::Http(e.to_string())
        })?;
        let document: Value = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse quiz document JSON");
            SourceError::Json(e)
        })?;

        info!(url = %url, "Fetched quiz document");
        Ok(document)
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        Box::new(self.clone())
    }
}
