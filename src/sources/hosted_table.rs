use super::{check_quiz_id, QuizSource};
use crate::config::{env_setting, split_list, KeyFromEnv};
use crate::error::SourceError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

/// Columns tried, in order, when matching the quiz identifier.
pub const DEFAULT_LOOKUP_COLUMNS: [&str; 5] = ["quiz_url", "slug", "quizUrl", "url", "id"];

/// Row fields that may carry the document when the row itself is not one.
const DOCUMENT_FIELDS: [&str; 4] = ["content", "config", "data", "quiz"];

/// Configuration for a hosted REST table (`<base>/rest/v1/<table>`)
#[derive(Debug, Clone)]
pub struct HostedTableConfig {
    pub base_url: String,
    pub table: String,
    pub api_key: String,
    pub columns: Vec<String>,
}

impl KeyFromEnv for HostedTableConfig {
    const KEY_NAME: &'static str = "QUIZ_TABLE_KEY";
}

impl Default for HostedTableConfig {
    fn default() -> Self {
        Self {
            base_url: env_setting("QUIZ_TABLE_URL").unwrap_or_default(),
            table: env_setting("QUIZ_TABLE_NAME").unwrap_or_else(|| "quizzes".to_string()),
            api_key: Self::find_key().unwrap_or_default(),
            columns: env_setting("QUIZ_TABLE_COLUMNS")
                .map(|raw| split_list(&raw))
                .filter(|columns| !columns.is_empty())
                .unwrap_or_else(|| DEFAULT_LOOKUP_COLUMNS.iter().map(|c| c.to_string()).collect()),
        }
    }
}

impl HostedTableConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>, table: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            table: table.into(),
            api_key: api_key.into(),
            columns: DEFAULT_LOOKUP_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }

    #[must_use]
    pub fn with_columns(mut self, columns: Vec<String>) -> Self {
        self.columns = columns;
        self
    }
}

#[derive(Debug, Clone)]
pub struct HostedTableSource {
    config: HostedTableConfig,
    client: Client,
}

impl Default for HostedTableSource {
    fn default() -> Self {
        Self::new(HostedTableConfig::default())
    }
}

impl HostedTableSource {
    pub fn new(config: HostedTableConfig) -> Self {
        info!(base_url = %config.base_url, table = %config.table, "Creating hosted table quiz source");
        Self {
            config,
            client: Client::new(),
        }
    }

    /// Query matching `column = quiz_id`, at most one row.
    pub fn lookup_url(&self, column: &str, quiz_id: &str) -> Result<Url, SourceError> {
        if self.config.base_url.is_empty() {
            return Err(SourceError::NotConfigured("QUIZ_TABLE_URL is not set".to_string()));
        }
        let mut url = Url::parse(&self.config.base_url).map_err(|e| {
            SourceError::NotConfigured(format!("bad table url '{}': {}", self.config.base_url, e))
        })?;
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                SourceError::NotConfigured(format!("table url '{}' cannot hold a path", self.config.base_url))
            })?;
            segments.pop_if_empty().extend(["rest", "v1", self.config.table.as_str()]);
        }
        url.query_pairs_mut()
            .append_pair(column, &format!("eq.{}", quiz_id))
            .append_pair("select", "*")
            .append_pair("limit", "1");
        Ok(url)
    }

    async fn lookup(&self, column: &str, quiz_id: &str) -> Result<Option<Value>, SourceError> {
        let url = self.lookup_url(column, quiz_id)?;
        debug!(url = %url, column, "Querying quiz table");

        let response = self
            .client
            .get(url)
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request failed");
                SourceError::Http(e.to_string())
            })?;

        let status = response.status();
        // An unknown column is rejected with 400; move on to the next candidate.
        if status == StatusCode::BAD_REQUEST {
            debug!(column, "Column rejected by table, trying next");
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            error!(status = %status, "Quiz table authentication failed");
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %body, "Quiz table error");
            return Err(SourceError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read response body");
            SourceError::Http(e.to_string())
        })?;
        let rows: Value = serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to parse quiz table response JSON");
            SourceError::Json(e)
        })?;

        Ok(first_row(rows))
    }
}

/// First row of a table response, which is normally an array of rows.
pub fn first_row(rows: Value) -> Option<Value> {
    match rows {
        Value::Array(rows) => rows.into_iter().next(),
        Value::Object(row) => Some(Value::Object(row)),
        _ => None,
    }
}

/// The quiz document held by a table row.
///
/// A row with `pages` is the document. Otherwise the first of `content`,
/// `config`, `data`, `quiz` holding an object (or a JSON string of one) is.
/// A row matching neither is returned as-is and fails document validation.
pub fn document_from_row(row: Value) -> Result<Value, SourceError> {
    if row.get("pages").is_some() {
        return Ok(row);
    }
    for field in DOCUMENT_FIELDS {
        match row.get(field) {
            Some(Value::Object(_)) => return Ok(row[field].clone()),
            Some(Value::String(encoded)) => {
                if let Ok(document @ Value::Object(_)) = serde_json::from_str::<Value>(encoded) {
                    return Ok(document);
                }
            }
            _ => {}
        }
    }
    warn!("Table row has no recognizable quiz document field");
    Ok(row)
}

#[async_trait]
impl QuizSource for HostedTableSource {
    #[instrument(skip(self), fields(table = %self.config.table))]
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        let id = check_quiz_id(quiz_id)?;

        for column in &self.config.columns {
            if let Some(row) = self.lookup(column, id).await? {
                info!(column = %column, "Found quiz row");
                return document_from_row(row);
            }
        }

        warn!(quiz_id = id, "No quiz row matched any lookup column");
        Err(SourceError::NotFound(format!(
            "no row in '{}' matches '{}'",
            self.config.table, id
        )))
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        Box::new(self.clone())
    }
}
