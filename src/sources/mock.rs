use super::QuizSource;
use crate::error::SourceError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// One scripted reply of a [`MockSource`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Document(Value),
    NotFound,
    Failure(String),
}

/// Controls a [`MockSource`] from the outside: queue replies, inspect calls.
#[derive(Debug, Default)]
pub struct MockHandle {
    responses: Mutex<VecDeque<MockResponse>>,
    requests: Mutex<Vec<String>>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.lock_responses().push_back(response);
    }

    pub fn add_document(&self, document: Value) {
        self.add_response(MockResponse::Document(document));
    }

    /// Quiz ids requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn pending(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<MockResponse>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Source replaying queued responses in order, for tests and demos.
#[derive(Debug, Clone)]
pub struct MockSource {
    handle: Arc<MockHandle>,
    /// Served when nothing is queued.
    fallback: Option<Value>,
}

impl MockSource {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (
            Self {
                handle: handle.clone(),
                fallback: None,
            },
            handle,
        )
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (source, handle) = Self::new();
        for response in responses {
            handle.add_response(response);
        }
        (source, handle)
    }

    /// Serve `document` whenever the queue is empty.
    #[must_use]
    pub fn with_fallback(mut self, document: Value) -> Self {
        self.fallback = Some(document);
        self
    }
}

#[async_trait]
impl QuizSource for MockSource {
    async fn fetch(&self, quiz_id: &str) -> Result<Value, SourceError> {
        self.handle
            .requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(quiz_id.to_string());

        match self.handle.lock_responses().pop_front() {
            Some(MockResponse::Document(document)) => Ok(document),
            Some(MockResponse::NotFound) => Err(SourceError::NotFound(quiz_id.to_string())),
            Some(MockResponse::Failure(message)) => Err(SourceError::Mock(message)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| SourceError::Mock("no mock responses queued".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn QuizSource> {
        Box::new(self.clone())
    }
}
