use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::AiError;
use crate::session::GenerativeClient;

/// A scripted response for [`MockClient`].
#[derive(Debug, Clone)]
pub enum MockResponse {
    Success(String),
    Error(String),
}

/// Shared handle for queueing responses onto a [`MockClient`] after creation.
#[derive(Debug, Default)]
pub struct MockHandle {
    queue: Mutex<VecDeque<MockResponse>>,
}

impl MockHandle {
    pub fn add_response(&self, response: MockResponse) {
        self.queue.lock().unwrap().push_back(response);
    }

    pub fn pending(&self) -> usize {
        self.queue.lock().unwrap().len()
    }

    fn next(&self) -> Option<MockResponse> {
        self.queue.lock().unwrap().pop_front()
    }
}

/// Mock client that pops queued responses per call; an empty queue is an
/// error so tests fail loudly on unexpected extra calls.
#[derive(Debug, Clone)]
pub struct MockClient {
    handle: Arc<MockHandle>,
}

impl MockClient {
    pub fn new() -> (Self, Arc<MockHandle>) {
        let handle = Arc::new(MockHandle::default());
        (Self { handle: handle.clone() }, handle)
    }

    pub fn with_responses(responses: Vec<MockResponse>) -> (Self, Arc<MockHandle>) {
        let (client, handle) = Self::new();
        for response in responses {
            handle.add_response(response);
        }
        (client, handle)
    }
}

#[async_trait]
impl GenerativeClient for MockClient {
    async fn generate_raw(&self, _prompt: String) -> Result<String, AiError> {
        match self.handle.next() {
            Some(MockResponse::Success(text)) => Ok(text),
            Some(MockResponse::Error(message)) => Err(AiError::Mock(message)),
            None => Err(AiError::Mock("no queued responses".to_string())),
        }
    }

    fn clone_box(&self) -> Box<dyn GenerativeClient> {
        Box::new(self.clone())
    }
}
