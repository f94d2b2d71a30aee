/*!
 * Mock provider implementation for testing.
 *
 * The mock answers from a script of canned replies and records every
 * request it receives:
 * - `MockProvider::scripted(..)` - Replies in order, fails once the script runs out
 * - `MockProvider::failing()` - Always fails with an error
 * - `MockProvider::empty()` - Always replies with an empty string
 * - `MockProvider::slow(..)` - Scripted replies after a delay
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// Mock request for testing
#[derive(Debug, Clone)]
pub struct MockRequest {
    /// The full prompt
    pub prompt: String,
    /// Whether a JSON reply was requested
    pub json_mode: bool,
}

impl MockRequest {
    pub fn new(prompt: impl Into<String>, json_mode: bool) -> Self {
        Self {
            prompt: prompt.into(),
            json_mode,
        }
    }
}

/// Mock response for testing
#[derive(Debug, Clone)]
pub struct MockResponse {
    /// The reply text
    pub text: String,
}

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Replies from the script
    Scripted,
    /// Always fails with an error
    Failing,
    /// Returns empty response
    Empty,
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing collaborator behavior
///
/// Clones share the script, the counter and the request log.
#[derive(Debug, Clone)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Replies still to be handed out
    script: Arc<Mutex<VecDeque<String>>>,
    /// Request counter
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<MockRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior and script
    pub fn new<I, S>(behavior: MockBehavior, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            behavior,
            script: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a mock that hands out `replies` in order
    pub fn scripted<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::Scripted, replies)
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing, Vec::<String>::new())
    }

    /// Create a mock that returns empty responses
    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty, Vec::<String>::new())
    }

    /// Create a mock that waits before each scripted reply
    pub fn slow<I, S>(delay_ms: u64, replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(MockBehavior::Slow { delay_ms }, replies)
    }

    /// Number of requests received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// All requests received so far
    pub fn requests(&self) -> Vec<MockRequest> {
        self.requests.lock().clone()
    }

    /// The most recent request
    pub fn last_request(&self) -> Option<MockRequest> {
        self.requests.lock().last().cloned()
    }

    fn next_reply(&self) -> Result<String, ProviderError> {
        self.script.lock().pop_front().ok_or_else(|| ProviderError::ApiError {
            status_code: 500,
            message: "Mock script exhausted".to_string(),
        })
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Request = MockRequest;
    type Response = MockResponse;

    async fn complete(&self, request: Self::Request) -> Result<Self::Response, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request);

        let text = match self.behavior {
            MockBehavior::Scripted => self.next_reply()?,
            MockBehavior::Failing => {
                return Err(ProviderError::ApiError {
                    message: "Simulated provider failure".to_string(),
                    status_code: 500,
                })
            }
            MockBehavior::Empty => String::new(),
            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                self.next_reply()?
            }
        };

        Ok(MockResponse { text })
    }

    fn extract_text(response: &Self::Response) -> String {
        response.text.clone()
    }
}
