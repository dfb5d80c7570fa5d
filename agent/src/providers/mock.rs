use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use backchat_core::{ContentBlock, ModelProvider, ModelRequest, ModelResponse};

/// A mock provider that replays canned responses, for harnesses and tests.
pub struct MockProvider {
    name: String,
    responses: Mutex<VecDeque<ModelResponse>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            responses: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_response(self, content: Vec<ContentBlock>) -> Self {
        self.responses.lock().unwrap().push_back(ModelResponse {
            content,
            model: "mock".to_string(),
            stop_reason: None,
        });
        self
    }

    pub fn with_text_response(self, text: impl Into<String>) -> Self {
        self.with_response(vec![ContentBlock::Text { text: text.into() }])
    }
}

#[async_trait]
impl ModelProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, _request: &ModelRequest) -> Result<ModelResponse> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("mock provider has no responses left"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_responses_in_order() {
        let provider = MockProvider::new("mock")
            .with_text_response("first")
            .with_text_response("second");
        let request = ModelRequest {
            system: String::new(),
            messages: vec![backchat_core::Turn::user_text("hi")],
            tools: vec![],
            max_tokens: 100,
            temperature: 0.0,
        };

        assert_eq!(provider.complete(&request).await.unwrap().text(), "first");
        assert_eq!(provider.complete(&request).await.unwrap().text(), "second");
        assert!(provider.complete(&request).await.is_err());
    }
}
