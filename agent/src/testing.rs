//! Shared test doubles for the phase loops: a scripted console and a
//! queued-response provider, substituted at the trait seams so the tests
//! never block on real input or network.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use backchat_core::{
    Console, ContentBlock, ModelProvider, ModelRequest, ModelResponse, StrategyLibrary,
};

pub fn temp_library() -> StrategyLibrary {
    let root = std::env::temp_dir().join(format!("backchat-agent-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&root).unwrap();
    StrategyLibrary::new(root)
}

/// Console that replays a fixed input script and records everything shown.
pub struct ScriptedConsole {
    inputs: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    printed: Mutex<Vec<String>>,
    clears: AtomicUsize,
}

impl ScriptedConsole {
    pub fn new(inputs: Vec<&str>) -> Self {
        Self {
            inputs: Mutex::new(inputs.into_iter().map(String::from).collect()),
            prompts: Mutex::new(Vec::new()),
            printed: Mutex::new(Vec::new()),
            clears: AtomicUsize::new(0),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.lock().unwrap().clone()
    }

    pub fn clears(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl Console for ScriptedConsole {
    fn print(&self, text: &str) {
        self.printed.lock().unwrap().push(text.to_string());
    }

    fn print_markdown(&self, text: &str) {
        self.printed.lock().unwrap().push(text.to_string());
    }

    fn input(&self, prompt: &str) -> io::Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.inputs
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }

    fn clear(&self) {
        self.clears.fetch_add(1, Ordering::SeqCst);
    }
}

/// Provider that pops canned responses off a queue and captures every request
/// it was sent.
pub struct QueuedProvider {
    responses: Mutex<VecDeque<ModelResponse>>,
    requests: Mutex<Vec<ModelRequest>>,
}

impl QueuedProvider {
    pub fn new(responses: Vec<ModelResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for text-only scripts.
    pub fn with_texts(texts: Vec<&str>) -> Self {
        Self::new(
            texts
                .into_iter()
                .map(|text| response(vec![ContentBlock::Text {
                    text: text.to_string(),
                }]))
                .collect(),
        )
    }

    pub fn requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn response(content: Vec<ContentBlock>) -> ModelResponse {
    ModelResponse {
        content,
        model: "scripted".to_string(),
        stop_reason: None,
    }
}

#[async_trait]
impl ModelProvider for QueuedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &ModelRequest) -> Result<ModelResponse> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("response script exhausted"))
    }
}
