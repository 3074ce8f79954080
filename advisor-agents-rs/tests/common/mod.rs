//! Shared helpers for the advisor integration tests
//!
//! `StubGateway` replays scripted replies without any network; it records
//! every request it receives so tests can check prompts and sampling.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use advisor_agents::AgentKind;
use async_trait::async_trait;
use llm_gateway::{Completion, FailureKind, GatewayError, GatewayRequest, GatewayResult, LlmGateway};
use serde_json::Value;

type Responder = Box<dyn Fn(&GatewayRequest) -> GatewayResult<Completion> + Send + Sync>;

pub struct StubGateway {
    responder: Responder,
    calls: AtomicUsize,
    seen: Mutex<Vec<GatewayRequest>>,
}

impl StubGateway {
    pub fn new(
        responder: impl Fn(&GatewayRequest) -> GatewayResult<Completion> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Same reply text for every request
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Ok(completion(&text)))
    }

    /// Every request fails with `kind`
    pub fn failing(kind: FailureKind, message: &str) -> Self {
        let message = message.to_string();
        Self::new(move |_| Err(GatewayError::new(kind, message.clone())))
    }

    /// Reply chosen by which advisor built the prompt
    pub fn routed(route: impl Fn(Option<AgentKind>) -> String + Send + Sync + 'static) -> Self {
        Self::new(move |request| Ok(completion(&route(prompt_owner(request.prompt())))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<GatewayRequest> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for StubGateway {
    fn default_model(&self) -> &str {
        "stub-model"
    }

    async fn invoke(&self, request: &GatewayRequest) -> GatewayResult<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }
}

pub fn completion(text: &str) -> Completion {
    Completion {
        text: text.to_string(),
        raw: Value::Null,
    }
}

/// Which advisor wrote a prompt; `None` for the unsafe-query preview prompt
pub fn prompt_owner(prompt: &str) -> Option<AgentKind> {
    if prompt.contains("performance tuning specialist") {
        Some(AgentKind::QueryOptimizer)
    } else if prompt.contains("estimate query cost") {
        Some(AgentKind::CostAdvisor)
    } else if prompt.contains("schema design") {
        Some(AgentKind::SchemaAdvisor)
    } else if prompt.contains("data-quality problems") {
        Some(AgentKind::DataValidator)
    } else {
        None
    }
}
