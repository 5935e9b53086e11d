//! Scripted completion backend for tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use super::client::{CompletionBackend, CompletionRequest};
use super::error::AiError;

type ErrorFactory = Arc<dyn Fn() -> AiError + Send + Sync>;

#[derive(Clone)]
pub enum Script {
    Reply(String),
    Fail(ErrorFactory),
    /// Never resolves
    Hang,
    /// Replies once the notify is triggered
    Gated(Arc<Notify>, String),
}

impl Script {
    pub fn reply(text: impl Into<String>) -> Self {
        Self::Reply(text.into())
    }

    pub fn fail(f: impl Fn() -> AiError + Send + Sync + 'static) -> Self {
        Self::Fail(Arc::new(f))
    }
}

struct Rule {
    system: Option<&'static str>,
    user_contains: Option<String>,
    script: Script,
}

impl Rule {
    fn matches(&self, request: &CompletionRequest) -> bool {
        self.system.is_none_or(|s| request.system == s)
            && self
                .user_contains
                .as_deref()
                .is_none_or(|needle| request.user.contains(needle))
    }
}

/// Answers requests from a list of rules; first match wins
pub struct ScriptedBackend {
    rules: Vec<Rule>,
    default: Script,
    recorded: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            default: Script::fail(|| AiError::EmptyResponse),
            recorded: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn reply_with(mut self, text: &str) -> Self {
        self.default = Script::reply(text);
        self
    }

    pub fn fail_with(mut self, f: impl Fn() -> AiError + Send + Sync + 'static) -> Self {
        self.default = Script::fail(f);
        self
    }

    pub fn hang(mut self) -> Self {
        self.default = Script::Hang;
        self
    }

    /// Rule for every request of one flow (matched by system prompt)
    pub fn on_flow(mut self, system: &'static str, script: Script) -> Self {
        self.rules.push(Rule {
            system: Some(system),
            user_contains: None,
            script,
        });
        self
    }

    /// Rule for requests of one flow whose user content contains `needle`
    pub fn on(mut self, system: &'static str, needle: &str, script: Script) -> Self {
        self.rules.push(Rule {
            system: Some(system),
            user_contains: Some(needle.to_string()),
            script,
        });
        self
    }

    pub fn recorder(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        Arc::clone(&self.recorded)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, request: CompletionRequest) -> Result<String, AiError> {
        let script = self
            .rules
            .iter()
            .find(|r| r.matches(&request))
            .map(|r| r.script.clone())
            .unwrap_or_else(|| self.default.clone());

        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(request);
        }

        match script {
            Script::Reply(text) => Ok(text),
            Script::Fail(f) => Err(f()),
            Script::Hang => std::future::pending().await,
            Script::Gated(gate, text) => {
                gate.notified().await;
                Ok(text)
            }
        }
    }
}
