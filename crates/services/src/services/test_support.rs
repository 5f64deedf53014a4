//! In-memory doubles for the transport, notifier and confirmation prompt.

use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use super::{
    deletion::Confirmation,
    graphql::{GraphQlClientError, GraphQlRequest, GraphQlTransport},
    notification::{Notification, Notifier},
};

type Scripted = Result<Value, GraphQlClientError>;

struct Reply {
    result: Scripted,
    served: bool,
}

/// Replies per operation name. The last queued reply for an operation repeats
/// until a new one is scripted.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<GraphQlRequest>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, operation: &str, data: Value) {
        self.push(operation, Ok(data));
    }

    pub fn fail(&self, operation: &str, error: GraphQlClientError) {
        self.push(operation, Err(error));
    }

    fn push(&self, operation: &str, result: Scripted) {
        let mut replies = self.replies.lock().unwrap();
        let queue = replies.entry(operation.to_string()).or_default();
        queue.retain(|reply| !reply.served);
        queue.push_back(Reply {
            result,
            served: false,
        });
    }

    /// Park every `operation` call after it is recorded until the returned
    /// gate is notified.
    pub fn hold(&self, operation: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(operation.to_string(), gate.clone());
        gate
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.operation() == operation)
            .count()
    }

    pub fn requests_for(&self, operation: &str) -> Vec<GraphQlRequest> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.operation() == operation)
            .cloned()
            .collect()
    }

    pub fn total_calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl GraphQlTransport for ScriptedTransport {
    async fn execute(&self, request: GraphQlRequest) -> Result<Value, GraphQlClientError> {
        let operation = request.operation().to_string();
        self.requests.lock().unwrap().push(request);

        let gate = self.gates.lock().unwrap().get(&operation).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let mut replies = self.replies.lock().unwrap();
        let queue = replies.get_mut(&operation).unwrap_or_else(|| {
            panic!("no scripted reply for operation {operation}");
        });
        if queue.len() > 1 {
            queue.pop_front().unwrap().result
        } else {
            let reply = queue.front_mut().unwrap();
            reply.served = true;
            reply.result.clone()
        }
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Answers every prompt with a fixed choice and counts how often it was asked.
pub struct FixedConfirmation {
    answer: bool,
    asked: AtomicUsize,
}

impl FixedConfirmation {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: AtomicUsize::new(0),
        }
    }

    pub fn asked(&self) -> usize {
        self.asked.load(Ordering::SeqCst)
    }
}

impl Confirmation for FixedConfirmation {
    fn confirm(&self, _prompt: &str) -> bool {
        self.asked.fetch_add(1, Ordering::SeqCst);
        self.answer
    }
}
