//! Scripted backend for exercising the pipeline without a network.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::Notify;

use crate::transport::{QueryBackend, QueryRequest, TransportError};

#[derive(Clone)]
pub(crate) enum Step {
    Respond { delay: Duration, payload: Value },
    Fail(TransportError),
    /// Never resolves; only a timeout gets the caller out.
    Hang,
    /// Resolves with the payload once the gate is notified.
    Gate { gate: Arc<Notify>, payload: Value },
}

impl Step {
    pub(crate) fn respond(payload: Value) -> Self {
        Step::Respond {
            delay: Duration::ZERO,
            payload,
        }
    }

    pub(crate) fn respond_after(millis: u64, payload: Value) -> Self {
        Step::Respond {
            delay: Duration::from_millis(millis),
            payload,
        }
    }
}

type Script = Box<dyn Fn(u32) -> Step + Send + Sync>;

pub(crate) struct StubBackend {
    script: Script,
    calls: AtomicU32,
    requests: Mutex<Vec<QueryRequest>>,
}

impl StubBackend {
    /// `script` maps the zero-based attempt number to what happens on it.
    pub(crate) fn scripted(script: impl Fn(u32) -> Step + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            script: Box::new(script),
            calls: AtomicU32::new(0),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn always(step: Step) -> Arc<Self> {
        Self::scripted(move |_| step.clone())
    }

    pub(crate) fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<QueryRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryBackend for StubBackend {
    async fn post_query(&self, request: &QueryRequest) -> Result<Value, TransportError> {
        let attempt = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());

        match (self.script)(attempt) {
            Step::Respond { delay, payload } => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                Ok(payload)
            }
            Step::Fail(err) => Err(err),
            Step::Hang => std::future::pending().await,
            Step::Gate { gate, payload } => {
                gate.notified().await;
                Ok(payload)
            }
        }
    }
}
