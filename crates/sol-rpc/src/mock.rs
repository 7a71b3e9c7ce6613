//! In-memory [`RpcTransport`] that answers from a closure.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::{ClientError, ClientResult};
use crate::transport::RpcTransport;

/// What the mock endpoint does with one request.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// `{"result": value}`
    Result(Value),
    /// `{"error": value}`
    Error(Value),
    /// Fails before any envelope, like a refused connection.
    TransportFailure(String),
}

type Handler = dyn Fn(&str, &Value) -> MockReply + Send + Sync;

pub struct MockTransport {
    handler: Box<Handler>,
    calls: Mutex<Vec<(String, Value)>>,
}

impl MockTransport {
    /// `handler` receives the method name and params of each request.
    pub fn new(handler: impl Fn(&str, &Value) -> MockReply + Send + Sync + 'static) -> Self {
        Self {
            handler: Box::new(handler),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// An endpoint that refuses every request.
    pub fn unreachable() -> Self {
        Self::new(|_, _| MockReply::TransportFailure("connection refused".into()))
    }

    /// Methods called so far, in order.
    pub fn methods(&self) -> Vec<String> {
        self.calls
            .lock()
            .map(|calls| calls.iter().map(|(m, _)| m.clone()).collect())
            .unwrap_or_default()
    }

    /// Params of every call to `method`.
    pub fn params_of(&self, method: &str) -> Vec<Value> {
        self.calls
            .lock()
            .map(|calls| {
                calls
                    .iter()
                    .filter(|(m, _)| m == method)
                    .map(|(_, p)| p.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn post(&self, body: &Value) -> ClientResult<Value> {
        let method = body
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = body.get("params").cloned().unwrap_or(Value::Null);
        let id = body.get("id").cloned().unwrap_or(Value::Null);

        let reply = (self.handler)(&method, &params);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((method, params));
        }

        match reply {
            MockReply::Result(result) => Ok(json!({"jsonrpc": "2.0", "id": id, "result": result})),
            MockReply::Error(error) => Ok(json!({"jsonrpc": "2.0", "id": id, "error": error})),
            MockReply::TransportFailure(reason) => Err(ClientError::Transport(reason)),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://"
    }
}

/// `getBalance`-style result with a context slot.
pub fn with_context(value: Value) -> Value {
    json!({"context": {"slot": 1}, "value": value})
}
