#![forbid(unsafe_code)]

use super::{Backend, CheckpointStore, StoreError, validate_checkpoint_key};
use scene_core::CheckpointData;
use serde_json::{Value, json};
use std::time::Duration;

const KEY_PREFIX: &str = "checkpoint:";

/// Executes one key-value command and returns its `result` payload.
pub trait KvTransport: Send + Sync {
    fn command(&self, command: &[Value]) -> Result<Value, StoreError>;
}

/// Redis-over-REST transport: each command is POSTed as a JSON array to the
/// endpoint with a bearer token; the reply is `{"result": ...}` or
/// `{"error": "..."}`.
#[derive(Debug)]
pub struct RestKvTransport {
    client: reqwest::blocking::Client,
    url: String,
    token: String,
}

impl RestKvTransport {
    pub fn new(url: &str, token: &str, timeout: Duration) -> Result<Self, StoreError> {
        let url = url.trim().trim_end_matches('/').to_string();
        if url.is_empty() {
            return Err(StoreError::InvalidInput("remote store url must not be empty"));
        }
        if token.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "remote store token must not be empty",
            ));
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            url,
            token: token.trim().to_string(),
        })
    }
}

impl KvTransport for RestKvTransport {
    fn command(&self, command: &[Value]) -> Result<Value, StoreError> {
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(command)
            .send()?;
        let status = res.status();
        let body = res.text()?;
        let parsed = serde_json::from_str::<Value>(&body).ok();

        if let Some(message) = parsed
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(|v| v.as_str())
        {
            return Err(StoreError::Remote(message.to_string()));
        }
        if !status.is_success() {
            return Err(StoreError::Remote(format!("request failed with status {status}")));
        }
        let Some(mut reply) = parsed else {
            return Err(StoreError::Remote("reply is not JSON".to_string()));
        };
        Ok(reply
            .get_mut("result")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Durable store backed by a remote key-value service. Every write sets an
/// expiry of `ttl` (rounded up to whole seconds).
pub struct RemoteStore<T = RestKvTransport> {
    transport: T,
    ttl: Duration,
}

impl RemoteStore<RestKvTransport> {
    pub fn connect(
        url: &str,
        token: &str,
        timeout: Duration,
        ttl: Duration,
    ) -> Result<Self, StoreError> {
        Ok(Self::with_transport(
            RestKvTransport::new(url, token, timeout)?,
            ttl,
        ))
    }
}

impl<T: KvTransport> RemoteStore<T> {
    pub fn with_transport(transport: T, ttl: Duration) -> Self {
        Self { transport, ttl }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn ttl_secs(&self) -> u64 {
        let secs = self.ttl.as_secs();
        let secs = if self.ttl.subsec_nanos() > 0 {
            secs.saturating_add(1)
        } else {
            secs
        };
        secs.max(1)
    }
}

pub(crate) fn checkpoint_key(id: &str) -> String {
    format!("{KEY_PREFIX}{id}")
}

impl<T: KvTransport> CheckpointStore for RemoteStore<T> {
    fn backend(&self) -> Backend {
        Backend::Remote
    }

    fn save(&self, id: &str, data: &CheckpointData) -> Result<(), StoreError> {
        validate_checkpoint_key(id)?;
        let payload = serde_json::to_string(data)?;
        self.transport.command(&[
            json!("SET"),
            json!(checkpoint_key(id)),
            Value::String(payload),
            json!("EX"),
            json!(self.ttl_secs().to_string()),
        ])?;
        Ok(())
    }

    fn load(&self, id: &str) -> Result<Option<CheckpointData>, StoreError> {
        let reply = self
            .transport
            .command(&[json!("GET"), json!(checkpoint_key(id))])?;
        match reply {
            Value::Null => Ok(None),
            Value::String(raw) if raw.is_empty() => Ok(None),
            Value::String(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            other => Ok(Some(serde_json::from_value(other)?)),
        }
    }
}
