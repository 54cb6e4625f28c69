//! Invocation Recorder Module
//!
//! Counts calls to named operations and keeps their argument and result
//! histories in the store.
//!
//! For an operation identity `id` the store holds:
//! - `id` - call counter
//! - `id:inputs` - list of JSON-encoded argument tuples
//! - `id:outputs` - list of JSON-encoded results, index-aligned with inputs

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde_json::json;
use tracing::debug;

use crate::cache::decode;
use crate::error::{CacheError, Result};
use crate::store::SharedStore;

pub fn inputs_key(identity: &str) -> String {
    format!("{}:inputs", identity)
}

pub fn outputs_key(identity: &str) -> String {
    format!("{}:outputs", identity)
}

// == Invocation Recorder ==
#[derive(Clone)]
pub struct InvocationRecorder {
    store: SharedStore,
}

impl InvocationRecorder {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    // == Record ==
    /// Runs `op(args)` as one recorded invocation of `identity`.
    ///
    /// The counter is bumped and the arguments appended before `op` runs; the
    /// result is appended afterwards. A failed `op` still appends an
    /// `{"error": ...}` output so inputs and outputs stay aligned, then the
    /// error is returned unchanged.
    ///
    /// The invocation runs on its own task: dropping the returned future
    /// (timeout, client disconnect) does not stop it, so every recorded input
    /// still gets its output.
    pub async fn record<A, T, F, Fut>(&self, identity: &str, args: A, op: F) -> Result<T>
    where
        A: Serialize + Send + 'static,
        T: Serialize + Send + 'static,
        F: FnOnce(A) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let store = self.store.clone();
        let identity = identity.to_string();

        let invocation = tokio::spawn(async move {
            let input = serde_json::to_vec(&args)?;
            let calls = store.incr(&identity).await?;
            store.rpush(&inputs_key(&identity), input).await?;
            debug!(identity = %identity, calls, "recording invocation");

            let outcome = op(args).await;

            let output = match &outcome {
                Ok(value) => serde_json::to_vec(value)?,
                Err(err) => serde_json::to_vec(&json!({ "error": err.to_string() }))?,
            };
            store.rpush(&outputs_key(&identity), output).await?;

            outcome
        });

        invocation
            .await
            .map_err(|err| CacheError::Internal(format!("recorded invocation aborted: {}", err)))?
    }

    // == Call Count ==
    /// Number of recorded invocations of `identity`; 0 if never called.
    pub async fn call_count(&self, identity: &str) -> Result<u64> {
        match self.store.get(identity).await? {
            Some(raw) => decode::integer(&raw)
                .ok()
                .and_then(|n| u64::try_from(n).ok())
                .ok_or_else(|| {
                    CacheError::WrongType(format!("key '{}' is not a call counter", identity))
                }),
            None => Ok(0),
        }
    }

    // == Replay ==
    /// Reads the full history of `identity`. Does not modify anything.
    pub async fn replay(&self, identity: &str) -> Result<CallHistory> {
        let calls = self.call_count(identity).await?;
        let inputs = self.store.lrange(&inputs_key(identity), 0, -1).await?;
        let outputs = self.store.lrange(&outputs_key(identity), 0, -1).await?;

        let records = inputs
            .into_iter()
            .zip(outputs)
            .map(|(input, output)| CallRecord {
                input: String::from_utf8_lossy(&input).into_owned(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
            .collect();

        Ok(CallHistory {
            identity: identity.to_string(),
            calls,
            records,
        })
    }
}

// == Instrumented ==
/// An operation bound to a stable identity and a recorder.
///
/// Every [`Instrumented::call`] goes through [`InvocationRecorder::record`].
pub struct Instrumented<F> {
    identity: String,
    recorder: InvocationRecorder,
    op: Arc<F>,
}

impl<F> Instrumented<F> {
    pub fn new(identity: impl Into<String>, recorder: InvocationRecorder, op: F) -> Self {
        Self {
            identity: identity.into(),
            recorder,
            op: Arc::new(op),
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub async fn call<A, T, Fut>(&self, args: A) -> Result<T>
    where
        A: Serialize + Send + 'static,
        T: Serialize + Send + 'static,
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let op = Arc::clone(&self.op);
        self.recorder
            .record(&self.identity, args, move |args| (*op)(args))
            .await
    }

    pub async fn replay(&self) -> Result<CallHistory> {
        self.recorder.replay(&self.identity).await
    }
}

// == Call History ==
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallRecord {
    pub input: String,
    pub output: String,
}

/// Recorded invocations of one operation, in call order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallHistory {
    pub identity: String,
    pub calls: u64,
    pub records: Vec<CallRecord>,
}

impl fmt::Display for CallHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.identity, self.calls)?;
        for record in &self.records {
            write!(f, "\n{}(*{}) -> {}", self.identity, record.input, record.output)?;
        }
        Ok(())
    }
}
