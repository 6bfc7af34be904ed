//! Polymorphic interface for the out-of-scope HTTP test-runner collaborator
//! (§4.9, §9).
//!
//! The runner that *produces* snapshot files is not part of this engine —
//! this engine only consumes its output. Where the orchestrator needs to
//! name "invoke the producer, then ingest its output" at all, it talks to
//! this trait rather than a concrete HTTP client, so a real adapter can be
//! dropped in later without the orchestrator changing.
//! No real backend ships here; [`NoopCollaborator`] is the only adapter.

use serde_json::{Map, Value};

#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("runner collaborator call failed: {0}")]
    Call(String),
    #[error("no collaborator backend configured for operation {0:?}")]
    Unconfigured(String),
}

/// An opaque call into the external test-runner: an operation name, request
/// parameters, and a body, returning a result value and an optional
/// free-form diagnostic string.
pub trait RunnerCollaborator: Send + Sync {
    fn call(
        &self,
        operation: &str,
        params: &Map<String, Value>,
        body: &Value,
    ) -> Result<(Value, Option<String>), CollaboratorError>;
}

/// The only adapter shipped: always reports the backend as unconfigured.
/// Exists so orchestrator code can hold a `Box<dyn RunnerCollaborator>`
/// without special-casing "no runner integration configured".
pub struct NoopCollaborator;

impl RunnerCollaborator for NoopCollaborator {
    fn call(
        &self,
        operation: &str,
        _params: &Map<String, Value>,
        _body: &Value,
    ) -> Result<(Value, Option<String>), CollaboratorError> {
        Err(CollaboratorError::Unconfigured(operation.to_string()))
    }
}
