//! Per-operation trace context, recorded on tracing spans and log lines

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: String,
    pub span_id: String,
    pub parent_id: Option<String>,
    pub operation: String,
}

impl TraceContext {
    /// Starts a new trace for a top-level operation (an import run, a sync request).
    pub fn for_operation(operation: impl Into<String>) -> Self {
        Self {
            trace_id: Uuid::new_v4().simple().to_string(),
            span_id: Uuid::new_v4().simple().to_string(),
            parent_id: None,
            operation: operation.into(),
        }
    }

    /// Derives a context for a sub-operation of the same trace.
    pub fn child(&self, operation: impl Into<String>) -> Self {
        Self {
            trace_id: self.trace_id.clone(),
            span_id: Uuid::new_v4().simple().to_string(),
            parent_id: Some(self.span_id.clone()),
            operation: operation.into(),
        }
    }
}
