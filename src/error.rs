//! Error taxonomy for graph construction.
//!
//! Configuration misuse and naming/reference misuse are kept apart so callers
//! can tell them apart by matching on the outer variant.

use thiserror::Error;

/// Errors raised while building a graph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Reference(#[from] ReferenceError),
}

/// Invalid configuration values, rejected at the point of construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Consistent region settings that cannot be honoured.
    #[error("invalid consistent region: {0}")]
    ConsistentRegion(String),

    #[error("checkpoint period must be greater than zero")]
    CheckpointPeriod,

    #[error("invalid schema '{schema}': {reason}")]
    Schema { schema: String, reason: String },

    #[error("invalid window: {0}")]
    Window(String),

    #[error("parallel width must be greater than zero")]
    Width,

    /// A callable that must travel inline could not produce its payload.
    #[error("callable '{name}' cannot be serialized: {reason}")]
    Callable { name: String, reason: String },

    #[error("markers do not accept {0}")]
    Marker(&'static str),
}

/// Names or handles that do not refer to what the caller claims.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReferenceError {
    #[error("unknown operator id {0}")]
    UnknownOperator(usize),

    #[error("unknown output port id {0}")]
    UnknownOutputPort(usize),

    #[error("unknown input port id {0}")]
    UnknownInputPort(usize),

    #[error("stream '{stream}' is not an input of operator '{operator}'")]
    NotAnInput { stream: String, operator: String },

    #[error("stream '{stream}' is not an output of operator '{operator}'")]
    NotAnOutput { stream: String, operator: String },

    /// Unqualified attribute on an operator with several input ports.
    #[error("attribute '{attribute}' is ambiguous: operator '{operator}' has {ports} input ports")]
    AmbiguousAttribute {
        attribute: String,
        operator: String,
        ports: usize,
    },
}

impl GraphError {
    pub fn is_config(&self) -> bool {
        matches!(self, GraphError::Config(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, GraphError::Reference(_))
    }
}

pub type Result<T> = std::result::Result<T, GraphError>;
