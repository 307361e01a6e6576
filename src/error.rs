use thiserror::Error;

use crate::component::ElementId;
use crate::node::NodeId;

/// Why a wire end could not be attached to a node.
///
/// Callers treat every variant the same way: the wire snaps back and the
/// board is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),
    #[error("wire does not exist")]
    UnknownWire,
    #[error("wire is already attached to {0:?}")]
    WireInUse(NodeId),
    #[error("node {0:?} is not an input")]
    NotAnInput(NodeId),
    #[error("node {0:?} is not an output")]
    NotAnOutput(NodeId),
    #[error("input {0:?} is already connected")]
    Occupied(NodeId),
    #[error("cannot join high-voltage and low-voltage nodes")]
    VoltageMismatch,
}

#[derive(Debug, Error)]
pub enum CircuitError {
    #[error("unknown element type '{0}'")]
    UnknownElementType(String),
    #[error("element '{0}' not found")]
    MissingElement(String),
    #[error("node '{node}' not found on element '{element}'")]
    MissingNode { element: String, node: String },
    #[error("element {0:?} not found")]
    NoSuchElement(ElementId),
    #[error("element '{0}' has no control for that")]
    NotInteractive(String),
    #[error("invalid parameter '{key}': {reason}")]
    InvalidParameter { key: String, reason: String },
    #[error("link {from} -> {to} refused: {source}")]
    Link {
        from: String,
        to: String,
        #[source]
        source: ConnectError,
    },
    #[error("failed to read circuit file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse circuit: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("tick period must be positive")]
    ZeroTickPeriod,
}

/// Failure of an external analog input (microphone, camera, ...).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("permission denied")]
    PermissionDenied,
    #[error("source unavailable: {0}")]
    Unavailable(String),
}
