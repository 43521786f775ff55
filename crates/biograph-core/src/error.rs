//! Error types for biograph-core.
//!
//! Two-level taxonomy in the style of the rest of the workspace: focused
//! sub-errors ([`BackendError`], [`ConfigError`]) plus the unified
//! [`IntegrationError`] that everything converges to at the API surface.
//!
//! Propagation policy: validation errors are local and name the offending
//! identifier; backend and timeout errors are isolated to the smallest
//! failing unit (one entity type's sub-query) so resolver and enrichment
//! calls return partial results with failed slots marked rather than
//! failing wholesale.

use thiserror::Error;

use crate::backend::GraphSource;
use crate::registry::EntityType;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IntegrationError>;

// ============================================================================
// SUB-ERRORS
// ============================================================================

/// A graph backend rejected or failed a query.
#[derive(Debug, Clone, Error)]
#[error("{graph} query failed: {message}")]
pub struct BackendError {
    /// Which graph the query was issued against.
    pub graph: GraphSource,
    /// Backend-reported failure detail.
    pub message: String,
}

impl BackendError {
    pub fn new(graph: GraphSource, message: impl Into<String>) -> Self {
        Self {
            graph,
            message: message.into(),
        }
    }
}

/// Configuration errors raised while reading the environment at startup.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// An environment variable held a value that failed to parse.
    #[error("invalid value for {var}: {value:?} ({reason})")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

// ============================================================================
// UNIFIED ERROR
// ============================================================================

/// Top-level error type for the integration core.
///
/// Each variant maps to a JSON-RPC error code via [`error_code`], which the
/// MCP layer uses when a failure must cross the protocol boundary.
///
/// [`error_code`]: IntegrationError::error_code
#[derive(Debug, Clone, Error)]
pub enum IntegrationError {
    /// Malformed identifier for its declared entity type.
    #[error("invalid {entity_type} identifier {identifier:?}: {reason}")]
    Validation {
        identifier: String,
        entity_type: EntityType,
        reason: String,
    },

    /// A graph backend rejected or failed a query.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A sub-query exceeded its allotted time.
    #[error("{graph} query timed out after {waited_ms}ms")]
    Timeout { graph: GraphSource, waited_ms: u64 },

    /// Caller referenced an entity type absent from the registry.
    #[error("unknown entity type: {0:?}")]
    UnknownEntityType(String),

    /// A query template could not be rendered safely.
    ///
    /// Raised by the SPARQL substitution layer when a value would escape
    /// its quoted literal. Identifiers that went through the normalizer
    /// never trip this; it is the last line of defense.
    #[error("query build error: {0}")]
    QueryBuild(String),

    /// Startup configuration problem.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl IntegrationError {
    /// Shorthand for a validation failure.
    pub fn validation(
        identifier: impl Into<String>,
        entity_type: EntityType,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            identifier: identifier.into(),
            entity_type,
            reason: reason.into(),
        }
    }

    /// JSON-RPC error code for this error.
    ///
    /// Validation and unknown-type errors are caller mistakes (-32602);
    /// backend, timeout, and config failures get server-defined codes.
    pub fn error_code(&self) -> i32 {
        match self {
            Self::Validation { .. } | Self::UnknownEntityType(_) | Self::QueryBuild(_) => -32602,
            Self::Backend(_) => -32010,
            Self::Timeout { .. } => -32011,
            Self::Config(_) => -32012,
        }
    }

    /// Whether retrying the same call could succeed without intervention.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Timeout { .. })
    }
}
