//! Error taxonomy for brokerkit
//!
//! Backend failures are reported as [`CoordinationError`]. The provisioning
//! helpers wrap them in [`ProvisioningError`] so callers can tell a failed
//! connect apart from a rejected node creation, with the backend error kept
//! as the source. [`BrokerKitError`] is the umbrella used by the `Result`
//! alias.

/// Errors reported by a coordination backend
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinationError {
    /// Backend unreachable or the connection dropped mid-operation
    #[error("Connection loss ({endpoint}): {message}")]
    ConnectionLoss {
        /// Connect string the session was using
        endpoint: String,
        /// Error message describing the failure
        message: String,
    },

    /// A node already exists at the path
    #[error("Node exists: {path}")]
    NodeExists {
        /// Path of the existing node
        path: String,
    },

    /// The node, or one of its parents, does not exist
    #[error("No node: {path}")]
    NoNode {
        /// Path that was not found
        path: String,
    },

    /// The node still has children
    #[error("Node not empty: {path}")]
    NotEmpty {
        /// Path of the node
        path: String,
    },

    /// The session is not authorized for the operation
    #[error("Not authorized: {path}")]
    NoAuth {
        /// Path whose ACL rejected the session
        path: String,
    },

    /// The path is not a valid node path
    #[error("Invalid path {path:?}: {reason}")]
    InvalidPath {
        /// Offending path
        path: String,
        /// Why it was rejected
        reason: String,
    },

    /// The ACL is empty or malformed
    #[error("Invalid ACL: {message}")]
    InvalidAcl {
        /// Error message describing the ACL problem
        message: String,
    },

    /// The session was already closed
    #[error("Session closed")]
    SessionClosed,
}

impl CoordinationError {
    /// Create a connection loss error
    pub fn connection_loss(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConnectionLoss {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a node exists error
    pub fn node_exists(path: impl Into<String>) -> Self {
        Self::NodeExists { path: path.into() }
    }

    /// Create a no node error
    pub fn no_node(path: impl Into<String>) -> Self {
        Self::NoNode { path: path.into() }
    }

    /// Create a node not empty error
    pub fn not_empty(path: impl Into<String>) -> Self {
        Self::NotEmpty { path: path.into() }
    }

    /// Create a not authorized error
    pub fn no_auth(path: impl Into<String>) -> Self {
        Self::NoAuth { path: path.into() }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid ACL error
    pub fn invalid_acl(message: impl Into<String>) -> Self {
        Self::InvalidAcl {
            message: message.into(),
        }
    }

    /// Whether a retry policy may try the operation again
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConnectionLoss { .. })
    }
}

/// Failures of the secured-node provisioning flow
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
    /// The session could not be opened within the retry budget
    #[error("Failed to connect to coordination backend at {endpoint}")]
    Connectivity {
        /// Connect string that was attempted
        endpoint: String,
        /// Backend error from the last attempt
        #[source]
        source: CoordinationError,
    },

    /// The backend rejected node creation
    #[error("Failed to create secured node {path}")]
    NodeCreation {
        /// Path that was being created
        path: String,
        /// Backend error that rejected the creation
        #[source]
        source: CoordinationError,
    },
}

impl ProvisioningError {
    /// Backend error that triggered this failure
    pub fn backend_error(&self) -> &CoordinationError {
        match self {
            Self::Connectivity { source, .. } | Self::NodeCreation { source, .. } => source,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML for the expected shape
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field failed validation
    #[error("Field '{field}': {message}")]
    Invalid {
        /// Dotted field name
        field: String,
        /// Error message describing the problem
        message: String,
    },
}

impl ConfigError {
    /// Create a field validation error
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified error type for brokerkit operations
#[derive(Debug, thiserror::Error)]
pub enum BrokerKitError {
    /// Coordination backend error
    #[error(transparent)]
    Coordination(#[from] CoordinationError),

    /// Secured-node provisioning error
    #[error(transparent)]
    Provisioning(#[from] ProvisioningError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Standard Result type for brokerkit operations
pub type Result<T> = std::result::Result<T, BrokerKitError>;
