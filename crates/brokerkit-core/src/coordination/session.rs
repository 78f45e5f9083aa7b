//! Coordination backend and session interfaces
//!
//! The toolkit touches a coordination backend through this narrow surface
//! only: open a session, create a node with an ACL, a handful of reads used
//! to verify access control, and close. Implementations own connection
//! management; the retry policy travels in [`SessionOptions`] and is applied
//! by [`CoordinationBackend::connect_with_retry`].

use super::acl::Acl;
use super::retry::RetryPolicy;
use crate::errors::CoordinationError;

/// Authentication material presented when a session is opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthInfo {
    /// Authentication scheme, e.g. `digest`
    pub scheme: String,
    /// Scheme-specific credential bytes
    pub auth: Vec<u8>,
}

impl AuthInfo {
    /// Create auth info
    pub fn new(scheme: impl Into<String>, auth: impl Into<Vec<u8>>) -> Self {
        Self {
            scheme: scheme.into(),
            auth: auth.into(),
        }
    }
}

/// Parameters for opening a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    /// Connect string of the backend
    pub connect_string: String,
    /// Retry policy for connecting and for operations issued by helpers
    pub retry_policy: RetryPolicy,
    /// Auth presented at connect time; empty for an anonymous session
    pub auth: Vec<AuthInfo>,
}

impl SessionOptions {
    /// Anonymous session options with the default retry policy
    pub fn new(connect_string: impl Into<String>) -> Self {
        Self {
            connect_string: connect_string.into(),
            retry_policy: RetryPolicy::default(),
            auth: Vec::new(),
        }
    }

    /// Use a different retry policy
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Present `auth` bytes under `scheme` when connecting
    pub fn with_authorization(mut self, scheme: impl Into<String>, auth: impl Into<Vec<u8>>) -> Self {
        self.auth.push(AuthInfo::new(scheme, auth));
        self
    }

    /// Whether the session will be opened without auth
    pub fn is_anonymous(&self) -> bool {
        self.auth.is_empty()
    }
}

/// Node creation parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateRequest {
    /// Initial node data
    pub data: Vec<u8>,
    /// ACL attached to the node
    pub acl: Vec<Acl>,
    /// Create missing parents (with an open ACL) before the node itself
    pub creating_parents: bool,
}

impl CreateRequest {
    /// Empty node with an open ACL
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            acl: Acl::open_unsafe(),
            creating_parents: false,
        }
    }

    /// Set the initial data
    pub fn with_data(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.data = data.into();
        self
    }

    /// Set the ACL
    pub fn with_acl(mut self, acl: Vec<Acl>) -> Self {
        self.acl = acl;
        self
    }

    /// Create missing parent nodes
    pub fn creating_parents_if_needed(mut self) -> Self {
        self.creating_parents = true;
        self
    }
}

/// An open connection to the coordination backend
pub trait CoordinationSession: Send {
    /// Connect string this session is bound to
    fn connect_string(&self) -> &str;

    /// Create a node, returning its path
    fn create(&self, path: &str, request: &CreateRequest) -> Result<String, CoordinationError>;

    /// Whether a node exists
    fn exists(&self, path: &str) -> Result<bool, CoordinationError>;

    /// Read node data
    fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError>;

    /// Replace node data
    fn set_data(&self, path: &str, data: &[u8]) -> Result<(), CoordinationError>;

    /// Read the ACL attached to a node
    fn get_acl(&self, path: &str) -> Result<Vec<Acl>, CoordinationError>;

    /// Delete a childless node
    fn delete(&self, path: &str) -> Result<(), CoordinationError>;

    /// Close the session; closing twice is a no-op
    fn close(&mut self);

    /// Whether the session is still open
    fn is_open(&self) -> bool;
}

/// Factory for coordination sessions
pub trait CoordinationBackend: Send + Sync {
    /// Session type produced by this backend
    type Session: CoordinationSession;

    /// Open a session with a single attempt
    fn connect(&self, options: &SessionOptions) -> Result<Self::Session, CoordinationError>;

    /// Open a session, retrying connection loss per `options.retry_policy`
    fn connect_with_retry(
        &self,
        options: &SessionOptions,
    ) -> Result<Self::Session, CoordinationError> {
        options
            .retry_policy
            .run("connect", || self.connect(options))
    }
}
