//! Coordination backend abstractions
//!
//! Credentials, digest ACLs, the retry policy, path rules and the
//! session/backend traits that test helpers are written against.

pub mod acl;
pub mod credential;
pub mod path;
pub mod retry;
pub mod session;

pub use acl::{
    digest_hash, digest_identity, digest_identity_from_auth, Acl, Id, Perms, DIGEST_SCHEME,
    WORLD_SCHEME,
};
pub use credential::Credential;
pub use path::{ancestors, parent_path, validate_path, ROOT};
pub use retry::RetryPolicy;
pub use session::{AuthInfo, CoordinationBackend, CoordinationSession, CreateRequest, SessionOptions};
