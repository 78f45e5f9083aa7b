//! Secured node provisioning
//!
//! Helpers that set up coordination nodes readable only by one digest
//! identity. Node creation goes through a short-lived anonymous session that
//! is always closed before returning; [`new_authorized_client`] then opens a
//! session that authenticates as the owner of such a node.

use brokerkit_core::coordination::DIGEST_SCHEME;
use brokerkit_core::{
    CoordinationBackend, CoordinationError, CoordinationSession, CreateRequest, Credential,
    ProvisioningError, RetryPolicy, SessionOptions,
};
use std::ops::{Deref, DerefMut};

/// Session that is closed when dropped
///
/// Wraps a backend session so every exit path, early returns and panics
/// included, releases it.
#[derive(Debug)]
pub struct ScopedSession<S: CoordinationSession> {
    session: S,
    closed: bool,
}

impl<S: CoordinationSession> ScopedSession<S> {
    /// Take ownership of an open session
    pub fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    /// Close the session now
    pub fn close(mut self) {
        self.close_once();
    }

    fn close_once(&mut self) {
        if !self.closed {
            self.closed = true;
            self.session.close();
            tracing::debug!(
                connect_string = self.session.connect_string(),
                "closed coordination session"
            );
        }
    }
}

impl<S: CoordinationSession> Deref for ScopedSession<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: CoordinationSession> DerefMut for ScopedSession<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: CoordinationSession> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        self.close_once();
    }
}

/// Options for an anonymous session with the default retry policy
pub fn anonymous_options(connect_string: &str) -> SessionOptions {
    SessionOptions::new(connect_string)
}

/// Options for a session authenticated as `credential`
///
/// The raw `username:password` bytes are presented under the digest scheme;
/// the backend hashes them into the identity matched against node ACLs.
pub fn authorized_options(credential: &Credential) -> SessionOptions {
    SessionOptions::new(credential.connection_string())
        .with_authorization(DIGEST_SCHEME, credential.auth_bytes())
}

/// Open an anonymous session, retrying connection loss once after 100ms
pub fn new_client<B: CoordinationBackend>(
    backend: &B,
    connect_string: &str,
) -> Result<B::Session, CoordinationError> {
    backend.connect_with_retry(&anonymous_options(connect_string))
}

/// Open a session authenticated as `credential`, retrying connection loss once
///
/// The caller owns the returned session and is responsible for closing it.
pub fn new_authorized_client<B: CoordinationBackend>(
    backend: &B,
    credential: &Credential,
) -> Result<B::Session, CoordinationError> {
    backend.connect_with_retry(&authorized_options(credential))
}

/// Create an empty node at `path` with full permissions for `credential` only
///
/// Uses the default retry policy: one retry after 100ms.
pub fn create_secured_node<B: CoordinationBackend>(
    backend: &B,
    credential: &Credential,
    path: &str,
) -> Result<String, ProvisioningError> {
    create_secured_node_with_policy(backend, credential, path, RetryPolicy::default())
}

/// [`create_secured_node`] with an explicit retry policy
///
/// The node is created through an anonymous session on the credential's
/// connect string. Its ACL is the single entry
/// `digest:username:base64(sha1("username:password"))` with every
/// permission. Missing parents are created with an open ACL. The session
/// is closed before returning, whether or not creation succeeded.
pub fn create_secured_node_with_policy<B: CoordinationBackend>(
    backend: &B,
    credential: &Credential,
    path: &str,
    retry_policy: RetryPolicy,
) -> Result<String, ProvisioningError> {
    let span = tracing::info_span!(
        "create_secured_node",
        path,
        connect_string = credential.connection_string(),
        username = credential.username(),
    );
    let _enter = span.enter();

    let options = anonymous_options(credential.connection_string()).with_retry_policy(retry_policy);
    let session = backend
        .connect_with_retry(&options)
        .map(ScopedSession::new)
        .map_err(|source| {
            tracing::error!(error = %source, "could not connect to coordination backend");
            ProvisioningError::Connectivity {
                endpoint: credential.connection_string().to_string(),
                source,
            }
        })?;

    let request = CreateRequest::new()
        .with_acl(credential.digest_acl())
        .creating_parents_if_needed();
    let created = retry_policy.run("create", || session.create(path, &request));
    session.close();

    match created {
        Ok(created) => {
            tracing::info!(created = %created, "created secured node");
            Ok(created)
        }
        Err(source) => {
            tracing::error!(error = %source, "secured node creation rejected");
            Err(ProvisioningError::NodeCreation {
                path: path.to_string(),
                source,
            })
        }
    }
}
