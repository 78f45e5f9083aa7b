//! Reusable test fixtures
//!
//! A [`SecuredNodeFixture`] provisions one secured node on a backend and
//! hands out sessions for checking who can reach it.

use crate::coordination::{create_secured_node_with_policy, new_authorized_client, new_client};
use brokerkit_core::{
    BrokerKitError, CoordinationBackend, CoordinationConfig, CoordinationError, Credential,
    ProvisioningError, RetryPolicy,
};

/// A secured node together with the backend and credential that own it
#[derive(Debug)]
pub struct SecuredNodeFixture<B: CoordinationBackend> {
    backend: B,
    credential: Credential,
    path: String,
}

impl<B: CoordinationBackend> SecuredNodeFixture<B> {
    /// Provision a secured node at `path` with the default retry policy
    pub fn new(backend: B, credential: Credential, path: &str) -> Result<Self, ProvisioningError> {
        Self::provision(backend, credential, path, RetryPolicy::default())
    }

    /// Provision `name` below the configured root, using the configured
    /// credential and retry policy
    pub fn from_config(
        backend: B,
        config: &CoordinationConfig,
        name: &str,
    ) -> Result<Self, BrokerKitError> {
        let credential = config.credential()?;
        let path = config.node_path(name);
        Ok(Self::provision(backend, credential, &path, config.retry_policy())?)
    }

    fn provision(
        backend: B,
        credential: Credential,
        path: &str,
        retry_policy: RetryPolicy,
    ) -> Result<Self, ProvisioningError> {
        let path = create_secured_node_with_policy(&backend, &credential, path, retry_policy)?;
        Ok(Self {
            backend,
            credential,
            path,
        })
    }

    /// Backend the node lives on
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Credential owning the node
    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    /// Path of the node
    pub fn path(&self) -> &str {
        &self.path
    }

    /// New session authenticated as the owner
    pub fn authorized_session(&self) -> Result<B::Session, CoordinationError> {
        new_authorized_client(&self.backend, &self.credential)
    }

    /// New session without auth
    pub fn anonymous_session(&self) -> Result<B::Session, CoordinationError> {
        new_client(&self.backend, self.credential.connection_string())
    }
}
