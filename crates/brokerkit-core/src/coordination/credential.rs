//! Credentials for digest-authenticated coordination sessions

use super::acl::{Acl, DIGEST_SCHEME};
use super::session::AuthInfo;
use std::fmt;

/// Username/password pair bound to a coordination connect string
#[derive(Clone)]
pub struct Credential {
    connection_string: String,
    username: String,
    password: String,
}

impl Credential {
    /// Create a credential
    pub fn new(
        connection_string: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            connection_string: connection_string.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Connect string of the coordination backend
    pub fn connection_string(&self) -> &str {
        &self.connection_string
    }

    /// Username
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Raw `username:password` bytes sent in the digest auth handshake
    pub fn auth_bytes(&self) -> Vec<u8> {
        format!("{}:{}", self.username, self.password).into_bytes()
    }

    /// Digest auth info for a session, carrying the unhashed credential
    pub fn digest_auth(&self) -> AuthInfo {
        AuthInfo::new(DIGEST_SCHEME, self.auth_bytes())
    }

    /// Single-entry ACL granting this credential's digest identity every permission
    pub fn digest_acl(&self) -> Vec<Acl> {
        vec![Acl::digest_all(&self.username, &self.password)]
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("connection_string", &self.connection_string)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
