//! Access-control entries and the digest identity scheme
//!
//! The digest identity is a wire-level contract shared with every node the
//! backend already holds: `username:base64(sha1("username:password"))`, with
//! the standard base64 alphabet and padding.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::fmt;
use std::ops::BitOr;

/// Scheme token for digest-authenticated identities
pub const DIGEST_SCHEME: &str = "digest";

/// Scheme token for the open `world:anyone` identity
pub const WORLD_SCHEME: &str = "world";

/// Permission bit set attached to an ACL entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Perms(u32);

impl Perms {
    /// Read node data and list children
    pub const READ: Perms = Perms(1);
    /// Set node data
    pub const WRITE: Perms = Perms(1 << 1);
    /// Create children
    pub const CREATE: Perms = Perms(1 << 2);
    /// Delete children
    pub const DELETE: Perms = Perms(1 << 3);
    /// Set the ACL
    pub const ADMIN: Perms = Perms(1 << 4);
    /// Every permission
    pub const ALL: Perms = Perms(0b1_1111);

    /// Raw permission bits
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is granted
    pub fn contains(self, other: Perms) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Perms {
    type Output = Perms;

    fn bitor(self, rhs: Perms) -> Perms {
        Perms(self.0 | rhs.0)
    }
}

/// Principal an ACL entry applies to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Id {
    /// Authentication scheme, e.g. `digest`
    pub scheme: String,
    /// Scheme-specific identity string
    pub id: String,
}

impl Id {
    /// Create an identity under an arbitrary scheme
    pub fn new(scheme: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            id: id.into(),
        }
    }

    /// Digest identity for a username/password pair
    pub fn digest(username: &str, password: &str) -> Self {
        Self::new(DIGEST_SCHEME, digest_identity(username, password))
    }

    /// The `world:anyone` identity
    pub fn anyone() -> Self {
        Self::new(WORLD_SCHEME, "anyone")
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.id)
    }
}

/// One access-control entry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Acl {
    /// Granted permissions
    pub perms: Perms,
    /// Principal the permissions are granted to
    pub id: Id,
}

impl Acl {
    /// Create an ACL entry
    pub fn new(perms: Perms, id: Id) -> Self {
        Self { perms, id }
    }

    /// Full permissions for the digest identity of `username:password`
    pub fn digest_all(username: &str, password: &str) -> Self {
        Self::new(Perms::ALL, Id::digest(username, password))
    }

    /// Full permissions for everyone
    pub fn open_unsafe() -> Vec<Acl> {
        vec![Self::new(Perms::ALL, Id::anyone())]
    }
}

/// Base64 (standard alphabet) of the SHA-1 digest of `username:password`
pub fn digest_hash(username: &str, password: &str) -> String {
    let digest = Sha1::digest(format!("{username}:{password}").as_bytes());
    STANDARD.encode(digest)
}

/// ACL identity string `username:base64(sha1("username:password"))`
pub fn digest_identity(username: &str, password: &str) -> String {
    format!("{username}:{}", digest_hash(username, password))
}

/// Identity a backend derives from raw digest auth bytes (`username:password`)
///
/// Returns `None` when the bytes are not UTF-8 or carry no `:` separator.
pub fn digest_identity_from_auth(auth: &[u8]) -> Option<String> {
    let raw = std::str::from_utf8(auth).ok()?;
    let (username, password) = raw.split_once(':')?;
    Some(digest_identity(username, password))
}
