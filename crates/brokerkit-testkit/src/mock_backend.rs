//! In-memory coordination backend for testing
//!
//! A single shared node tree with ACL enforcement and digest
//! authentication, plus hooks to make connects or creates fail. Every
//! session opened against the backend is recorded so tests can check that
//! helpers close what they open.

use brokerkit_core::coordination::{
    ancestors, digest_identity_from_auth, parent_path, validate_path, DIGEST_SCHEME, ROOT,
};
use brokerkit_core::{
    Acl, AuthInfo, CoordinationBackend, CoordinationError, CoordinationSession, CreateRequest, Id,
    Perms, SessionOptions,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

#[derive(Debug, Clone)]
struct Node {
    data: Vec<u8>,
    acl: Vec<Acl>,
}

/// Bookkeeping for one session opened against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    /// Backend-assigned session id, starting at 1
    pub id: u64,
    /// Connect string the session was opened with
    pub connect_string: String,
    /// Auth presented at connect time
    pub auth: Vec<AuthInfo>,
    /// Whether the session is still open
    pub open: bool,
    /// Number of times the open session was closed
    pub close_calls: usize,
}

#[derive(Debug)]
struct BackendState {
    nodes: BTreeMap<String, Node>,
    sessions: Vec<SessionRecord>,
    unreachable: HashSet<String>,
    failing_connects: u32,
    failing_creates: u32,
    connect_attempts: u32,
}

impl BackendState {
    fn new() -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            ROOT.to_string(),
            Node {
                data: Vec::new(),
                acl: Acl::open_unsafe(),
            },
        );
        Self {
            nodes,
            sessions: Vec::new(),
            unreachable: HashSet::new(),
            failing_connects: 0,
            failing_creates: 0,
            connect_attempts: 0,
        }
    }

    fn has_children(&self, path: &str) -> bool {
        let prefix = format!("{path}/");
        self.nodes
            .range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }
}

/// Memory coordination backend for testing
#[derive(Debug, Clone)]
pub struct MemoryCoordinationBackend {
    state: Arc<Mutex<BackendState>>,
}

impl Default for MemoryCoordinationBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCoordinationBackend {
    /// Create a backend holding only the open root node
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(BackendState::new())),
        }
    }

    /// Refuse every connect to `connect_string`
    pub fn mark_unreachable(&self, connect_string: impl Into<String>) {
        self.state.lock().unreachable.insert(connect_string.into());
    }

    /// Accept connects to `connect_string` again
    pub fn mark_reachable(&self, connect_string: &str) {
        self.state.lock().unreachable.remove(connect_string);
    }

    /// Fail the next `count` connect attempts with connection loss
    pub fn fail_next_connects(&self, count: u32) {
        self.state.lock().failing_connects = count;
    }

    /// Fail the next `count` create calls with connection loss
    pub fn fail_next_creates(&self, count: u32) {
        self.state.lock().failing_creates = count;
    }

    /// Connect attempts seen so far, failed ones included (for testing)
    pub fn connect_attempts(&self) -> u32 {
        self.state.lock().connect_attempts
    }

    /// Every session opened so far (for testing)
    pub fn sessions(&self) -> Vec<SessionRecord> {
        self.state.lock().sessions.clone()
    }

    /// Number of sessions not yet closed (for testing)
    pub fn open_session_count(&self) -> usize {
        self.state.lock().sessions.iter().filter(|s| s.open).count()
    }

    /// Whether a node exists, bypassing ACLs (for testing)
    pub fn node_exists(&self, path: &str) -> bool {
        self.state.lock().nodes.contains_key(path)
    }

    /// ACL of a node, bypassing ACLs (for testing)
    pub fn node_acl(&self, path: &str) -> Option<Vec<Acl>> {
        self.state.lock().nodes.get(path).map(|node| node.acl.clone())
    }

    /// Data of a node, bypassing ACLs (for testing)
    pub fn node_data(&self, path: &str) -> Option<Vec<u8>> {
        self.state.lock().nodes.get(path).map(|node| node.data.clone())
    }

    /// Number of nodes, root included (for testing)
    pub fn node_count(&self) -> usize {
        self.state.lock().nodes.len()
    }
}

impl CoordinationBackend for MemoryCoordinationBackend {
    type Session = MemorySession;

    fn connect(&self, options: &SessionOptions) -> Result<MemorySession, CoordinationError> {
        let mut state = self.state.lock();
        state.connect_attempts += 1;

        if state.unreachable.contains(&options.connect_string) {
            return Err(CoordinationError::connection_loss(
                &options.connect_string,
                "connection refused",
            ));
        }
        if state.failing_connects > 0 {
            state.failing_connects -= 1;
            return Err(CoordinationError::connection_loss(
                &options.connect_string,
                "session establishment timed out",
            ));
        }

        let id = state.sessions.len() as u64 + 1;
        state.sessions.push(SessionRecord {
            id,
            connect_string: options.connect_string.clone(),
            auth: options.auth.clone(),
            open: true,
            close_calls: 0,
        });

        // Digest auth bytes are hashed into the identity matched against ACLs.
        // Bytes that do not parse authenticate nobody.
        let identities = options
            .auth
            .iter()
            .filter(|auth| auth.scheme == DIGEST_SCHEME)
            .filter_map(|auth| digest_identity_from_auth(&auth.auth))
            .map(|identity| Id::new(DIGEST_SCHEME, identity))
            .collect();

        tracing::debug!(
            session_id = id,
            connect_string = %options.connect_string,
            anonymous = options.is_anonymous(),
            "opened memory coordination session"
        );

        Ok(MemorySession {
            id,
            connect_string: options.connect_string.clone(),
            identities,
            state: Arc::clone(&self.state),
            open: true,
        })
    }
}

/// Session on a [`MemoryCoordinationBackend`]
#[derive(Debug)]
pub struct MemorySession {
    id: u64,
    connect_string: String,
    identities: Vec<Id>,
    state: Arc<Mutex<BackendState>>,
    open: bool,
}

impl MemorySession {
    /// Backend-assigned session id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Identities this session authenticated as
    pub fn identities(&self) -> &[Id] {
        &self.identities
    }

    fn ensure_open(&self) -> Result<(), CoordinationError> {
        if self.open {
            Ok(())
        } else {
            Err(CoordinationError::SessionClosed)
        }
    }

    fn permitted(&self, acl: &[Acl], perm: Perms) -> bool {
        let anyone = Id::anyone();
        acl.iter().any(|entry| {
            entry.perms.contains(perm)
                && (entry.id == anyone || self.identities.contains(&entry.id))
        })
    }

    fn check(&self, node: &Node, path: &str, perm: Perms) -> Result<(), CoordinationError> {
        if self.permitted(&node.acl, perm) {
            Ok(())
        } else {
            Err(CoordinationError::no_auth(path))
        }
    }

    fn insert_child(
        &self,
        state: &mut BackendState,
        path: &str,
        data: Vec<u8>,
        acl: Vec<Acl>,
    ) -> Result<(), CoordinationError> {
        let parent = parent_path(path).unwrap_or(ROOT);
        let parent_node = state
            .nodes
            .get(parent)
            .ok_or_else(|| CoordinationError::no_node(path))?;
        self.check(parent_node, parent, Perms::CREATE)?;
        if state.nodes.contains_key(path) {
            return Err(CoordinationError::node_exists(path));
        }
        state.nodes.insert(path.to_string(), Node { data, acl });
        Ok(())
    }
}

impl CoordinationSession for MemorySession {
    fn connect_string(&self) -> &str {
        &self.connect_string
    }

    fn create(&self, path: &str, request: &CreateRequest) -> Result<String, CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        if path == ROOT {
            return Err(CoordinationError::node_exists(path));
        }
        if request.acl.is_empty() {
            return Err(CoordinationError::invalid_acl("ACL must not be empty"));
        }

        let mut state = self.state.lock();
        if state.failing_creates > 0 {
            state.failing_creates -= 1;
            return Err(CoordinationError::connection_loss(
                &self.connect_string,
                "connection dropped during create",
            ));
        }

        if request.creating_parents {
            for ancestor in ancestors(path) {
                if !state.nodes.contains_key(ancestor) {
                    self.insert_child(&mut state, ancestor, Vec::new(), Acl::open_unsafe())?;
                }
            }
        }
        self.insert_child(&mut state, path, request.data.clone(), request.acl.clone())?;

        tracing::trace!(session_id = self.id, path, "created node");
        Ok(path.to_string())
    }

    fn exists(&self, path: &str) -> Result<bool, CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        Ok(self.state.lock().nodes.contains_key(path))
    }

    fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        let state = self.state.lock();
        let node = state
            .nodes
            .get(path)
            .ok_or_else(|| CoordinationError::no_node(path))?;
        self.check(node, path, Perms::READ)?;
        Ok(node.data.clone())
    }

    fn set_data(&self, path: &str, data: &[u8]) -> Result<(), CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        let mut state = self.state.lock();
        let node = state
            .nodes
            .get(path)
            .ok_or_else(|| CoordinationError::no_node(path))?;
        self.check(node, path, Perms::WRITE)?;
        if let Some(node) = state.nodes.get_mut(path) {
            node.data = data.to_vec();
        }
        Ok(())
    }

    fn get_acl(&self, path: &str) -> Result<Vec<Acl>, CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        let state = self.state.lock();
        let node = state
            .nodes
            .get(path)
            .ok_or_else(|| CoordinationError::no_node(path))?;
        self.check(node, path, Perms::READ)?;
        Ok(node.acl.clone())
    }

    fn delete(&self, path: &str) -> Result<(), CoordinationError> {
        self.ensure_open()?;
        validate_path(path)?;
        if path == ROOT {
            return Err(CoordinationError::invalid_path(path, "cannot delete the root node"));
        }
        let mut state = self.state.lock();
        if !state.nodes.contains_key(path) {
            return Err(CoordinationError::no_node(path));
        }
        let parent = parent_path(path).unwrap_or(ROOT);
        if let Some(parent_node) = state.nodes.get(parent) {
            self.check(parent_node, parent, Perms::DELETE)?;
        }
        if state.has_children(path) {
            return Err(CoordinationError::not_empty(path));
        }
        state.nodes.remove(path);
        Ok(())
    }

    fn close(&mut self) {
        if !self.open {
            return;
        }
        let mut state = self.state.lock();
        if let Some(record) = state.sessions.iter_mut().find(|r| r.id == self.id) {
            record.close_calls += 1;
            record.open = false;
        }
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }
}
