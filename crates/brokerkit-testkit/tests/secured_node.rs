//! Secured node provisioning against the in-memory coordination backend

use brokerkit_core::coordination::digest_identity;
use brokerkit_core::{Acl, CreateRequest, Perms, SessionOptions};
use brokerkit_testkit::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const CONNECT_STRING: &str = "localhost:2181";

fn credential() -> Credential {
    Credential::new(CONNECT_STRING, "u", "p")
}

fn fast_retry() -> RetryPolicy {
    RetryPolicy::one_time(Duration::from_millis(5))
}

#[test]
fn test_acl_identity_matches_known_vector() {
    init_test_logging();
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/secured").unwrap();

    let acl = backend.node_acl("/secured").unwrap();
    assert_eq!(acl.len(), 1);
    assert_eq!(acl[0].id.scheme, "digest");
    assert_eq!(acl[0].id.id, "u:Jq7wMyA/w2Vd5WIDAKdu4OIIFEQ=");
    assert_eq!(acl[0].perms, Perms::ALL);
}

#[test]
fn test_creation_session_is_anonymous_and_closed() {
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/secured").unwrap();

    let sessions = backend.sessions();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].connect_string, CONNECT_STRING);
    assert!(sessions[0].auth.is_empty());
    assert!(!sessions[0].open);
    assert_eq!(sessions[0].close_calls, 1);
}

#[test]
fn test_session_closed_when_node_exists() {
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/secured").unwrap();

    let err = create_secured_node(&backend, &credential(), "/secured").unwrap_err();
    assert!(matches!(err, ProvisioningError::NodeCreation { .. }));
    assert_eq!(err.backend_error(), &CoordinationError::node_exists("/secured"));
    assert_eq!(backend.open_session_count(), 0);
    assert_eq!(backend.sessions().len(), 2);
}

#[test]
fn test_missing_parents_created_open() {
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/brokers/zk/secured").unwrap();
    assert_eq!(backend.node_acl("/brokers"), Some(Acl::open_unsafe()));
    assert_eq!(backend.node_acl("/brokers/zk"), Some(Acl::open_unsafe()));
    assert_eq!(
        backend.node_acl("/brokers/zk/secured"),
        Some(credential().digest_acl())
    );
    assert_eq!(backend.open_session_count(), 0);
}

#[test]
fn test_parent_denying_create_is_reported() {
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/locked").unwrap();

    let other = Credential::new(CONNECT_STRING, "other", "pw");
    let err = create_secured_node(&backend, &other, "/locked/child").unwrap_err();
    assert_eq!(err.backend_error(), &CoordinationError::no_auth("/locked"));
    assert_eq!(backend.open_session_count(), 0);
}

#[test]
fn test_invalid_path_is_reported() {
    let backend = MemoryCoordinationBackend::new();
    let err = create_secured_node(&backend, &credential(), "secured/").unwrap_err();
    assert!(matches!(
        err.backend_error(),
        CoordinationError::InvalidPath { .. }
    ));
    assert_eq!(backend.open_session_count(), 0);
}

#[test]
fn test_connect_retried_once() {
    let backend = MemoryCoordinationBackend::new();
    backend.fail_next_connects(1);
    create_secured_node_with_policy(&backend, &credential(), "/secured", fast_retry()).unwrap();
    assert_eq!(backend.connect_attempts(), 2);
    assert!(backend.node_exists("/secured"));
}

#[test]
fn test_connect_gives_up_after_one_retry() {
    let backend = MemoryCoordinationBackend::new();
    backend.fail_next_connects(2);
    let err = create_secured_node_with_policy(&backend, &credential(), "/secured", fast_retry())
        .unwrap_err();
    match err {
        ProvisioningError::Connectivity { endpoint, source } => {
            assert_eq!(endpoint, CONNECT_STRING);
            assert!(source.is_retryable());
        }
        other => panic!("expected connectivity failure, got {other:?}"),
    }
    assert_eq!(backend.connect_attempts(), 2);
    assert!(!backend.node_exists("/secured"));
}

#[test]
fn test_default_policy_waits_before_retry() {
    let backend = MemoryCoordinationBackend::new();
    backend.mark_unreachable(CONNECT_STRING);
    let started = Instant::now();
    let err = create_secured_node(&backend, &credential(), "/secured").unwrap_err();
    assert!(started.elapsed() >= Duration::from_millis(100));
    assert!(matches!(err, ProvisioningError::Connectivity { .. }));
    assert_eq!(backend.connect_attempts(), 2);
}

#[test]
fn test_create_retried_on_connection_loss() {
    let backend = MemoryCoordinationBackend::new();
    backend.fail_next_creates(1);
    create_secured_node_with_policy(&backend, &credential(), "/secured", fast_retry()).unwrap();
    assert!(backend.node_exists("/secured"));
    assert_eq!(backend.open_session_count(), 0);
}

/// Backend whose sessions panic on `create` and count their closes
#[derive(Default)]
struct PanickingCreateBackend {
    closes: Arc<AtomicUsize>,
}

struct PanickingCreateSession {
    connect_string: String,
    closes: Arc<AtomicUsize>,
    open: bool,
}

impl CoordinationBackend for PanickingCreateBackend {
    type Session = PanickingCreateSession;

    fn connect(&self, options: &SessionOptions) -> Result<Self::Session, CoordinationError> {
        Ok(PanickingCreateSession {
            connect_string: options.connect_string.clone(),
            closes: Arc::clone(&self.closes),
            open: true,
        })
    }
}

impl CoordinationSession for PanickingCreateSession {
    fn connect_string(&self) -> &str {
        &self.connect_string
    }

    fn create(&self, _path: &str, _request: &CreateRequest) -> Result<String, CoordinationError> {
        panic!("backend crashed during create")
    }

    fn exists(&self, _path: &str) -> Result<bool, CoordinationError> {
        Ok(false)
    }

    fn get_data(&self, path: &str) -> Result<Vec<u8>, CoordinationError> {
        Err(CoordinationError::no_node(path))
    }

    fn set_data(&self, path: &str, _data: &[u8]) -> Result<(), CoordinationError> {
        Err(CoordinationError::no_node(path))
    }

    fn get_acl(&self, path: &str) -> Result<Vec<Acl>, CoordinationError> {
        Err(CoordinationError::no_node(path))
    }

    fn delete(&self, path: &str) -> Result<(), CoordinationError> {
        Err(CoordinationError::no_node(path))
    }

    fn close(&mut self) {
        if self.open {
            self.open = false;
            self.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

#[test]
fn test_session_closed_when_create_panics() {
    let backend = PanickingCreateBackend::default();
    let result = catch_unwind(AssertUnwindSafe(|| {
        create_secured_node(&backend, &credential(), "/secured")
    }));
    assert!(result.is_err());
    assert_eq!(backend.closes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_authorized_client_presents_raw_credential() {
    let backend = MemoryCoordinationBackend::new();
    let mut session = new_authorized_client(&backend, &credential()).unwrap();
    assert_eq!(session.connect_string(), CONNECT_STRING);

    let record = backend.sessions().pop().unwrap();
    assert_eq!(record.auth.len(), 1);
    assert_eq!(record.auth[0].scheme, "digest");
    assert_eq!(record.auth[0].auth, b"u:p".to_vec());
    assert_ne!(record.auth[0].auth, digest_identity("u", "p").into_bytes());
    session.close();
}

#[test]
fn test_only_owner_can_read_secured_node() {
    let backend = MemoryCoordinationBackend::new();
    let credential = credential();
    create_secured_node(&backend, &credential, "/secured").unwrap();

    let mut owner = new_authorized_client(&backend, &credential).unwrap();
    assert!(owner.get_data("/secured").unwrap().is_empty());
    owner.set_data("/secured", b"state").unwrap();
    assert_eq!(owner.get_acl("/secured").unwrap(), credential.digest_acl());
    owner.close();

    let mut anonymous = new_client(&backend, CONNECT_STRING).unwrap();
    assert_eq!(
        anonymous.get_data("/secured"),
        Err(CoordinationError::no_auth("/secured"))
    );
    anonymous.close();

    let other = Credential::new(CONNECT_STRING, "u", "wrong");
    let mut stranger = new_authorized_client(&backend, &other).unwrap();
    assert_eq!(
        stranger.get_data("/secured"),
        Err(CoordinationError::no_auth("/secured"))
    );
    stranger.close();
}

#[test]
fn test_hashed_identity_is_not_a_password() {
    let backend = MemoryCoordinationBackend::new();
    create_secured_node(&backend, &credential(), "/secured").unwrap();

    // Presenting the ACL identity instead of the raw credential must not authenticate.
    let options = SessionOptions::new(CONNECT_STRING)
        .with_authorization("digest", digest_identity("u", "p").into_bytes());
    let mut session = backend.connect_with_retry(&options).unwrap();
    assert_eq!(
        session.get_data("/secured"),
        Err(CoordinationError::no_auth("/secured"))
    );
    session.close();
}

#[test]
fn test_owner_can_create_children_others_cannot() {
    let backend = MemoryCoordinationBackend::new();
    let credential = credential();
    create_secured_node(&backend, &credential, "/secured").unwrap();

    let mut owner = new_authorized_client(&backend, &credential).unwrap();
    owner
        .create("/secured/child", &CreateRequest::new())
        .unwrap();
    owner.close();

    let mut anonymous = new_client(&backend, CONNECT_STRING).unwrap();
    assert_eq!(
        anonymous.create("/secured/other", &CreateRequest::new()),
        Err(CoordinationError::no_auth("/secured"))
    );
    assert_eq!(
        anonymous.delete("/secured/child"),
        Err(CoordinationError::no_auth("/secured"))
    );
    anonymous.close();
}

#[test]
fn test_concurrent_provisioning_of_distinct_paths() {
    let backend = MemoryCoordinationBackend::new();
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let backend = backend.clone();
            std::thread::spawn(move || {
                create_secured_node(&backend, &credential(), &format!("/node-{i}"))
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap().unwrap();
    }
    assert_eq!(backend.node_count(), 9);
    assert_eq!(backend.open_session_count(), 0);
}

#[test]
fn test_concurrent_provisioning_of_same_path_creates_once() {
    let backend = MemoryCoordinationBackend::new();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let backend = backend.clone();
            std::thread::spawn(move || create_secured_node(&backend, &credential(), "/shared"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    for err in results.into_iter().filter_map(Result::err) {
        assert_eq!(err.backend_error(), &CoordinationError::node_exists("/shared"));
    }
    assert_eq!(backend.open_session_count(), 0);
}
