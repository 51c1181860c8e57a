//! Shared fixtures for access-check integration tests

#![allow(dead_code, clippy::unwrap_used)]

use aclgate::{AclChecker, AclConfig, ControlDocumentStore, MemoryStore, ReadError, Url};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

pub const STORE_ROOT: &str = "/srv/pod/";
pub const BASE_URL: &str = "https://pod.example/";
pub const ALICE: &str = "https://alice.example/profile#me";
pub const BOB: &str = "https://bob.example/profile#me";

pub fn config() -> AclConfig {
    AclConfig::new(STORE_ROOT, Url::parse(BASE_URL).unwrap())
}

pub fn url(path: &str) -> Url {
    Url::parse(BASE_URL).unwrap().join(path).unwrap()
}

/// Physical path under the store root
pub fn physical(path: &str) -> String {
    format!("{STORE_ROOT}{path}")
}

/// Control document granting `modes` to `agent` on the container it sits in
/// and, by default, everything below it
pub fn grant(agent: &str, modes: &[&str]) -> String {
    serde_json::json!({
        "authorizations": [{
            "agent": [agent],
            "accessTo": ["./"],
            "default": ["./"],
            "mode": modes,
        }]
    })
    .to_string()
}

/// Control document granting `modes` to everyone
pub fn public(modes: &[&str]) -> String {
    serde_json::json!({
        "authorizations": [{
            "agentClass": ["Agent"],
            "accessTo": ["./"],
            "default": ["./"],
            "mode": modes,
        }]
    })
    .to_string()
}

/// Store wrapper that records every path it is asked for
#[derive(Clone, Default)]
pub struct RecordingStore {
    pub inner: MemoryStore,
    paths: Arc<Mutex<Vec<String>>>,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            paths: Arc::default(),
        }
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

#[async_trait]
impl ControlDocumentStore for RecordingStore {
    async fn read_text(&self, path: &str) -> Result<String, ReadError> {
        self.paths.lock().unwrap().push(path.to_string());
        self.inner.read_text(path).await
    }
}

pub fn checker(store: impl ControlDocumentStore + 'static) -> AclChecker {
    AclChecker::new(config(), store).unwrap()
}
