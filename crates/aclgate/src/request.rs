//! Request-scoped inputs to a check

use crate::mode::AccessMode;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Opaque identifier of the requesting party (typically a WebID)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Wrap an agent identifier
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The identifier as a string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AgentId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One access check: who wants to do what to which resource, from where
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    /// Target resource identifier
    pub resource: Url,
    /// Requesting agent; `None` for anonymous requests
    pub agent: Option<AgentId>,
    /// Requested mode
    pub mode: AccessMode,
    /// Declared request origin, if any
    pub origin: Option<String>,
}

impl AccessRequest {
    /// Request without an origin
    pub fn new(resource: Url, agent: Option<AgentId>, mode: AccessMode) -> Self {
        Self {
            resource,
            agent,
            mode,
            origin: None,
        }
    }

    /// Attach a request origin
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }
}

/// Origin information handed unchanged to the policy evaluator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustContext {
    /// Declared request origin
    pub origin: Option<String>,
    /// Configured trusted origins
    pub trusted_origins: Vec<String>,
    /// Configured strict-origin flag
    pub strict_origin: bool,
}

impl TrustContext {
    /// Whether `origin` is in the configured trusted set.
    ///
    /// Surrounding whitespace and a trailing `/` are ignored on both sides.
    pub fn is_trusted(&self, origin: &str) -> bool {
        let origin = bare_origin(origin);
        self.trusted_origins
            .iter()
            .any(|trusted| bare_origin(trusted) == origin)
    }
}

fn bare_origin(origin: &str) -> &str {
    origin.trim().trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusted_origins_ignore_trailing_slash() {
        let trust = TrustContext {
            origin: None,
            trusted_origins: vec!["https://app.example/".to_string()],
            strict_origin: true,
        };
        assert!(trust.is_trusted("https://app.example"));
        assert!(trust.is_trusted(" https://app.example/ "));
        assert!(!trust.is_trusted("https://other.example"));
    }

    #[test]
    fn test_request_builder() {
        let resource = Url::parse("https://pod.example/a.txt").unwrap();
        let agent = AgentId::from("https://alice.example/#me");
        let request = AccessRequest::new(resource, Some(agent), AccessMode::Read)
            .with_origin("https://app.example");
        assert_eq!(request.origin.as_deref(), Some("https://app.example"));
        assert_eq!(
            request.agent.as_ref().map(AgentId::as_str),
            Some("https://alice.example/#me")
        );
    }
}
