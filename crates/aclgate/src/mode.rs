//! Access modes and the set of modes a check must prove

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Namespace IRI for access-control vocabulary terms
pub const ACL_NAMESPACE: &str = "http://www.w3.org/ns/auth/acl#";

/// An access capability that can be requested on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AccessMode {
    /// Read the resource
    Read,
    /// Replace or delete the resource
    Write,
    /// Add to the resource without removing anything
    Append,
    /// Manage the resource's own control document
    Control,
}

impl AccessMode {
    /// Every mode, in a stable order
    pub const ALL: [AccessMode; 4] = [Self::Read, Self::Write, Self::Append, Self::Control];

    /// Canonical term name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Append => "Append",
            Self::Control => "Control",
        }
    }

    /// Full vocabulary IRI, e.g. `http://www.w3.org/ns/auth/acl#Read`
    pub fn iri(self) -> String {
        format!("{ACL_NAMESPACE}{}", self.as_str())
    }

    /// Lower-case token used in WAC-Allow header values
    pub fn wac_token(self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Append => "append",
            Self::Control => "control",
        }
    }
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing an access mode name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown access mode: {0}")]
pub struct UnknownModeError(pub String);

impl FromStr for AccessMode {
    type Err = UnknownModeError;

    /// Accepts `Read`, `read`, `acl:Read` and the full vocabulary IRI.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let term = s
            .strip_prefix(ACL_NAMESPACE)
            .or_else(|| s.strip_prefix("acl:"))
            .unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(term))
            .ok_or_else(|| UnknownModeError(s.to_string()))
    }
}

/// The set of modes that must all be proven for a check to pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModeSet(BTreeSet<AccessMode>);

impl ModeSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Modes required to perform `mode` on a resource.
    ///
    /// Control documents always additionally require `Control`.
    pub fn required(mode: AccessMode, is_control_document: bool) -> Self {
        let mut modes = Self::from(mode);
        if is_control_document {
            modes.insert(AccessMode::Control);
        }
        modes
    }

    /// Add a mode, returning whether it was newly inserted
    pub fn insert(&mut self, mode: AccessMode) -> bool {
        self.0.insert(mode)
    }

    /// Whether the set contains `mode`
    pub fn contains(&self, mode: AccessMode) -> bool {
        self.0.contains(&mode)
    }

    /// Iterate modes in canonical order
    pub fn iter(&self) -> impl Iterator<Item = AccessMode> + '_ {
        self.0.iter().copied()
    }

    /// Number of modes in the set
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Space-separated WAC-Allow tokens, e.g. `read write`
    pub fn wac_tokens(&self) -> String {
        self.iter()
            .map(AccessMode::wac_token)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<AccessMode> for ModeSet {
    fn from(mode: AccessMode) -> Self {
        Self(BTreeSet::from([mode]))
    }
}

impl FromIterator<AccessMode> for ModeSet {
    fn from_iter<I: IntoIterator<Item = AccessMode>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Agent and public mode sets for one resource, rendered as a WAC-Allow value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WacAllow {
    /// Modes held by the requesting agent
    pub user: ModeSet,
    /// Modes held by anyone, authenticated or not
    pub public: ModeSet,
}

impl fmt::Display for WacAllow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "user=\"{}\",public=\"{}\"",
            self.user.wac_tokens(),
            self.public.wac_tokens()
        )
    }
}
