//! # aclgate - control-document resolution and access decisions
//!
//! **Purpose**: decide whether an agent may perform an access mode on a
//! resource in a hierarchical store, before the store is touched.
//!
//! Most resources carry no control document of their own. [`AclChecker`]
//! finds the nearest one by walking up the container hierarchy, computes the
//! modes that must be proven (control documents always require `Control`),
//! and hands both to a [`PolicyEvaluator`]. The outcome is either `Ok(())` or
//! an [`AclError`] whose [`StatusClass`] tells the caller how to respond.
//!
//! ## Collaborators
//!
//! Each collaborator sits behind a trait and has one reference
//! implementation:
//!
//! - [`ResourceMapper`]: identifier ⇄ physical path ([`UrlPathMapper`])
//! - [`ControlDocumentStore`]: document reads ([`FilesystemStore`], [`MemoryStore`])
//! - [`PolicyParser`]: text → [`PolicyGraph`] ([`JsonAclParser`])
//! - [`PolicyEvaluator`]: graph + request → [`Decision`] ([`WacEvaluator`])
//!
//! ## What's NOT in this crate
//!
//! - HTTP transport and request parsing
//! - Editing or validating policy documents
//! - Caching; every check re-reads the documents it needs

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Governing-document resolution and the access check itself
pub mod checker;

/// Checker configuration
pub mod config;

/// Error type and caller-visible status classes
pub mod errors;

/// Identifier ⇄ path mapping
pub mod mapper;

/// Access modes and mode sets
pub mod mode;

/// Pure path helpers
pub mod path;

/// Policy graphs, parsing and evaluation
pub mod policy;

/// Request-scoped inputs
pub mod request;

/// Control document reads
pub mod store;

pub use checker::{AclChecker, GoverningDocument};
pub use config::{AclConfig, DEFAULT_ACL_SUFFIX};
pub use errors::{AclError, AclResult, StatusClass};
pub use mapper::{ResourceMapper, ResourcePath, UrlPathMapper};
pub use mode::{AccessMode, ModeSet, WacAllow};
pub use policy::{
    AgentClass, Authorization, Decision, DecisionRequest, JsonAclParser, ParseError,
    PolicyEvaluator, PolicyGraph, PolicyParser, WacEvaluator,
};
pub use request::{AccessRequest, AgentId, TrustContext};
pub use store::{ControlDocumentStore, FilesystemStore, MemoryStore, ReadError};

// Re-exported so callers can build identifiers without a direct dependency.
pub use url::Url;
