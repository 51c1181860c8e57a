//! Policy documents and their evaluation
//!
//! The checker never looks inside a control document. It hands the raw text to
//! a [`PolicyParser`] and the resulting [`PolicyGraph`] to a
//! [`PolicyEvaluator`], then classifies the [`Decision`].

use crate::mode::{AccessMode, ModeSet};
use crate::request::{AgentId, TrustContext};
use url::Url;

mod document;
mod evaluation;

pub use document::JsonAclParser;
pub use evaluation::WacEvaluator;

/// Class of agents an authorization can name instead of individual agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentClass {
    /// Everyone, including anonymous requests
    Everyone,
    /// Any request that carries an agent identifier
    Authenticated,
}

/// One grant: some agents may use some modes on some resources
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Authorization {
    /// Identifier of the authorization within its document
    pub id: Option<Url>,
    /// Individually named agents
    pub agents: Vec<String>,
    /// Agent classes
    pub agent_classes: Vec<AgentClass>,
    /// Resources the grant applies to directly
    pub access_to: Vec<Url>,
    /// Containers whose descendants inherit the grant
    pub defaults: Vec<Url>,
    /// Granted modes
    pub modes: ModeSet,
    /// Origins the grant is restricted to when origins are checked strictly
    pub origins: Vec<String>,
}

impl Authorization {
    /// Whether the grant covers `mode`; `Write` implies `Append`
    pub fn grants(&self, mode: AccessMode) -> bool {
        self.modes.contains(mode)
            || (mode == AccessMode::Append && self.modes.contains(AccessMode::Write))
    }

    /// Whether the grant names `agent` individually or by class
    pub fn applies_to_agent(&self, agent: Option<&AgentId>) -> bool {
        self.agent_classes.iter().any(|class| match class {
            AgentClass::Everyone => true,
            AgentClass::Authenticated => agent.is_some(),
        }) || agent.is_some_and(|agent| self.agents.iter().any(|a| a == agent.as_str()))
    }

    /// Whether the grant targets `governed`, directly or by inheritance
    pub fn targets(&self, governed: &Url, inherited: bool) -> bool {
        let targets = if inherited {
            &self.defaults
        } else {
            &self.access_to
        };
        targets.iter().any(|target| target == governed)
    }
}

/// Parsed, queryable form of a control document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PolicyGraph {
    /// Authorizations in document order
    pub authorizations: Vec<Authorization>,
}

/// Failure parsing a control document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The text is not a well-formed document
    #[error("Syntax error at line {line} column {column}: {message}")]
    Syntax {
        /// Line of the first error
        line: usize,
        /// Column of the first error
        column: usize,
        /// Parser message, which may quote document content
        message: String,
    },

    /// An identifier could not be resolved against the document base
    #[error("Invalid IRI {value:?}: {reason}")]
    InvalidIri {
        /// Offending value
        value: String,
        /// Resolution failure
        reason: String,
    },

    /// A mode term is not part of the vocabulary
    #[error("Unknown mode {0:?}")]
    UnknownMode(String),

    /// An agent class term is not recognised
    #[error("Unknown agent class {0:?}")]
    UnknownAgentClass(String),
}

impl ParseError {
    /// Description that never quotes document content
    pub fn summary(&self) -> String {
        match self {
            Self::Syntax { line, column, .. } => {
                format!("syntax error at line {line} column {column}")
            }
            Self::InvalidIri { .. } => "invalid IRI".to_string(),
            Self::UnknownMode(_) => "unknown access mode".to_string(),
            Self::UnknownAgentClass(_) => "unknown agent class".to_string(),
        }
    }
}

/// Turns control-document text into a [`PolicyGraph`]
pub trait PolicyParser: Send + Sync {
    /// Parse `text`, resolving relative identifiers against `base`
    fn parse(&self, text: &str, base: &Url) -> Result<PolicyGraph, ParseError>;
}

/// Everything an evaluator needs to decide one check
#[derive(Debug, Clone, Copy)]
pub struct DecisionRequest<'a> {
    /// Parsed governing document
    pub graph: &'a PolicyGraph,
    /// Identifier of the governing document
    pub document: &'a Url,
    /// Resource or container the governing document is attached to
    pub governed: &'a Url,
    /// Whether the document was inherited from an ancestor container
    pub inherited: bool,
    /// Original target of the check
    pub resource: &'a Url,
    /// Requesting agent, if any
    pub agent: Option<&'a AgentId>,
    /// Modes that must all be granted
    pub required: &'a ModeSet,
    /// Origin information, passed through unchanged
    pub trust: &'a TrustContext,
}

/// Outcome of policy evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Every required mode is granted
    Allowed,
    /// At least one required mode is not granted
    Denied {
        /// Why, if the evaluator can say without revealing the document
        reason: Option<String>,
    },
}

impl Decision {
    /// Deny with a reason
    pub fn deny(reason: impl Into<String>) -> Self {
        Self::Denied {
            reason: Some(reason.into()),
        }
    }

    /// Whether access was granted
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Decides whether a [`DecisionRequest`] is granted by its policy graph
pub trait PolicyEvaluator: Send + Sync {
    /// Evaluate one request
    fn evaluate(&self, request: &DecisionRequest<'_>) -> Decision;
}
