//! Error handling for access checks
//!
//! Every failure a check can produce is a variant of [`AclError`]. Callers pick
//! a response class with [`AclError::status_class`]; nothing in this crate
//! retries, and no variant carries control-document content.

use crate::mode::ModeSet;

/// Result alias used throughout the crate
pub type AclResult<T> = std::result::Result<T, AclError>;

/// Caller-visible class of a failed check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    /// The request could not be interpreted (unmappable resource)
    BadRequest,
    /// Access denied and no agent was supplied
    AuthenticationRequired,
    /// Access denied for an identified agent
    Forbidden,
    /// Store or configuration problem, not retryable
    ServerError,
}

impl StatusClass {
    /// The HTTP status code conventionally used for this class
    pub fn http_status(self) -> u16 {
        match self {
            Self::BadRequest => 400,
            Self::AuthenticationRequired => 401,
            Self::Forbidden => 403,
            Self::ServerError => 500,
        }
    }
}

/// Failure of an access check or of the configuration it runs under
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AclError {
    /// Access denied and the request carried no agent
    #[error("Authentication required: {reason}")]
    Unauthenticated {
        /// Denial reason reported by the evaluator
        reason: String,
    },

    /// Access denied for an identified agent
    #[error("Forbidden: {reason}")]
    Forbidden {
        /// Denial reason reported by the evaluator
        reason: String,
    },

    /// The walk reached the store root without finding a control document
    #[error("Server has been misconfigured: no root control document under {root}")]
    MisconfiguredStore {
        /// Configured store root
        root: String,
    },

    /// A control document exists but could not be read
    #[error("Control document {path} could not be read: {reason}")]
    UnreadableControlDocument {
        /// Physical path of the document
        path: String,
        /// Underlying read failure
        reason: String,
    },

    /// The governing control document failed to parse
    #[error("Control document {path} is malformed: {reason}")]
    MalformedControlDocument {
        /// Physical path of the document
        path: String,
        /// Parser diagnostic (never the document body)
        reason: String,
    },

    /// The minimum path length guard fired before reaching the store root
    #[error("Failed to resolve control document: walk degenerated at {path:?}")]
    TraversalGuardTripped {
        /// Container path at which the guard fired
        path: String,
    },

    /// The walk took more upward steps than allowed
    #[error("Failed to resolve control document: exceeded {limit} levels")]
    WalkDepthExceeded {
        /// Configured step limit
        limit: usize,
    },

    /// The check did not finish within its wall-clock bound
    #[error("Failed to resolve control document within {timeout_ms}ms")]
    WalkTimedOut {
        /// Configured timeout in milliseconds
        timeout_ms: u64,
    },

    /// The resource identifier cannot be mapped onto the store
    #[error("Invalid resource {resource}: {reason}")]
    InvalidResource {
        /// Offending identifier or path
        resource: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration could not be loaded or failed validation
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the problem
        message: String,
    },
}

impl AclError {
    /// Classify a policy denial by whether an agent was present
    pub fn denied(authenticated: bool, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        if authenticated {
            Self::Forbidden { reason }
        } else {
            Self::Unauthenticated { reason }
        }
    }

    /// Create a misconfigured store error
    pub fn misconfigured_store(root: impl Into<String>) -> Self {
        Self::MisconfiguredStore { root: root.into() }
    }

    /// Create an unreadable control document error
    pub fn unreadable(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::UnreadableControlDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a malformed control document error
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedControlDocument {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a traversal guard error
    pub fn traversal_guard(path: impl Into<String>) -> Self {
        Self::TraversalGuardTripped { path: path.into() }
    }

    /// Create an invalid resource error
    pub fn invalid_resource(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResource {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// The response class a caller should use for this failure
    pub fn status_class(&self) -> StatusClass {
        match self {
            Self::Unauthenticated { .. } => StatusClass::AuthenticationRequired,
            Self::Forbidden { .. } => StatusClass::Forbidden,
            Self::InvalidResource { .. } => StatusClass::BadRequest,
            Self::MisconfiguredStore { .. }
            | Self::UnreadableControlDocument { .. }
            | Self::MalformedControlDocument { .. }
            | Self::TraversalGuardTripped { .. }
            | Self::WalkDepthExceeded { .. }
            | Self::WalkTimedOut { .. }
            | Self::Config { .. } => StatusClass::ServerError,
        }
    }

    /// Whether this failure is a policy denial rather than a fault
    pub fn is_denial(&self) -> bool {
        matches!(self, Self::Unauthenticated { .. } | Self::Forbidden { .. })
    }
}

/// Render the modes a denial was about, for log fields and reasons
pub(crate) fn describe_modes(modes: &ModeSet) -> String {
    modes
        .iter()
        .map(|mode| mode.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
