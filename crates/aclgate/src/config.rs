//! Checker configuration
//!
//! One immutable [`AclConfig`] is supplied when an [`AclChecker`] is built.
//! It can be loaded from TOML, overlaid with `ACLGATE_*` environment variables
//! and must pass [`AclConfig::validate`] before use.
//!
//! [`AclChecker`]: crate::AclChecker

use crate::errors::{AclError, AclResult};
use crate::path::{is_container, SEPARATOR};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default control-document suffix
pub const DEFAULT_ACL_SUFFIX: &str = ".acl";

/// Default bound on upward walk steps
pub const DEFAULT_MAX_WALK_DEPTH: usize = 256;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ACLGATE_";

/// Configuration for an access checker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AclConfig {
    /// Suffix that marks control documents
    pub suffix: String,
    /// Physical path of the top-most container; the walk never goes above it
    pub store_root: String,
    /// Public URL that maps onto `store_root`; required
    pub base_url: Option<Url>,
    /// Require untrusted origins to be named by the matching authorization
    pub strict_origin: bool,
    /// Origins trusted for every authorization
    pub trusted_origins: Vec<String>,
    /// Maximum number of upward steps in one walk
    pub max_walk_depth: usize,
    /// Optional wall-clock bound on a whole check
    pub walk_timeout_ms: Option<u64>,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            suffix: DEFAULT_ACL_SUFFIX.to_string(),
            store_root: "/".to_string(),
            base_url: None,
            strict_origin: true,
            trusted_origins: Vec::new(),
            max_walk_depth: DEFAULT_MAX_WALK_DEPTH,
            walk_timeout_ms: None,
        }
    }
}

impl AclConfig {
    /// Configuration for a store rooted at `store_root` and served under `base_url`
    pub fn new(store_root: impl Into<String>, base_url: Url) -> Self {
        Self {
            store_root: store_root.into(),
            base_url: Some(base_url),
            ..Self::default()
        }
    }

    /// Use a different control-document suffix
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Set the strict-origin flag
    pub fn with_strict_origin(mut self, strict: bool) -> Self {
        self.strict_origin = strict;
        self
    }

    /// Replace the trusted origin list
    pub fn with_trusted_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trusted_origins = origins.into_iter().map(Into::into).collect();
        self
    }

    /// Bound the number of upward walk steps
    pub fn with_max_walk_depth(mut self, depth: usize) -> Self {
        self.max_walk_depth = depth;
        self
    }

    /// Bound the wall-clock time of a check
    pub fn with_walk_timeout(mut self, timeout: Duration) -> Self {
        self.walk_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Wall-clock bound as a [`Duration`]
    pub fn walk_timeout(&self) -> Option<Duration> {
        self.walk_timeout_ms.map(Duration::from_millis)
    }

    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(content: &str) -> AclResult<Self> {
        toml::from_str(content).map_err(|e| AclError::config(format!("Invalid TOML: {e}")))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> AclResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AclError::config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&content)
    }

    /// Overlay `ACLGATE_*` variables from the process environment
    pub fn merge_with_env(&mut self) -> AclResult<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Overlay `ACLGATE_*` entries from an arbitrary variable source
    pub fn merge_with_vars<I>(&mut self, vars: I) -> AclResult<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            let Some(name) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match name {
                "SUFFIX" => self.suffix = value,
                "STORE_ROOT" => self.store_root = value,
                "BASE_URL" => {
                    self.base_url = Some(
                        Url::parse(&value)
                            .map_err(|e| AclError::config(format!("{key}: {e}")))?,
                    );
                }
                "STRICT_ORIGIN" => self.strict_origin = parse_flag(&key, &value)?,
                "TRUSTED_ORIGINS" => {
                    self.trusted_origins = value
                        .split(',')
                        .map(str::trim)
                        .filter(|origin| !origin.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "MAX_WALK_DEPTH" => {
                    self.max_walk_depth = value
                        .parse()
                        .map_err(|e| AclError::config(format!("{key}: {e}")))?;
                }
                "WALK_TIMEOUT_MS" => {
                    self.walk_timeout_ms = if value.is_empty() {
                        None
                    } else {
                        Some(
                            value
                                .parse()
                                .map_err(|e| AclError::config(format!("{key}: {e}")))?,
                        )
                    };
                }
                _ => {
                    tracing::debug!(variable = %key, "Ignoring unknown configuration variable");
                }
            }
        }
        Ok(())
    }

    /// The configured base URL, or a config error if none was given
    pub fn require_base_url(&self) -> AclResult<&Url> {
        self.base_url
            .as_ref()
            .ok_or_else(|| AclError::config("base_url is required"))
    }

    /// Check that the configuration can drive a terminating walk
    pub fn validate(&self) -> AclResult<()> {
        if self.suffix.is_empty() || !self.suffix.starts_with('.') {
            return Err(AclError::config(format!(
                "suffix must start with '.': {:?}",
                self.suffix
            )));
        }
        if self.suffix.contains(SEPARATOR) {
            return Err(AclError::config(format!(
                "suffix must not contain '{SEPARATOR}': {:?}",
                self.suffix
            )));
        }
        if !self.store_root.starts_with(SEPARATOR) || !is_container(&self.store_root) {
            return Err(AclError::config(format!(
                "store_root must be absolute and end with '{SEPARATOR}': {:?}",
                self.store_root
            )));
        }
        let base_url = self.require_base_url()?;
        if !base_url.path().ends_with(SEPARATOR) {
            return Err(AclError::config(format!(
                "base_url must end with '{SEPARATOR}': {base_url}"
            )));
        }
        if self.max_walk_depth == 0 {
            return Err(AclError::config("max_walk_depth must be at least 1"));
        }
        if self.walk_timeout_ms == Some(0) {
            return Err(AclError::config(
                "walk_timeout_ms must be at least 1; omit it for no bound",
            ));
        }
        Ok(())
    }
}

fn parse_flag(key: &str, value: &str) -> AclResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(AclError::config(format!("{key}: expected a boolean, got {value:?}"))),
    }
}
