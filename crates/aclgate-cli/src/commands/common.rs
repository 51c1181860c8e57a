//! Shared helpers for CLI commands

use aclgate::{AclChecker, AclConfig, AclError, FilesystemStore, StatusClass, Url};
use anyhow::{Context, Result};
use std::path::Path;
use std::process::ExitCode;

/// Build a checker from `path`, overlaid with `ACLGATE_*` variables.
///
/// A missing file falls back to defaults so a store can be described by the
/// environment alone.
pub fn load_checker(path: &Path) -> Result<AclChecker> {
    let mut config = if path.exists() {
        AclConfig::load_from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?
    } else {
        tracing::debug!(path = %path.display(), "Config file not found, using defaults");
        AclConfig::default()
    };
    config
        .merge_with_env()
        .context("applying ACLGATE_* overrides")?;

    tracing::debug!(
        store_root = %config.store_root,
        base_url = ?config.base_url.as_ref().map(Url::as_str),
        suffix = %config.suffix,
        "Loaded configuration"
    );
    AclChecker::new(config, FilesystemStore::new()).context("invalid configuration")
}

/// Resolve `resource` against the configured base URL.
///
/// Absolute URLs pass through unchanged; anything else is taken relative to
/// the base.
pub fn resolve_resource(checker: &AclChecker, resource: &str) -> Result<Url> {
    checker
        .config()
        .require_base_url()?
        .join(resource)
        .with_context(|| format!("invalid resource {resource:?}"))
}

/// Exit code clap uses for usage errors
const USAGE_EXIT_CODE: u8 = 2;

/// Process exit code for a failed check.
///
/// Codes 1 (startup failure) and 2 (usage error) are never produced here.
pub fn exit_code(error: &AclError) -> ExitCode {
    ExitCode::from(status_code(error.status_class()))
}

fn status_code(class: StatusClass) -> u8 {
    match class {
        StatusClass::AuthenticationRequired => 3,
        StatusClass::Forbidden => 4,
        StatusClass::ServerError => 5,
        StatusClass::BadRequest => 6,
    }
}
