// Command modules for the CLI

/// Single access check
pub mod check;

/// Shared config loading and exit codes
pub mod common;

/// Governing-document lookup
pub mod locate;

/// Mode listing in WAC-Allow form
pub mod permissions;
