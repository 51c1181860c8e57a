//! `aclgate check`

use super::common;
use aclgate::{AccessMode, AccessRequest, AclChecker, AgentId};
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

/// Arguments for a single access check
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Resource URL, absolute or relative to the configured base URL
    pub resource: String,

    /// WebID of the requesting agent; omit for an anonymous request
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Access mode to check (read, write, append, control)
    #[arg(short, long, default_value = "read")]
    pub mode: AccessMode,

    /// Origin header of the request
    #[arg(short, long)]
    pub origin: Option<String>,
}

/// Run the check and print the outcome
pub async fn run(checker: &AclChecker, args: CheckArgs) -> Result<ExitCode> {
    let resource = common::resolve_resource(checker, &args.resource)?;
    let mut request = AccessRequest::new(resource, args.agent.map(AgentId::new), args.mode);
    if let Some(origin) = args.origin {
        request = request.with_origin(origin);
    }

    match checker.check_request(&request).await {
        Ok(()) => {
            println!("granted: {} on {}", request.mode, request.resource);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("{}: {e}", if e.is_denial() { "denied" } else { "error" });
            Ok(common::exit_code(&e))
        }
    }
}
