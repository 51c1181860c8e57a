//! `aclgate permissions`

use super::common;
use aclgate::{AclChecker, AgentId};
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

/// Arguments for a permissions query
#[derive(Args, Debug)]
pub struct PermissionsArgs {
    /// Resource URL, absolute or relative to the configured base URL
    pub resource: String,

    /// WebID of the requesting agent
    #[arg(short, long)]
    pub agent: Option<String>,

    /// Origin header of the request
    #[arg(short, long)]
    pub origin: Option<String>,
}

/// Print the WAC-Allow value for the resource
pub async fn run(checker: &AclChecker, args: PermissionsArgs) -> Result<ExitCode> {
    let resource = common::resolve_resource(checker, &args.resource)?;
    let agent = args.agent.map(AgentId::new);

    match checker
        .wac_allow(&resource, agent.as_ref(), args.origin.as_deref())
        .await
    {
        Ok(allow) => {
            println!("WAC-Allow: {allow}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("error: {e}");
            Ok(common::exit_code(&e))
        }
    }
}
