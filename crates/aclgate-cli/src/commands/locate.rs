//! `aclgate locate`

use super::common;
use aclgate::AclChecker;
use anyhow::Result;
use clap::Args;
use std::process::ExitCode;

/// Arguments for a governing-document lookup
#[derive(Args, Debug)]
pub struct LocateArgs {
    /// Resource URL, absolute or relative to the configured base URL
    pub resource: String,
}

/// Print where the governing document lives
pub async fn run(checker: &AclChecker, args: LocateArgs) -> Result<ExitCode> {
    let resource = common::resolve_resource(checker, &args.resource)?;

    match checker.locate(&resource).await {
        Ok(document) => {
            println!("document:  {}", document.url);
            println!("path:      {}", document.path);
            println!("governs:   {}", document.governed);
            println!("inherited: {}", document.inherited);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            println!("error: {e}");
            Ok(common::exit_code(&e))
        }
    }
}
