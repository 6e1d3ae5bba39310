//! The `logout` command

use std::path::PathBuf;

use clap::Args;

use crate::config::DEFAULT_SESSION_FILE;
use crate::error::PewResult;
use crate::storage::SessionStore;

#[derive(Args, Debug, Clone)]
pub struct LogoutArgs {
    /// Session file to remove
    #[arg(long, env = "PEW_SESSION_FILE", default_value = DEFAULT_SESSION_FILE)]
    pub session_file: PathBuf,
}

/// Delete the saved session so the next run starts from scratch
pub fn handle_logout_command(args: LogoutArgs) -> PewResult<()> {
    let store = SessionStore::new(args.session_file);
    if store.clear()? {
        println!("Removed session file {}", store.path().display());
        println!("The next run will ask for a verification code.");
    } else {
        println!("No session file at {}", store.path().display());
    }
    Ok(())
}
