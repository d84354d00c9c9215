use std::path::Path;
use std::process::Command;
use tracing::debug;

use crate::error::{CensusError, Result};

/// Run `git <args>` inside `dir`, returning stdout. A non-zero exit is an error.
pub fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    debug!(dir = %dir.display(), "git {}", args.join(" "));
    let output = Command::new("git").args(args).current_dir(dir).output()?;

    if !output.status.success() {
        return Err(CensusError::command("git", args, &output));
    }
    Ok(String::from_utf8(output.stdout)?)
}
