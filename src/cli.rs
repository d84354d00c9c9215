use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

use crate::config::DEFAULT_OUTPUT;
use crate::search::Backend;

#[derive(Parser)]
#[command(name = "callback-census")]
#[command(about = "Weekly counts of callback-style vs async idioms across repository history")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub run: RunArgs,
}

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    #[arg(long, help = "Directory holding one clone per project", default_value = ".")]
    pub workdir: PathBuf,

    #[arg(long, help = "JSON file with projects and patterns (defaults to the built-in set)")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Where to write the results document", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    #[arg(long = "project", help = "Only walk this project (repeatable)")]
    pub project: Vec<String>,

    #[arg(long, help = "Do not fetch remotes before walking")]
    pub offline: bool,

    #[arg(long, value_enum, help = "Pattern search backend", default_value_t = Backend::Grep)]
    pub search: Backend,

    #[arg(long, help = "Starting cutoff (RFC3339 or YYYY-MM-DD); defaults to last Monday midnight")]
    pub cutoff: Option<String>,

    #[arg(long, short, help = "No progress bars or summary")]
    pub quiet: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::census::exec(self.run)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_match_builtin_run() {
        let cli = Cli::try_parse_from(["callback-census"]).unwrap();
        assert_eq!(cli.run.workdir, PathBuf::from("."));
        assert_eq!(cli.run.output, PathBuf::from("results.json"));
        assert_eq!(cli.run.search, Backend::Grep);
        assert!(!cli.run.offline);
        assert!(cli.run.project.is_empty());
    }

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "callback-census",
            "--offline",
            "--search",
            "native",
            "--project",
            "synapse",
            "--cutoff",
            "2020-01-06",
        ])
        .unwrap();
        assert!(cli.run.offline);
        assert_eq!(cli.run.search, Backend::Native);
        assert_eq!(cli.run.project, vec!["synapse".to_string()]);
        assert_eq!(cli.run.cutoff.as_deref(), Some("2020-01-06"));
    }
}
