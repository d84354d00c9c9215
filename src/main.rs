use anyhow::Result;
use callback_census::cli::Cli;

fn main() -> Result<()> {
    callback_census::logging::init();
    let cli = Cli::parse();
    cli.execute()
}
