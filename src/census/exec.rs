use crate::census::{output_summary, write_json, Walk};
use crate::cli::RunArgs;
use crate::config::Config;
use crate::git::GitRepo;
use crate::model::CensusOutput;
use crate::util::{parse_date, week_start};
use anyhow::Context;
use chrono::Local;
use std::time::{Duration, Instant};
use tracing::info;

pub fn exec(args: RunArgs) -> anyhow::Result<()> {
    let started = Instant::now();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => Config::builtin(),
    };
    let config = config.select(&args.project).context("Invalid project selection")?;

    let cutoff = match &args.cutoff {
        Some(raw) => parse_date(raw).context("Invalid --cutoff")?,
        None => week_start(&Local::now()).context("Failed to compute start of week")?,
    };

    let search = args.search.build();
    let mut output = CensusOutput::new();

    for project in &config.projects {
        let location = project.location(&args.workdir);
        let repo = GitRepo::open(&location)
            .with_context(|| {
                format!(
                    "Failed to open repository for '{}' at {}",
                    project.name,
                    location.display()
                )
            })?
            .with_progress(!args.quiet);

        match (&project.remote, args.offline) {
            (Some(remote), false) => repo
                .fetch(remote)
                .with_context(|| format!("Failed to fetch '{remote}' for '{}'", project.name))?,
            (Some(remote), true) => info!(project = %project.name, remote = %remote, "offline, skipping fetch"),
            (None, _) => {}
        }

        let walk = Walk {
            repo: &repo,
            search: &*search,
            root: repo.path(),
            patterns: &config.patterns,
            show_progress: !args.quiet,
        };
        let samples = walk
            .run(project, cutoff)
            .with_context(|| format!("Failed to walk history of '{}'", project.name))?;
        output.insert(project.name.clone(), samples);
    }

    write_json(&output, &args.output)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    if !args.quiet {
        output_summary(&output, &config.patterns);
    }

    let elapsed = Duration::from_secs(started.elapsed().as_secs());
    info!(elapsed = %humantime::format_duration(elapsed), "census complete");
    Ok(())
}
