use console::style;
use std::path::Path;
use tracing::info;

use crate::config::Pattern;
use crate::error::Result;
use crate::model::{CensusOutput, Sample};

/// Serialize the whole document in one write.
pub fn write_json(output: &CensusOutput, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), projects = output.len(), "results written");
    Ok(())
}

pub fn output_summary(output: &CensusOutput, patterns: &[Pattern]) {
    println!("{}", style("Census Summary").bold());
    println!("{}", "─".repeat(50));

    for (project, samples) in output {
        println!(
            "{} {}",
            style(project).cyan().bold(),
            style(format!("({} samples)", samples.len())).dim()
        );

        let (Some(newest), Some(oldest)) = (samples.first(), samples.last()) else {
            println!("  no commits sampled");
            continue;
        };

        println!(
            "  {:<24} {:>12} {:>12}",
            "",
            style(short_date(oldest)).dim(),
            style(short_date(newest)).dim()
        );
        for (i, pattern) in patterns.iter().enumerate() {
            let then = oldest.results.get(i).map_or(0, |r| r.total);
            let now = newest.results.get(i).map_or(0, |r| r.total);
            let now_styled = if now > then {
                style(now).green()
            } else if now < then {
                style(now).red()
            } else {
                style(now)
            };
            println!("  {:<24} {:>12} {:>12}", pattern.name, then, now_styled);
        }
    }
}

fn short_date(sample: &Sample) -> &str {
    sample.timestamp.get(..10).unwrap_or(&sample.timestamp)
}
