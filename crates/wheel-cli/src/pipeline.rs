//! Stage functions shared by the import subcommands.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use wheel_api::{ImportApiClient, JobTracker, JobView};
use wheel_cli::overrides_doc::OverrideDoc;
use wheel_model::{CsvDataset, GeneratedStructure, ImportJob, ImportMode};

/// Imports above this row count get a duration note and a notification hint.
pub const LARGE_IMPORT_ROWS: usize = 500;

/// Show what is about to happen and ask for confirmation.
///
/// Replace mode always spells out the destructive consequence before the
/// prompt. Returns `false` when the operator declines.
pub fn confirm_upload(dataset: &CsvDataset, mode: ImportMode, assume_yes: bool) -> Result<bool> {
    println!(
        "{}: {} columns, {} data rows",
        dataset.source_name,
        dataset.headers.len(),
        dataset.row_count()
    );
    if mode == ImportMode::Replace {
        println!(
            "WARNING: replace mode deletes the wheel's existing rings, activity groups,\n\
             labels and activities before importing. Pages are preserved."
        );
    }
    if dataset.row_count() > LARGE_IMPORT_ROWS {
        println!(
            "Large import ({} rows): expect this to take several minutes.\n\
             Consider --notify-email for completion mail and --detach to exit early.",
            dataset.row_count()
        );
    }
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no("Proceed?")
}

/// Confirm a destructive resubmission.
pub fn confirm_replace_submit(assume_yes: bool) -> Result<bool> {
    println!(
        "WARNING: replace mode deletes the wheel's existing rings, activity groups,\n\
         labels and activities before importing. Pages are preserved."
    );
    if assume_yes {
        return Ok(true);
    }
    prompt_yes_no("Proceed?")
}

fn prompt_yes_no(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().context("flush prompt")?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}

/// Load a review override document from a JSON file.
pub fn load_override_doc(path: &Path) -> Result<OverrideDoc> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read overrides {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse overrides {}", path.display()))
}

/// Load a structure saved by `import --structure-out`.
pub fn load_structure(path: &Path) -> Result<GeneratedStructure> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read structure {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parse structure {}", path.display()))
}

/// Write the finalized structure for a later `submit`.
pub fn write_structure(path: &Path, structure: &GeneratedStructure) -> Result<()> {
    let json = serde_json::to_string_pretty(structure).context("serialize structure")?;
    std::fs::write(path, json).with_context(|| format!("write structure {}", path.display()))?;
    info!(path = %path.display(), "structure written");
    Ok(())
}

/// Track a job to its terminal state with a live progress bar.
pub async fn track_job(
    client: &ImportApiClient,
    job_id: &str,
    poll_interval_secs: u64,
) -> Result<ImportJob> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{spinner:.green} [{bar:40.cyan/blue}] {pos:>3}% {msg}")
            .context("progress template")?
            .progress_chars("#>-"),
    );

    let mut tracker = JobTracker::spawn(
        client.clone(),
        job_id,
        Duration::from_secs(poll_interval_secs.max(1)),
    );
    while let Some(job) = tracker.next_snapshot().await {
        let view = JobView::from(&job);
        bar.set_position(u64::from(view.percent));
        if let Some(step) = view.current_step {
            bar.set_message(step);
        }
        if job.is_terminal() {
            bar.finish_and_clear();
            return Ok(job);
        }
    }
    bar.finish_and_clear();
    match tracker.latest() {
        Some(job) if job.is_terminal() => Ok(job),
        _ => bail!("job status feed closed before {job_id} reached a terminal state"),
    }
}
