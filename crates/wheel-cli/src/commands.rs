use anyhow::{Context, Result};
use tracing::{info, info_span, warn};

use wheel_api::{AnalyzeRequest, ClientConfig, ImportApiClient, SubmitRequest};
use wheel_cli::overrides_doc::OverrideDoc;
use wheel_ingest::read_dataset;
use wheel_map::{ColumnOverrides, ImportSession};
use wheel_model::{ImportMode, JobStatus};
use wheel_transform::{BuildOptions, build_structure};

use crate::cli::{AnalyzeArgs, CancelArgs, ImportArgs, StatusArgs, SubmitArgs};
use crate::pipeline::{
    confirm_replace_submit, confirm_upload, load_override_doc, load_structure, track_job,
    write_structure,
};
use crate::summary::{
    print_build_report, print_job_summary, print_suggestion_summary, print_suitability_warning,
};

/// Service connection settings resolved from flags and environment.
pub struct ServiceOpts {
    pub url: Option<String>,
    pub token: Option<String>,
}

fn build_client(service: &ServiceOpts) -> Result<ImportApiClient> {
    let url = service
        .url
        .as_deref()
        .context("service URL not set (use --service-url or WHEEL_SERVICE_URL)")?;
    let mut config = ClientConfig::new(url);
    config.token = service.token.clone();
    ImportApiClient::new(config).context("build HTTP client")
}

pub async fn run_import(args: &ImportArgs, service: &ServiceOpts) -> Result<i32> {
    let client = build_client(service)?;
    let mode = ImportMode::from(args.mode);
    let span = info_span!("import", file = %args.file.display(), mode = ?mode);
    let _guard = span.enter();

    let dataset =
        read_dataset(&args.file).with_context(|| format!("parse {}", args.file.display()))?;
    let source_name = dataset.source_name.clone();

    if !confirm_upload(&dataset, mode, args.yes)? {
        println!("Import aborted.");
        return Ok(1);
    }

    let mut session = ImportSession::new(mode);
    session.file_parsed(dataset)?;

    let request = AnalyzeRequest::from_dataset(session.confirmed()?, None);
    info!(rows = request.total_rows, "requesting column analysis");
    match client.analyze(&request).await {
        Ok(suggestion) => session.suggestion_received(suggestion)?,
        Err(error) => {
            session.analysis_failed(error.to_string())?;
            return Err(anyhow::Error::new(error).context("analysis failed"));
        }
    }

    if let Some(path) = &args.overrides {
        let doc: OverrideDoc = load_override_doc(path)?;
        // Column reassignments change how the data is read, so they need a
        // fresh mapping pass; entity edits apply to whatever mapping wins.
        if !doc.columns.is_empty() {
            let request =
                AnalyzeRequest::from_dataset(session.reanalyze()?, Some(doc.columns.clone()));
            info!("re-running analysis with column hints");
            match client.analyze(&request).await {
                Ok(suggestion) => session.suggestion_received(suggestion)?,
                Err(error) => {
                    session.analysis_failed(error.to_string())?;
                    return Err(anyhow::Error::new(error).context("re-analysis failed"));
                }
            }
        }
        doc.apply(session.review_mut()?)?;
        info!(path = %path.display(), "override document applied");
    }

    if let Err(error) = session.check_importable() {
        if let Ok(review) = session.review()
            && let Some(warning) = &review.suggestion.suitability_warning
        {
            print_suitability_warning(warning);
        }
        return Err(error.into());
    }

    let (structure, report) = {
        let review = session.review()?;
        build_structure(
            &review.suggestion,
            review.rings(),
            review.groups(),
            BuildOptions {
                fallback_year: args.fallback_year,
            },
        )
    };
    print_build_report(&report);

    if let Some(path) = &args.structure_out {
        write_structure(path, &structure)?;
        println!("Structure written to {}", path.display());
    }

    let mut submit = SubmitRequest::new(session.mode(), structure, source_name);
    if let Some(email) = &args.notify_email {
        submit = submit.with_notification_target(email);
    }
    let handle = client.submit(&submit).await.context("submit import job")?;
    session.job_submitted(handle.job_id.clone())?;
    println!("Job {} submitted.", handle.job_id);

    if args.detach {
        println!(
            "Detached. Check progress later with: wheel-import status {}",
            handle.job_id
        );
        return Ok(0);
    }

    let job = track_job(&client, &handle.job_id, args.poll_interval).await?;
    session.job_finished(job.clone())?;
    print_job_summary(&job);
    finish_code(&job, args.structure_out.is_some())
}

pub async fn run_analyze(args: &AnalyzeArgs, service: &ServiceOpts) -> Result<i32> {
    let client = build_client(service)?;
    let dataset =
        read_dataset(&args.file).with_context(|| format!("parse {}", args.file.display()))?;

    let hints: Option<ColumnOverrides> = match &args.hints {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read hints {}", path.display()))?;
            Some(
                serde_json::from_str(&text)
                    .with_context(|| format!("parse hints {}", path.display()))?,
            )
        }
        None => None,
    };

    let request = AnalyzeRequest::from_dataset(&dataset, hints);
    let suggestion = client.analyze(&request).await.context("analysis failed")?;
    print_suggestion_summary(&suggestion);
    Ok(0)
}

pub async fn run_submit(args: &SubmitArgs, service: &ServiceOpts) -> Result<i32> {
    let client = build_client(service)?;
    let mode = ImportMode::from(args.mode);
    let structure = load_structure(&args.structure)?;
    info!(
        items = structure.item_count(),
        pages = structure.pages.len(),
        "resubmitting saved structure"
    );

    if mode == ImportMode::Replace && !confirm_replace_submit(args.yes)? {
        println!("Submission aborted.");
        return Ok(1);
    }

    let source_name = args.source_name.clone().unwrap_or_else(|| {
        args.structure
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("structure.json")
            .to_string()
    });
    let mut submit = SubmitRequest::new(mode, structure, source_name);
    if let Some(email) = &args.notify_email {
        submit = submit.with_notification_target(email);
    }
    let handle = client.submit(&submit).await.context("submit import job")?;
    println!("Job {} submitted.", handle.job_id);

    if args.detach {
        println!(
            "Detached. Check progress later with: wheel-import status {}",
            handle.job_id
        );
        return Ok(0);
    }

    let job = track_job(&client, &handle.job_id, args.poll_interval).await?;
    print_job_summary(&job);
    finish_code(&job, true)
}

pub async fn run_status(args: &StatusArgs, service: &ServiceOpts) -> Result<i32> {
    let client = build_client(service)?;
    let job = if args.watch {
        track_job(&client, &args.job_id, args.poll_interval).await?
    } else {
        client
            .fetch_job(&args.job_id)
            .await
            .with_context(|| format!("fetch job {}", args.job_id))?
    };
    print_job_summary(&job);
    Ok(i32::from(job.status == JobStatus::Failed))
}

pub async fn run_cancel(args: &CancelArgs, service: &ServiceOpts) -> Result<i32> {
    let client = build_client(service)?;
    client
        .cancel_job(&args.job_id)
        .await
        .with_context(|| format!("cancel job {}", args.job_id))?;
    println!(
        "Cancellation requested for {}. The job stops at its next checkpoint.",
        args.job_id
    );
    Ok(0)
}

/// Exit code and retry hint for a terminal job.
fn finish_code(job: &wheel_model::ImportJob, structure_saved: bool) -> Result<i32> {
    if job.status == JobStatus::Completed {
        return Ok(0);
    }
    if job.is_cancelled() {
        warn!(job_id = %job.id, "import cancelled");
    } else if job.can_retry() && structure_saved {
        println!("The saved structure can be resubmitted with: wheel-import submit");
    }
    Ok(1)
}
