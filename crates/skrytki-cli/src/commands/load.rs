use anyhow::{Context, Result};
use std::path::PathBuf;

use skrytki_etl::{build_pipeline, run_workflow, Config, RefreshJob};

pub async fn run_load(config: &Config, csv: PathBuf) -> Result<()> {
    tracing::info!("Loading {}", csv.display());

    let staging_dir = config.staging_dir();
    let workflow = build_pipeline(csv.clone(), staging_dir, config.database_path.clone())
        .context("Failed to build pipeline")?;

    let job = RefreshJob::new(csv);

    // Subscribe to events for progress display
    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                treadle::WorkflowEvent::StageStarted { stage, .. } => {
                    println!("  ⏳ [{stage}] Starting...");
                }
                treadle::WorkflowEvent::StageCompleted { stage, .. } => {
                    println!("  ✓ [{stage}] Complete");
                }
                treadle::WorkflowEvent::StageFailed { stage, error, .. } => {
                    eprintln!("  ✗ [{stage}] FAILED: {error}");
                }
                _ => {}
            }
        }
    });

    let run = run_workflow(
        &workflow,
        &job,
        &config.database_path,
        &config.state_store_path(),
    )
    .await
    .context("Refresh failed; the previous tables are unchanged")?;

    println!("\n✓ Load complete ({})", run.run_id);
    println!("  Source rows: {}", run.source_rows);
    println!("  Entities:    {}", run.entities);
    println!("  Addresses:   {}", run.addresses);
    println!("  Database:    {}", config.database_path.display());

    Ok(())
}
