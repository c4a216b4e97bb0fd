use std::path::{Path, PathBuf};
use treadle::Workflow;

use skrytki_core::model::LoadRun;
use skrytki_core::schema::Database;

use crate::error::{EtlError, EtlResult};
use crate::work_item::RefreshJob;
use crate::{LoadStage, PrepareStage};

/// Build the prepare + load pipeline.
///
/// # Errors
/// Returns an error if the workflow cannot be built.
pub fn build_pipeline(
    csv_path: PathBuf,
    staging_dir: PathBuf,
    db_path: PathBuf,
) -> treadle::Result<Workflow> {
    let prepare_stage = PrepareStage::new(csv_path, staging_dir.clone());
    let load_stage = LoadStage::new(staging_dir, db_path);

    Workflow::builder()
        .stage("prepare", prepare_stage)
        .stage("load", load_stage)
        .dependency("load", "prepare")
        .build()
}

/// Refresh the search tables from `job`'s extract and return the recorded
/// run.
///
/// Workflow state is kept in `state_path`. A stage failure surfaces as
/// [`EtlError::Stage`]; the tables are left as they were.
///
/// # Errors
/// Returns an error if the workflow cannot run or the load did not happen.
pub async fn run_refresh(
    job: &RefreshJob,
    staging_dir: &Path,
    db_path: &Path,
    state_path: &Path,
) -> EtlResult<LoadRun> {
    let workflow = build_pipeline(
        job.csv_path.clone(),
        staging_dir.to_path_buf(),
        db_path.to_path_buf(),
    )
    .map_err(|e| EtlError::Stage(format!("Failed to build pipeline: {e}")))?;

    run_workflow(&workflow, job, db_path, state_path).await
}

/// Advance an already built pipeline for `job`, then confirm the load was
/// recorded under the job's id.
///
/// Callers that want progress events subscribe to `workflow` first.
///
/// # Errors
/// Returns an error if the workflow cannot run or the load did not happen.
pub async fn run_workflow(
    workflow: &Workflow,
    job: &RefreshJob,
    db_path: &Path,
    state_path: &Path,
) -> EtlResult<LoadRun> {
    let mut store = treadle::SqliteStateStore::open(state_path)
        .await
        .map_err(|e| EtlError::Stage(format!("Failed to open pipeline state store: {e}")))?;

    workflow
        .advance(job, &mut store)
        .await
        .map_err(|e| EtlError::Stage(format!("Pipeline execution failed: {e}")))?;

    let db = Database::open(db_path)?;
    match db.last_load()? {
        Some(run) if run.run_id == treadle::WorkItem::id(job) => Ok(run),
        _ => Err(EtlError::Stage(format!(
            "{job} did not complete; see the log for the failing stage"
        ))),
    }
}
