//! The two treadle stages of a refresh.
//!
//! `prepare` reads the extract, runs the in-memory steps and writes the
//! staging files. `load` replaces both search tables from those files in one
//! transaction and records the run under the work item's id.

use std::path::PathBuf;

use skrytki_core::model::LoadRun;
use skrytki_core::schema::Database;
use treadle::{Stage, StageContext, StageOutcome};

use crate::error::EtlResult;
use crate::source::read_source;
use crate::transform::{prepare, PipelineSummary};
use crate::tsv::StagingFiles;

/// Metadata key under which `prepare` leaves its [`PipelineSummary`].
pub const SUMMARY_KEY: &str = "summary";

/// Load → Normalize → Deduplicate → Classify → PickCanonical → Merge →
/// Serialize.
#[derive(Debug)]
pub struct PrepareStage {
    csv_path: PathBuf,
    staging: StagingFiles,
}

impl PrepareStage {
    #[must_use]
    pub fn new(csv_path: PathBuf, staging_dir: PathBuf) -> Self {
        Self {
            csv_path,
            staging: StagingFiles::new(staging_dir),
        }
    }

    /// Run the stage without a workflow around it.
    pub fn run(&self) -> EtlResult<PipelineSummary> {
        let records = read_source(&self.csv_path)?;
        let prepared = prepare(records);
        self.staging.write(&prepared)
    }
}

#[async_trait::async_trait]
impl Stage for PrepareStage {
    fn name(&self) -> &str {
        "prepare"
    }

    async fn execute(
        &self,
        item: &dyn treadle::WorkItem,
        ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Preparing {} from {}", item.id(), self.csv_path.display());

        let summary = self.run().map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Prepare failed: {e}"))
        })?;

        let summary_json = serde_json::to_value(summary).map_err(|e| {
            treadle::TreadleError::StageExecution(format!("Failed to serialize summary: {e}"))
        })?;
        ctx.metadata.insert(SUMMARY_KEY.to_string(), summary_json);

        log::info!(
            "Prepare complete: {} rows, {} entities ({} offices), {} addresses",
            summary.source_rows,
            summary.entities,
            summary.offices,
            summary.addresses
        );
        Ok(StageOutcome::Complete)
    }
}

/// BulkLoad: replace the search tables from the staging files.
#[derive(Debug)]
pub struct LoadStage {
    staging: StagingFiles,
    db_path: PathBuf,
}

impl LoadStage {
    #[must_use]
    pub fn new(staging_dir: PathBuf, db_path: PathBuf) -> Self {
        Self {
            staging: StagingFiles::new(staging_dir),
            db_path,
        }
    }

    /// Run the stage without a workflow around it, recording the load
    /// under `run_id`.
    pub fn run(&self, run_id: &str) -> EtlResult<LoadRun> {
        let (data, summary) = self.staging.read()?;

        let run = LoadRun::new(
            run_id,
            count(summary.source_rows),
            count(data.entities.len()),
            count(data.addresses.len()),
        );

        let mut db = Database::open(&self.db_path)?;
        db.replace_all(&data.entities, &data.addresses, &run)?;
        Ok(run)
    }
}

fn count(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

#[async_trait::async_trait]
impl Stage for LoadStage {
    fn name(&self) -> &str {
        "load"
    }

    async fn execute(
        &self,
        item: &dyn treadle::WorkItem,
        _ctx: &mut StageContext,
    ) -> treadle::Result<StageOutcome> {
        log::info!("Loading {} into {}", item.id(), self.db_path.display());

        match self.run(item.id()) {
            Ok(run) => {
                log::info!(
                    "Load complete: {} entities, {} addresses",
                    run.entities,
                    run.addresses
                );
                Ok(StageOutcome::Complete)
            }
            Err(e) => Err(treadle::TreadleError::StageExecution(format!(
                "Load failed: {e}"
            ))),
        }
    }
}
