//! ETL pipeline for skrytki.
//!
//! Turns the raw registry extract into the two search tables: text
//! cleaning, deduplication, office classification, canonical mailbox
//! selection, staging files, and the atomic bulk load. The run is a
//! two-stage treadle workflow (`prepare`, `load`).

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod canonical;
pub mod classify;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod stage;
pub mod transform;
pub mod tsv;
pub mod work_item;

pub use config::Config;
pub use error::{EtlError, EtlResult};
pub use pipeline::{build_pipeline, run_refresh, run_workflow};
pub use stage::{LoadStage, PrepareStage};
pub use transform::{prepare, PipelineSummary, PreparedData};
pub use work_item::RefreshJob;
