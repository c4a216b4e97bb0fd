use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use treadle::WorkItem;

/// One refresh of the search tables from a registry extract.
///
/// This is the treadle `WorkItem` that flows through the prepare → load
/// stages. Every run gets a fresh id, so the workflow state store never
/// treats a rerun as already done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshJob {
    id: String,
    /// The extract being loaded.
    pub csv_path: PathBuf,
}

impl RefreshJob {
    /// A job with a newly generated id.
    #[must_use]
    pub fn new(csv_path: PathBuf) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), csv_path)
    }

    #[must_use]
    pub fn with_id(id: impl Into<String>, csv_path: PathBuf) -> Self {
        Self {
            id: id.into(),
            csv_path,
        }
    }
}

impl WorkItem for RefreshJob {
    fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for RefreshJob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "refresh {} from {}", self.id, self.csv_path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_job_ids_are_unique() {
        let a = RefreshJob::new(PathBuf::from("/data/skrytki.csv"));
        let b = RefreshJob::new(PathBuf::from("/data/skrytki.csv"));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_refresh_job_display() {
        let job = RefreshJob::with_id("run-1", PathBuf::from("/data/skrytki.csv"));
        assert_eq!(job.id(), "run-1");
        let display = format!("{job}");
        assert!(display.contains("run-1"));
        assert!(display.contains("skrytki.csv"));
    }
}
