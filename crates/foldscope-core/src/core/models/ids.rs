use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Stable identity of a loaded structure.
///
/// File-sourced structures get an id derived from the file name and the time
/// the upload was submitted; job-sourced structures reuse the job id. The id is
/// assigned once and is the only key used to correlate file bindings,
/// structures and asynchronous completions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StructureId(String);

impl StructureId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives the id of a file-sourced structure from its file name and creation time.
    pub fn for_file(file_name: &str, created_at: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", file_name, created_at.timestamp_millis()))
    }

    /// Uses a remote job id as the structure id.
    pub fn for_job(job_id: &str) -> Self {
        Self(job_id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StructureId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
