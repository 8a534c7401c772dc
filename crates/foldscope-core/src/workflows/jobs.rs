use crate::core::io::format::StructureFormat;
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::ids::StructureId;
use crate::engine::metadata::StructureMetadata;
use crate::engine::registry::StructureRegistry;
use crate::engine::structure::Structure;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A structure produced by the remote prediction service.
#[derive(Debug, Clone)]
pub struct JobStructure {
    pub job_id: String,
    pub name: String,
    pub format: StructureFormat,
    pub raw: String,
    pub created_at: Option<DateTime<Utc>>,
    pub owner: Option<String>,
}

/// Status fields reported by the job service for an existing job structure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobResult {
    pub confidence: Option<f64>,
    pub created_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
    pub owner: Option<String>,
}

impl From<JobResult> for StructureMetadata {
    fn from(result: JobResult) -> Self {
        StructureMetadata {
            confidence: result.confidence,
            created_at: result.created_at,
            completed_at: result.completed_at,
            error: result.error,
            owner: result.owner,
            ..Default::default()
        }
    }
}

/// Adds a job-sourced structure whose id is the job id.
///
/// PDB content is parsed right away; other formats are kept as raw text.
///
/// # Return
///
/// `false` if a structure with that id is already registered.
#[instrument(skip_all, fields(job_id = %job.job_id))]
pub fn register_job(registry: &mut StructureRegistry, job: JobStructure) -> bool {
    let JobStructure {
        job_id,
        name,
        format,
        raw,
        created_at,
        owner,
    } = job;

    let molecule = format
        .is_parsed_locally()
        .then(|| Arc::new(PdbFile::read_str(&name, &raw)));
    let metadata = StructureMetadata::from(JobResult {
        created_at,
        owner,
        ..Default::default()
    });
    let structure =
        Structure::from_job(&job_id, &name, format, Arc::from(raw), molecule).with_metadata(metadata);

    let added = registry.add_structures([structure]) == 1;
    if added {
        info!(name = %name, format = %format, "Job structure registered");
    }
    added
}

/// Merges the reported job status into the structure registered for `job_id`.
///
/// # Return
///
/// `false` if the structure was removed before the status arrived.
#[instrument(skip_all, fields(job_id = job_id))]
pub fn apply_job_result(registry: &mut StructureRegistry, job_id: &str, result: JobResult) -> bool {
    let applied = registry.update_metadata(&StructureId::for_job(job_id), result.into());
    if !applied {
        debug!("Job structure is no longer registered; status dropped");
    }
    applied
}
