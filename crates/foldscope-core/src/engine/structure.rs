use super::metadata::StructureMetadata;
use crate::core::io::format::{StructureFormat, display_name};
use crate::core::models::ids::StructureId;
use crate::core::models::molecule::Molecule;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a registry entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureSource {
    File,
    Job,
}

impl fmt::Display for StructureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StructureSource::File => "file",
            StructureSource::Job => "job",
        })
    }
}

/// One loaded structure as seen by every view.
///
/// `molecule` is absent for formats that are only passed through to the
/// renderer. The molecule is shared with the matching [`FileBinding`], so both
/// always point at the same parse result.
#[derive(Debug, Clone)]
pub struct Structure {
    pub id: StructureId,
    pub source: StructureSource,
    pub name: String,
    pub format: StructureFormat,
    pub raw: Arc<str>,
    pub molecule: Option<Arc<Molecule>>,
    pub metadata: StructureMetadata,
}

impl Structure {
    /// Creates a file-sourced structure; the display name drops the file extension.
    pub fn from_file(
        id: StructureId,
        file_name: &str,
        format: StructureFormat,
        raw: Arc<str>,
        molecule: Option<Arc<Molecule>>,
    ) -> Self {
        Self {
            id,
            source: StructureSource::File,
            name: display_name(file_name).to_string(),
            format,
            raw,
            molecule,
            metadata: StructureMetadata::default(),
        }
    }

    /// Creates a job-sourced structure whose id is the job id.
    pub fn from_job(
        job_id: &str,
        name: &str,
        format: StructureFormat,
        raw: Arc<str>,
        molecule: Option<Arc<Molecule>>,
    ) -> Self {
        Self {
            id: StructureId::for_job(job_id),
            source: StructureSource::Job,
            name: name.to_string(),
            format,
            raw,
            molecule,
            metadata: StructureMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: StructureMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn is_parsed(&self) -> bool {
        self.molecule.is_some()
    }

    pub fn atom_count(&self) -> usize {
        self.molecule.as_ref().map_or(0, |m| m.len())
    }
}

/// An uploaded file as handed over by the front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub size: u64,
    pub path: Option<PathBuf>,
}

impl FileHandle {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
            path: None,
        }
    }

    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }
}

/// Pairs an uploaded file with its (possibly still pending) parse result.
///
/// `structure_id` is fixed when the upload is submitted and is the only link to
/// the corresponding [`Structure`]; list positions are never used for that.
#[derive(Debug, Clone)]
pub struct FileBinding {
    pub structure_id: StructureId,
    pub file: FileHandle,
    pub molecule: Option<Arc<Molecule>>,
}

impl FileBinding {
    pub fn pending(structure_id: StructureId, file: FileHandle) -> Self {
        Self {
            structure_id,
            file,
            molecule: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.molecule.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_structures_use_display_name() {
        let structure = Structure::from_file(
            StructureId::new("1abc.pdb-1"),
            "1abc.pdb",
            StructureFormat::Pdb,
            Arc::from(""),
            None,
        );
        assert_eq!(structure.name, "1abc");
        assert_eq!(structure.source, StructureSource::File);
        assert!(!structure.is_parsed());
        assert_eq!(structure.atom_count(), 0);
    }

    #[test]
    fn job_structures_take_job_id() {
        let structure = Structure::from_job(
            "job-7",
            "Prediction 7",
            StructureFormat::Mmcif,
            Arc::from("data_job7"),
            None,
        );
        assert_eq!(structure.id.as_str(), "job-7");
        assert_eq!(structure.source, StructureSource::Job);
        assert_eq!(structure.name, "Prediction 7");
    }

    #[test]
    fn pending_binding_is_not_ready() {
        let binding = FileBinding::pending(
            StructureId::new("a-1"),
            FileHandle::new("a.pdb", 10).with_path(PathBuf::from("/tmp/a.pdb")),
        );
        assert!(!binding.is_ready());
        assert_eq!(binding.file.path.as_deref(), Some(std::path::Path::new("/tmp/a.pdb")));
    }
}
