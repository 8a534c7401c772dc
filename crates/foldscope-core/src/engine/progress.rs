use crate::core::models::ids::StructureId;

#[derive(Debug, Clone, PartialEq)]
pub enum Progress {
    LoadStart { total_files: u64 },
    FileLoaded { id: StructureId, atoms: usize },
    FileFailed { name: String, reason: String },
    FileDiscarded { id: StructureId },
    LoadFinish,

    AnalysisStart { total_structures: u64 },
    StructureAnalyzed { id: StructureId, residues: usize },
    AnalysisFinish,

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(Progress) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: Progress) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
