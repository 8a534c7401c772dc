use crate::error::{CliError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use foldscope::core::analytics::distogram::Distogram;
use foldscope::core::io::error::ReadError;
use foldscope::core::models::ids::StructureId;
use foldscope::engine::progress::{Progress, ProgressReporter};
use foldscope::engine::registry::StructureRegistry;
use foldscope::engine::structure::FileHandle;
use foldscope::engine::viewer::{ViewerController, ViewerPatch};
use foldscope::workflows::analyze::{attach_distogram, request_distogram};
use foldscope::workflows::load::{
    LoadOutcome, ParsedFile, complete_file, read_structure_file, submit_file,
};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// A viewer session driven from the command line.
///
/// The session owns the registry and the viewer controller and is the only
/// place they are mutated. Slow work runs on blocking tasks; each result is
/// applied here, one at a time, in the order the tasks finish.
pub struct Session<'a> {
    registry: StructureRegistry,
    viewer: ViewerController,
    reporter: ProgressReporter<'a>,
    last_submitted: Option<DateTime<Utc>>,
}

impl<'a> Session<'a> {
    pub fn new(reporter: ProgressReporter<'a>) -> Self {
        Self {
            registry: StructureRegistry::new(),
            viewer: ViewerController::new(),
            reporter,
            last_submitted: None,
        }
    }

    pub fn registry(&self) -> &StructureRegistry {
        &self.registry
    }

    pub fn viewer(&self) -> &ViewerController {
        &self.viewer
    }

    pub fn apply_viewer_patch(&mut self, patch: ViewerPatch) {
        self.viewer.apply(patch);
    }

    /// Submits every path as an upload, then reads and parses them concurrently.
    ///
    /// Every path gets its own upload id, even when file names repeat.
    ///
    /// # Return
    ///
    /// One outcome per completed load, in completion order.
    pub async fn load_paths(&mut self, paths: &[PathBuf]) -> Vec<LoadOutcome> {
        self.reporter.report(Progress::LoadStart {
            total_files: paths.len() as u64,
        });

        let mut tasks = JoinSet::new();
        for path in paths {
            let file = file_handle(path).await;
            let name = file.name.clone();
            let id = self.submit(file);
            let path = path.clone();
            tasks.spawn_blocking(move || {
                let result = read_path(&name, &path);
                (id, result)
            });
        }

        let mut outcomes = Vec::with_capacity(paths.len());
        while let Some(joined) = tasks.join_next().await {
            let (id, result) = match joined {
                Ok(completed) => completed,
                Err(e) => {
                    warn!("Load task did not complete: {}", e);
                    continue;
                }
            };
            let outcome = complete_file(&mut self.registry, &id, result);
            self.report_load(&id, &outcome);
            outcomes.push(outcome);
        }

        self.reporter.report(Progress::LoadFinish);
        info!(structures = self.registry.len(), "Load finished");
        outcomes
    }

    /// Submits an upload at a time strictly later than the previous one.
    ///
    /// Ids embed the millisecond timestamp, so two files with the same name
    /// submitted in one burst would otherwise share an id.
    fn submit(&mut self, file: FileHandle) -> StructureId {
        let step = TimeDelta::milliseconds(1);
        let mut at = match self.last_submitted {
            Some(last) => Utc::now().max(last + step),
            None => Utc::now(),
        };
        loop {
            if let Some(id) = submit_file(&mut self.registry, file.clone(), at) {
                self.last_submitted = Some(at);
                return id;
            }
            debug!(file = %file.name, "Upload id already taken, retrying one millisecond later");
            at += step;
        }
    }

    fn report_load(&self, id: &StructureId, outcome: &LoadOutcome) {
        let event = match outcome {
            LoadOutcome::Loaded(_) => Progress::FileLoaded {
                id: id.clone(),
                atoms: self.registry.get(id).map_or(0, |s| s.atom_count()),
            },
            LoadOutcome::Failed(e) => Progress::FileFailed {
                name: id.to_string(),
                reason: e.to_string(),
            },
            LoadOutcome::Discarded(_) => Progress::FileDiscarded { id: id.clone() },
        };
        self.reporter.report(event);
    }

    /// Computes a distogram for every structure with a parsed molecule and attaches it.
    ///
    /// # Return
    ///
    /// The number of distograms attached.
    pub async fn compute_distograms(&mut self) -> usize {
        let mut tasks: JoinSet<(StructureId, Distogram)> = JoinSet::new();
        for structure in self.registry.structures() {
            match request_distogram(&self.registry, &structure.id) {
                Ok(request) => {
                    tasks.spawn_blocking(move || (request.id().clone(), request.run()));
                }
                Err(e) => {
                    debug!("Skipping distogram: {}", e);
                    self.reporter.report(Progress::Message(format!(
                        "Skipping distogram for {}: {}",
                        structure.name, e
                    )));
                }
            }
        }
        self.reporter.report(Progress::AnalysisStart {
            total_structures: tasks.len() as u64,
        });

        let mut attached = 0;
        while let Some(joined) = tasks.join_next().await {
            let Ok((id, distogram)) = joined else {
                warn!("Distogram task did not complete");
                continue;
            };
            let residues = distogram.size();
            if attach_distogram(&mut self.registry, &id, distogram) {
                attached += 1;
            }
            self.reporter.report(Progress::StructureAnalyzed { id, residues });
        }

        self.reporter.report(Progress::AnalysisFinish);
        attached
    }

    /// Selects the structure at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Argument`] if `index` is out of range.
    pub fn select(&mut self, index: usize) -> Result<()> {
        if self.registry.select(index) {
            Ok(())
        } else {
            Err(CliError::Argument(format!(
                "Cannot select structure {}: only {} structure(s) loaded",
                index,
                self.registry.len()
            )))
        }
    }
}

async fn file_handle(path: &Path) -> FileHandle {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let size = tokio::fs::metadata(path).await.map_or(0, |m| m.len());
    FileHandle::new(name, size).with_path(path.to_path_buf())
}

fn read_path(name: &str, path: &Path) -> std::result::Result<ParsedFile, ReadError> {
    let bytes = std::fs::read(path)?;
    read_structure_file(name, bytes)
}
