use super::metadata::StructureMetadata;
use super::structure::{FileBinding, Structure, StructureSource};
use crate::core::models::ids::StructureId;
use crate::core::models::molecule::Molecule;
use std::sync::Arc;
use tracing::debug;

/// The set of loaded structures, their upload bindings and the active selection.
///
/// The registry is an owned value handed to whoever drives the session; views
/// read it through shared references. Every method completes its full change
/// before returning and none can fail: a reference to an id or index that no
/// longer exists is treated as a stale event and ignored.
///
/// The selection invariant holds after every operation: the selection is
/// `None` exactly when there are no structures, and otherwise is a valid
/// index into [`structures`](StructureRegistry::structures).
#[derive(Debug, Clone, Default)]
pub struct StructureRegistry {
    structures: Vec<Structure>,
    files: Vec<FileBinding>,
    selected: Option<usize>,
}

impl StructureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn structures(&self) -> &[Structure] {
        &self.structures
    }

    pub fn files(&self) -> &[FileBinding] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Returns the selected structure, if any.
    pub fn selected(&self) -> Option<&Structure> {
        self.selected.and_then(|idx| self.structures.get(idx))
    }

    pub fn get(&self, id: &StructureId) -> Option<&Structure> {
        self.position_of(id).map(|idx| &self.structures[idx])
    }

    pub fn contains(&self, id: &StructureId) -> bool {
        self.position_of(id).is_some()
    }

    /// Finds the file binding issued for `id`.
    pub fn binding(&self, id: &StructureId) -> Option<&FileBinding> {
        self.files.iter().find(|binding| &binding.structure_id == id)
    }

    fn position_of(&self, id: &StructureId) -> Option<usize> {
        self.structures.iter().position(|s| &s.id == id)
    }

    /// Restores the selection invariant without moving a still-valid selection.
    fn normalize_selection(&mut self) {
        self.selected = match self.selected {
            _ if self.structures.is_empty() => None,
            Some(idx) if idx < self.structures.len() => Some(idx),
            _ => Some(0),
        };
    }

    /// Appends structures whose id is not yet present.
    ///
    /// On an id collision the entry already in the registry wins and the new one
    /// is dropped. An existing valid selection is left where it is; an empty
    /// selection moves to the first structure.
    ///
    /// # Return
    ///
    /// The number of structures actually added.
    pub fn add_structures(&mut self, items: impl IntoIterator<Item = Structure>) -> usize {
        let mut added = 0;
        for item in items {
            if self.contains(&item.id) {
                debug!(id = %item.id, "Dropping structure with an id already in the registry");
                continue;
            }
            self.structures.push(item);
            added += 1;
        }
        self.normalize_selection();
        added
    }

    /// Removes the structure with the given id.
    ///
    /// The selection follows the structure it pointed at: it shifts down when an
    /// earlier entry is removed, falls back to the first entry when the selected
    /// one is removed, and clears when the registry becomes empty.
    ///
    /// # Return
    ///
    /// The removed structure, or `None` if the id was not present.
    pub fn remove_structure_by_id(&mut self, id: &StructureId) -> Option<Structure> {
        let Some(removed_idx) = self.position_of(id) else {
            debug!(id = %id, "Ignoring removal of a structure that is not registered");
            return None;
        };
        let removed = self.structures.remove(removed_idx);

        self.selected = match self.selected {
            _ if self.structures.is_empty() => None,
            Some(selected) if selected == removed_idx => Some(0),
            Some(selected) if removed_idx < selected => Some(selected - 1),
            other => other,
        };
        self.normalize_selection();
        Some(removed)
    }

    /// Deletes the uploaded file at `index` together with its structure.
    ///
    /// The structure is located through the id recorded in the binding, and only
    /// a file-sourced structure with that id is removed. If it is gone already
    /// (or was never created), just the binding is dropped.
    pub fn delete_file_at(&mut self, index: usize) -> Option<FileBinding> {
        if index >= self.files.len() {
            debug!(index, files = self.files.len(), "Ignoring deletion of an out-of-range file");
            return None;
        }
        let binding = self.files.remove(index);

        let correlated = self
            .structures
            .iter()
            .any(|s| s.id == binding.structure_id && s.source == StructureSource::File);
        if correlated {
            self.remove_structure_by_id(&binding.structure_id);
        } else {
            debug!(id = %binding.structure_id, "Deleted file had no loaded structure");
            self.normalize_selection();
        }
        Some(binding)
    }

    /// Merges a metadata patch into one structure.
    ///
    /// # Return
    ///
    /// `false` if the structure is no longer registered and the patch was discarded.
    pub fn update_metadata(&mut self, id: &StructureId, patch: StructureMetadata) -> bool {
        match self.position_of(id) {
            Some(idx) => {
                self.structures[idx].metadata.merge(patch);
                true
            }
            None => {
                debug!(id = %id, "Discarding metadata for a structure that is not registered");
                false
            }
        }
    }

    /// Registers the binding for an uploaded file.
    ///
    /// # Return
    ///
    /// `false` if a binding with the same structure id exists; the new one is dropped.
    pub fn add_file(&mut self, binding: FileBinding) -> bool {
        if self.binding(&binding.structure_id).is_some() {
            debug!(id = %binding.structure_id, "Dropping file binding with a duplicate id");
            return false;
        }
        self.files.push(binding);
        true
    }

    /// Removes the binding issued for `id`, leaving structures untouched.
    pub fn remove_file_by_id(&mut self, id: &StructureId) -> Option<FileBinding> {
        let idx = self.files.iter().position(|b| &b.structure_id == id)?;
        Some(self.files.remove(idx))
    }

    /// Attaches a parsed molecule to the binding and structure registered under `id`.
    ///
    /// Each of the two is updated only if it still exists; nothing is created.
    ///
    /// # Return
    ///
    /// `true` if at least one of them received the molecule.
    pub fn attach_molecule(&mut self, id: &StructureId, molecule: Arc<Molecule>) -> bool {
        let mut attached = false;
        if let Some(binding) = self.files.iter_mut().find(|b| &b.structure_id == id) {
            binding.molecule = Some(Arc::clone(&molecule));
            attached = true;
        }
        if let Some(idx) = self.position_of(id) {
            self.structures[idx].molecule = Some(molecule);
            attached = true;
        }
        if !attached {
            debug!(id = %id, "Discarding molecule for an entry that is no longer registered");
        }
        attached
    }

    /// Selects the structure at `index`; out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.structures.len() {
            self.selected = Some(index);
            true
        } else {
            debug!(index, len = self.structures.len(), "Ignoring out-of-range selection");
            false
        }
    }

    /// Selects the structure with the given id; unknown ids are ignored.
    pub fn select_id(&mut self, id: &StructureId) -> bool {
        match self.position_of(id) {
            Some(idx) => self.select(idx),
            None => {
                debug!(id = %id, "Ignoring selection of a structure that is not registered");
                false
            }
        }
    }
}
