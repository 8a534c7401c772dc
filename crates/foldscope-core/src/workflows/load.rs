use crate::core::io::error::ReadError;
use crate::core::io::format::{StructureFormat, display_name};
use crate::core::io::pdb::PdbFile;
use crate::core::io::traits::StructureFile;
use crate::core::models::ids::StructureId;
use crate::core::models::molecule::Molecule;
use crate::engine::error::EngineError;
use crate::engine::registry::StructureRegistry;
use crate::engine::structure::{FileBinding, FileHandle, Structure};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// The result of reading one uploaded file, before it is bound to the registry.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub format: StructureFormat,
    pub raw: Arc<str>,
    /// Present only for formats parsed locally.
    pub molecule: Option<Molecule>,
}

/// What happened to a completed load.
#[derive(Debug)]
pub enum LoadOutcome {
    /// A structure was added under the submitted id.
    Loaded(StructureId),
    /// Reading failed; the pending binding was removed and nothing was created.
    Failed(EngineError),
    /// The upload was deleted before its result arrived; the result was dropped.
    Discarded(StructureId),
}

/// Decodes and, where the format allows, parses an uploaded file.
///
/// This touches no shared state and is meant to run off the thread that owns
/// the registry.
///
/// # Errors
///
/// Returns [`ReadError::Decoding`] if the content is not UTF-8. Malformed atom
/// records are not errors.
pub fn read_structure_file(name: &str, bytes: Vec<u8>) -> Result<ParsedFile, ReadError> {
    let format = StructureFormat::detect(name);
    let text = String::from_utf8(bytes)?;
    let molecule = format
        .is_parsed_locally()
        .then(|| PdbFile::read_str(name, &text));
    Ok(ParsedFile {
        format,
        raw: Arc::from(text),
        molecule,
    })
}

/// Registers an upload and issues the id its result will be bound to.
///
/// The binding starts without a molecule. No structure exists until
/// [`complete_file`] succeeds.
///
/// # Return
///
/// The issued id, or `None` if an upload with the same id is already known.
#[instrument(skip_all, fields(file = %file.name))]
pub fn submit_file(
    registry: &mut StructureRegistry,
    file: FileHandle,
    now: DateTime<Utc>,
) -> Option<StructureId> {
    let id = StructureId::for_file(&file.name, now);
    if registry.contains(&id) {
        debug!(id = %id, "A structure with this id is already loaded");
        return None;
    }
    if !registry.add_file(FileBinding::pending(id.clone(), file)) {
        return None;
    }
    debug!(id = %id, "Registered pending upload");
    Some(id)
}

/// Applies the result of reading the upload submitted under `id`.
///
/// The result is bound to `id` alone. If the upload was deleted in the
/// meantime, the result is discarded and nothing is recreated.
#[instrument(skip_all, fields(id = %id))]
pub fn complete_file(
    registry: &mut StructureRegistry,
    id: &StructureId,
    result: Result<ParsedFile, ReadError>,
) -> LoadOutcome {
    let Some(binding) = registry.binding(id) else {
        debug!("Upload is no longer registered; discarding its result");
        return LoadOutcome::Discarded(id.clone());
    };
    let file_name = binding.file.name.clone();

    let parsed = match result {
        Ok(parsed) => parsed,
        Err(source) => {
            warn!(file = %file_name, error = %source, "Failed to read structure file");
            registry.remove_file_by_id(id);
            return LoadOutcome::Failed(EngineError::Read {
                name: file_name,
                source,
            });
        }
    };

    let molecule = parsed.molecule.map(Arc::new);
    if let Some(molecule) = &molecule {
        registry.attach_molecule(id, Arc::clone(molecule));
    }
    let atoms = molecule.as_ref().map_or(0, |m| m.len());
    let structure = Structure::from_file(id.clone(), &file_name, parsed.format, parsed.raw, molecule);
    registry.add_structures([structure]);

    info!(
        name = display_name(&file_name),
        format = %parsed.format,
        atoms,
        "Structure loaded"
    );
    LoadOutcome::Loaded(id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const PDB: &str = "\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  ALA A   1       1.000   2.000   3.000  1.00  0.00           C
";

    fn at(millis: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(millis).unwrap()
    }

    fn submit(registry: &mut StructureRegistry, name: &str, millis: i64) -> StructureId {
        submit_file(registry, FileHandle::new(name, 0), at(millis)).unwrap()
    }

    #[test]
    fn read_parses_pdb_and_passes_other_formats_through() {
        let parsed = read_structure_file("1abc.pdb", PDB.as_bytes().to_vec()).unwrap();
        assert_eq!(parsed.format, StructureFormat::Pdb);
        assert_eq!(parsed.molecule.as_ref().unwrap().len(), 2);
        assert_eq!(&*parsed.raw, PDB);

        let parsed = read_structure_file("model.cif", b"data_model\n".to_vec()).unwrap();
        assert_eq!(parsed.format, StructureFormat::Mmcif);
        assert!(parsed.molecule.is_none());
        assert_eq!(&*parsed.raw, "data_model\n");
    }

    #[test]
    fn read_rejects_non_utf8_content() {
        let err = read_structure_file("bad.pdb", vec![0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, ReadError::Decoding(_)));
    }

    #[test]
    fn submit_registers_only_a_pending_binding() {
        let mut registry = StructureRegistry::new();
        let id = submit(&mut registry, "1abc.pdb", 1_000);

        assert_eq!(id.as_str(), "1abc.pdb-1000");
        assert!(registry.is_empty());
        assert_eq!(registry.selected_index(), None);
        assert!(!registry.binding(&id).unwrap().is_ready());
    }

    #[test]
    fn submitting_the_same_file_at_the_same_instant_is_rejected() {
        let mut registry = StructureRegistry::new();
        submit(&mut registry, "1abc.pdb", 1_000);
        assert!(submit_file(&mut registry, FileHandle::new("1abc.pdb", 0), at(1_000)).is_none());
        assert_eq!(registry.files().len(), 1);
    }

    #[test]
    fn successful_completion_adds_a_selected_structure() {
        let mut registry = StructureRegistry::new();
        let id = submit(&mut registry, "1abc.pdb", 1_000);

        let outcome = complete_file(
            &mut registry,
            &id,
            read_structure_file("1abc.pdb", PDB.as_bytes().to_vec()),
        );

        assert!(matches!(outcome, LoadOutcome::Loaded(ref loaded) if loaded == &id));
        let structure = registry.selected().unwrap();
        assert_eq!(structure.id, id);
        assert_eq!(structure.name, "1abc");
        assert_eq!(structure.atom_count(), 2);
        assert!(registry.binding(&id).unwrap().is_ready());
        assert!(Arc::ptr_eq(
            structure.molecule.as_ref().unwrap(),
            registry.binding(&id).unwrap().molecule.as_ref().unwrap()
        ));
    }

    #[test]
    fn failed_completion_removes_the_binding_and_creates_nothing() {
        let mut registry = StructureRegistry::new();
        let id = submit(&mut registry, "bad.pdb", 1_000);

        let outcome = complete_file(&mut registry, &id, read_structure_file("bad.pdb", vec![0xc3]));

        match outcome {
            LoadOutcome::Failed(EngineError::Read { name, .. }) => assert_eq!(name, "bad.pdb"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(registry.is_empty());
        assert!(registry.files().is_empty());
    }

    #[test]
    fn late_completion_after_deletion_is_discarded() {
        let mut registry = StructureRegistry::new();
        let id = submit(&mut registry, "1abc.pdb", 1_000);
        registry.delete_file_at(0);

        let outcome = complete_file(
            &mut registry,
            &id,
            read_structure_file("1abc.pdb", PDB.as_bytes().to_vec()),
        );

        assert!(matches!(outcome, LoadOutcome::Discarded(_)));
        assert!(registry.is_empty());
        assert!(registry.files().is_empty());
        assert_eq!(registry.selected_index(), None);
    }

    #[test]
    fn completions_in_reverse_order_bind_to_their_own_ids() {
        let mut registry = StructureRegistry::new();
        let first = submit(&mut registry, "first.pdb", 1_000);
        let second = submit(&mut registry, "second.cif", 1_001);

        complete_file(
            &mut registry,
            &second,
            read_structure_file("second.cif", b"data_second\n".to_vec()),
        );
        complete_file(
            &mut registry,
            &first,
            read_structure_file("first.pdb", PDB.as_bytes().to_vec()),
        );

        assert_eq!(registry.get(&first).unwrap().name, "first");
        assert_eq!(registry.get(&first).unwrap().atom_count(), 2);
        assert_eq!(registry.get(&second).unwrap().format, StructureFormat::Mmcif);
        assert!(!registry.get(&second).unwrap().is_parsed());

        // Deleting the first upload removes its own structure even though the
        // structure list is ordered differently from the file list.
        registry.delete_file_at(0);
        assert!(!registry.contains(&first));
        assert!(registry.contains(&second));
    }
}
