use crate::core::analytics::distogram::{Distogram, distogram};
use crate::core::models::ids::StructureId;
use crate::core::models::molecule::Molecule;
use crate::engine::error::EngineError;
use crate::engine::metadata::StructureMetadata;
use crate::engine::registry::StructureRegistry;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// A snapshot of one structure's molecule, detached from the registry.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    id: StructureId,
    molecule: Arc<Molecule>,
}

impl AnalysisRequest {
    pub fn id(&self) -> &StructureId {
        &self.id
    }

    /// Computes the distogram of the snapshot. Safe to run on any thread.
    pub fn run(&self) -> Distogram {
        distogram(&self.molecule)
    }
}

/// Takes the snapshot needed to compute the distogram of structure `id`.
///
/// # Errors
///
/// Returns [`EngineError::UnknownStructure`] if `id` is not registered, and
/// [`EngineError::NotParsed`] if the structure has no local molecule.
pub fn request_distogram(
    registry: &StructureRegistry,
    id: &StructureId,
) -> Result<AnalysisRequest, EngineError> {
    let structure = registry
        .get(id)
        .ok_or_else(|| EngineError::UnknownStructure(id.clone()))?;
    let molecule = structure
        .molecule
        .clone()
        .ok_or_else(|| EngineError::NotParsed(id.clone()))?;
    Ok(AnalysisRequest {
        id: id.clone(),
        molecule,
    })
}

/// Stores a computed distogram on the structure it was requested for.
///
/// # Return
///
/// `false` if the structure was removed while the distogram was computed.
#[instrument(skip_all, fields(id = %id))]
pub fn attach_distogram(
    registry: &mut StructureRegistry,
    id: &StructureId,
    distogram: Distogram,
) -> bool {
    let residues = distogram.size();
    let attached = registry.update_metadata(id, StructureMetadata::new().with_distogram(distogram));
    if attached {
        info!(residues, "Distogram attached");
    } else {
        debug!("Structure is no longer registered; distogram dropped");
    }
    attached
}
