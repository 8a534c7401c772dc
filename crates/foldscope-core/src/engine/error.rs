use crate::core::io::error::ReadError;
use crate::core::models::ids::StructureId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read structure file '{name}': {source}")]
    Read {
        name: String,
        #[source]
        source: ReadError,
    },

    #[error("Structure not found in registry: {0}")]
    UnknownStructure(StructureId),

    #[error("Structure '{0}' has no locally parsed molecule")]
    NotParsed(StructureId),
}
