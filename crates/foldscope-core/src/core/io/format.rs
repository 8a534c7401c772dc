use serde::Serialize;
use std::fmt;

/// Structural file formats recognized by extension.
///
/// Only [`StructureFormat::Pdb`] is parsed locally; every other format is kept
/// as opaque text and handed to the external renderer unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StructureFormat {
    Pdb,
    Mmcif,
    Gro,
    Mol2,
    Sdf,
    Xyz,
}

const ALL_FORMATS: [StructureFormat; 6] = [
    StructureFormat::Pdb,
    StructureFormat::Mmcif,
    StructureFormat::Gro,
    StructureFormat::Mol2,
    StructureFormat::Sdf,
    StructureFormat::Xyz,
];

impl StructureFormat {
    /// File extensions (lowercase, without the dot) mapped to this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            StructureFormat::Pdb => &["pdb", "ent"],
            StructureFormat::Mmcif => &["cif", "mmcif"],
            StructureFormat::Gro => &["gro"],
            StructureFormat::Mol2 => &["mol2"],
            StructureFormat::Sdf => &["sdf", "mol"],
            StructureFormat::Xyz => &["xyz"],
        }
    }

    /// Looks up the format whose extension the file name carries, if any.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        let extension = extension.to_ascii_lowercase();
        ALL_FORMATS
            .into_iter()
            .find(|format| format.extensions().contains(&extension.as_str()))
    }

    /// Detects the format of an uploaded file; unrecognized names are read as PDB text.
    pub fn detect(file_name: &str) -> Self {
        Self::from_file_name(file_name).unwrap_or(StructureFormat::Pdb)
    }

    pub fn is_parsed_locally(self) -> bool {
        self == StructureFormat::Pdb
    }
}

impl fmt::Display for StructureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                StructureFormat::Pdb => "PDB",
                StructureFormat::Mmcif => "mmCIF",
                StructureFormat::Gro => "GRO",
                StructureFormat::Mol2 => "MOL2",
                StructureFormat::Sdf => "SDF",
                StructureFormat::Xyz => "XYZ",
            }
        )
    }
}

/// Returns the display name of a structure file: its name without a recognized extension.
///
/// Names without a recognized extension are returned unchanged.
pub fn display_name(file_name: &str) -> &str {
    match StructureFormat::from_file_name(file_name) {
        Some(_) => file_name
            .rsplit_once('.')
            .map_or(file_name, |(stem, _)| stem),
        None => file_name,
    }
}
