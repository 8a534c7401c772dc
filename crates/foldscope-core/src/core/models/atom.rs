use nalgebra::Point3;
use serde::Serialize;

/// Represents one ATOM/HETATM record of a coordinate file.
///
/// Serial numbers are taken verbatim from the file; they are unique only within
/// the atom list of the molecule they belong to and are never re-numbered.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Atom {
    /// The serial number from columns 7-11.
    pub id: i64,
    /// The atom name (e.g., "CA", "N", "OXT").
    pub name: String,
    /// The element symbol, read from the file or inferred from the atom name.
    pub element: String,
    /// The three-letter residue code (e.g., "ALA", "HOH").
    pub residue: String,
    /// The chain identifier; empty when the column is blank.
    pub chain: String,
    /// The residue sequence number within the chain.
    pub residue_id: i64,
    /// The Cartesian coordinates in Angstroms; always finite.
    pub position: Point3<f64>,
    /// The temperature factor, 0.0 when absent.
    pub b_factor: f64,
    /// The occupancy, 1.0 when absent.
    pub occupancy: f64,
    /// Whether the atom came from a HETATM record.
    pub hetero: bool,
}

impl Atom {
    /// Creates an atom with the given labels and position.
    ///
    /// The atom name defaults to the element symbol; temperature factor,
    /// occupancy and the hetero flag take their neutral values.
    pub fn new(
        id: i64,
        element: &str,
        residue: &str,
        chain: &str,
        residue_id: i64,
        position: Point3<f64>,
    ) -> Self {
        Self {
            id,
            name: element.to_string(),
            element: element.to_string(),
            residue: residue.to_string(),
            chain: chain.to_string(),
            residue_id,
            position,
            b_factor: 0.0,
            occupancy: 1.0,
            hetero: false,
        }
    }

    /// Sets the atom name, consuming and returning the atom.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Marks the atom as originating from a HETATM record.
    pub fn as_hetero(mut self) -> Self {
        self.hetero = true;
        self
    }
}
