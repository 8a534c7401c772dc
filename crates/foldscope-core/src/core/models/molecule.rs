use super::atom::Atom;
use serde::Serialize;

/// An immutable molecule as read from a single structure file.
///
/// Atoms are kept in file order. Derived data (statistics, distograms,
/// sequences) is never stored here; see [`crate::core::analytics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Molecule {
    id: String,
    name: String,
    atoms: Vec<Atom>,
}

impl Molecule {
    /// Creates a molecule from its source id, display name and atoms.
    pub fn new(id: impl Into<String>, name: impl Into<String>, atoms: Vec<Atom>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            atoms,
        }
    }

    /// The source name the molecule was read from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The display name (source name without its recognized extension).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn accessors_return_constructor_values() {
        let atoms = vec![
            Atom::new(1, "N", "ALA", "A", 1, Point3::origin()),
            Atom::new(2, "C", "ALA", "A", 1, Point3::new(1.0, 0.0, 0.0)),
        ];
        let molecule = Molecule::new("1abc.pdb", "1abc", atoms.clone());

        assert_eq!(molecule.id(), "1abc.pdb");
        assert_eq!(molecule.name(), "1abc");
        assert_eq!(molecule.atoms(), atoms.as_slice());
        assert_eq!(molecule.len(), 2);
        assert!(!molecule.is_empty());
    }

    #[test]
    fn empty_molecule_reports_no_atoms() {
        let molecule = Molecule::new("empty.pdb", "empty", Vec::new());
        assert!(molecule.is_empty());
        assert_eq!(molecule.len(), 0);
    }
}
