use crate::core::models::molecule::Molecule;
use crate::core::utils::residues::{is_ion, is_water};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Per-chain summary, ordered by chain id inside [`MoleculeStatistics`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainInfo {
    pub chain_id: String,
    /// Number of distinct residue sequence numbers in the chain.
    pub residue_count: usize,
    pub atom_count: usize,
}

/// Summary counts derived from a molecule; never stored on the molecule itself.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MoleculeStatistics {
    pub total_atoms: usize,
    /// Element symbols in lexicographic order.
    pub unique_elements: Vec<String>,
    /// Atom count per residue code.
    pub residue_counts: BTreeMap<String, usize>,
    /// Chains in ascending chain-id order.
    pub chain_info: Vec<ChainInfo>,
    /// Atoms belonging to water residues (`HOH`, `WAT`).
    pub water_count: usize,
    /// Atoms belonging to residues classified as ions by [`is_ion`].
    pub ion_count: usize,
}

#[derive(Default)]
struct ChainAccumulator {
    residue_ids: BTreeSet<i64>,
    atom_count: usize,
}

/// Computes [`MoleculeStatistics`] in a single pass over the atoms.
///
/// A molecule without atoms yields all-zero counts and empty collections.
pub fn statistics(molecule: &Molecule) -> MoleculeStatistics {
    let mut elements: BTreeSet<&str> = BTreeSet::new();
    let mut residue_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut chains: BTreeMap<&str, ChainAccumulator> = BTreeMap::new();
    let mut water_count = 0;
    let mut ion_count = 0;

    for atom in molecule.atoms() {
        elements.insert(atom.element.as_str());
        *residue_counts.entry(atom.residue.clone()).or_default() += 1;

        let chain = chains.entry(atom.chain.as_str()).or_default();
        chain.residue_ids.insert(atom.residue_id);
        chain.atom_count += 1;

        if is_water(&atom.residue) {
            water_count += 1;
        } else if is_ion(&atom.residue) {
            ion_count += 1;
        }
    }

    MoleculeStatistics {
        total_atoms: molecule.len(),
        unique_elements: elements.into_iter().map(str::to_string).collect(),
        residue_counts,
        chain_info: chains
            .into_iter()
            .map(|(chain_id, acc)| ChainInfo {
                chain_id: chain_id.to_string(),
                residue_count: acc.residue_ids.len(),
                atom_count: acc.atom_count,
            })
            .collect(),
        water_count,
        ion_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn atom(element: &str, residue: &str, chain: &str, residue_id: i64) -> Atom {
        Atom::new(0, element, residue, chain, residue_id, Point3::origin())
    }

    fn sample_molecule() -> Molecule {
        Molecule::new(
            "sample.pdb",
            "sample",
            vec![
                atom("N", "ALA", "B", 1),
                atom("C", "ALA", "B", 1),
                atom("C", "GLY", "B", 2),
                atom("N", "SER", "A", 7),
                atom("O", "HOH", "A", 100),
                atom("O", "WAT", "A", 101),
                atom("Zn", "ZN", "A", 200),
            ],
        )
    }

    #[test]
    fn counts_atoms_elements_and_residues() {
        let stats = statistics(&sample_molecule());

        assert_eq!(stats.total_atoms, 7);
        assert_eq!(stats.unique_elements, vec!["C", "N", "O", "Zn"]);
        assert_eq!(stats.residue_counts.get("ALA"), Some(&2));
        assert_eq!(stats.residue_counts.get("GLY"), Some(&1));
        assert_eq!(stats.residue_counts.get("HOH"), Some(&1));
        assert_eq!(stats.residue_counts.len(), 6);
    }

    #[test]
    fn chain_info_is_sorted_by_chain_id() {
        let stats = statistics(&sample_molecule());

        assert_eq!(
            stats.chain_info,
            vec![
                ChainInfo {
                    chain_id: "A".into(),
                    residue_count: 4,
                    atom_count: 4,
                },
                ChainInfo {
                    chain_id: "B".into(),
                    residue_count: 2,
                    atom_count: 3,
                },
            ]
        );
    }

    #[test]
    fn chain_atom_counts_sum_to_total() {
        let stats = statistics(&sample_molecule());
        let sum: usize = stats.chain_info.iter().map(|c| c.atom_count).sum();
        assert_eq!(sum, stats.total_atoms);
    }

    #[test]
    fn counts_water_and_ion_atoms() {
        let stats = statistics(&sample_molecule());
        assert_eq!(stats.water_count, 2);
        assert_eq!(stats.ion_count, 1);
    }

    #[test]
    fn ion_heuristic_counts_short_nucleotide_codes() {
        let molecule = Molecule::new("dna.pdb", "dna", vec![atom("P", "DA", "A", 1)]);
        assert_eq!(statistics(&molecule).ion_count, 1);
    }

    #[test]
    fn empty_molecule_yields_empty_statistics() {
        let stats = statistics(&Molecule::new("empty.pdb", "empty", Vec::new()));
        assert_eq!(stats, MoleculeStatistics::default());
    }
}
