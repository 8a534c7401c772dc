use crate::core::models::molecule::Molecule;
use crate::core::utils::residues::one_letter_code;
use std::collections::{BTreeMap, HashSet};

/// Builds the one-letter sequence of every chain, keyed by chain id.
///
/// Residues appear in the order their first atom appears in the file. Only
/// ATOM records contribute; ligands, waters and ions from HETATM records are
/// left out. Residue codes without a one-letter equivalent become `X`.
pub fn chain_sequences(molecule: &Molecule) -> BTreeMap<String, String> {
    let mut sequences: BTreeMap<String, String> = BTreeMap::new();
    let mut seen: HashSet<(&str, i64)> = HashSet::new();

    for atom in molecule.atoms().iter().filter(|atom| !atom.hetero) {
        if seen.insert((atom.chain.as_str(), atom.residue_id)) {
            sequences
                .entry(atom.chain.clone())
                .or_default()
                .push(one_letter_code(&atom.residue));
        }
    }
    sequences
}
