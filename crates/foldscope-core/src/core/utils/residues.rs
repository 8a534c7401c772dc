use phf::{Map, Set, phf_map, phf_set};

static WATER_RESIDUE_NAMES: Set<&'static str> = phf_set! {
    "HOH", "WAT",
};

static ONE_LETTER_CODES: Map<&'static str, char> = phf_map! {
    "ALA" => 'A', "ARG" => 'R', "ASN" => 'N', "ASP" => 'D', "CYS" => 'C',
    "GLN" => 'Q', "GLU" => 'E', "GLY" => 'G', "HIS" => 'H', "ILE" => 'I',
    "LEU" => 'L', "LYS" => 'K', "MET" => 'M', "PHE" => 'F', "PRO" => 'P',
    "SER" => 'S', "THR" => 'T', "TRP" => 'W', "TYR" => 'Y', "VAL" => 'V',
    "SEC" => 'U', "PYL" => 'O', "MSE" => 'M',
    "HSD" => 'H', "HSE" => 'H', "HSP" => 'H', "HID" => 'H', "HIE" => 'H', "HIP" => 'H',
    "CYX" => 'C', "ASH" => 'D', "GLH" => 'E', "LYN" => 'K',
    "DA" => 'A', "DC" => 'C', "DG" => 'G', "DT" => 'T',
    "A" => 'A', "C" => 'C', "G" => 'G', "U" => 'U',
};

/// Atom name whose position represents its residue in distance matrices.
pub const REPRESENTATIVE_ATOM_NAME: &str = "CA";

/// Placeholder used in sequences for residues without a one-letter code.
pub const UNKNOWN_RESIDUE_CODE: char = 'X';

pub fn is_water(residue_name: &str) -> bool {
    WATER_RESIDUE_NAMES.contains(residue_name.trim())
}

/// Classifies a residue code as an ion.
///
/// The rule is a heuristic: codes of at most two characters without a
/// lowercase letter count as ions. It also matches short non-ion codes such as
/// the nucleotides `DA` or `U`, which is accepted behaviour.
pub fn is_ion(residue_name: &str) -> bool {
    residue_name.chars().count() <= 2 && !residue_name.chars().any(char::is_lowercase)
}

pub fn one_letter_code(residue_name: &str) -> char {
    ONE_LETTER_CODES
        .get(residue_name.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(UNKNOWN_RESIDUE_CODE)
}
