use super::format::display_name;
use super::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use nalgebra::Point3;
use tracing::debug;

const ATOM_RECORD: &str = "ATOM  ";
const HETATM_RECORD: &str = "HETATM";
const UNKNOWN_ELEMENT: &str = "X";

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    let end = end.min(line.len());
    if start >= end {
        return "";
    }
    line.get(start..end).unwrap_or("").trim()
}

/// Splits text on LF, CRLF and CR alike.
///
/// Splitting happens before any column is read, so files mixing line-ending
/// conventions keep their field alignment.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split("\r\n").flat_map(|chunk| chunk.split(['\r', '\n']))
}

fn parse_coordinate(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|value| value.is_finite())
}

fn normalize_element(symbol: &str) -> String {
    let mut chars = symbol.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Infers the element when columns 77-78 are blank.
///
/// PDB right-justifies the element symbol inside the first two columns of the
/// atom name, so those are tried first; the first letter of the full name is
/// the last resort.
fn infer_element(line: &str, atom_name: &str) -> String {
    let from_name_columns: String = slice_and_trim(line, 12, 14)
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect();
    if !from_name_columns.is_empty() {
        return normalize_element(&from_name_columns);
    }
    atom_name
        .chars()
        .find(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase().to_string())
        .unwrap_or_else(|| UNKNOWN_ELEMENT.to_string())
}

/// Reads one ATOM/HETATM line; `None` if any coordinate is not a finite number.
fn parse_atom_record(line: &str, hetero: bool) -> Option<Atom> {
    let x = parse_coordinate(slice_and_trim(line, 30, 38))?;
    let y = parse_coordinate(slice_and_trim(line, 38, 46))?;
    let z = parse_coordinate(slice_and_trim(line, 46, 54))?;

    let name = slice_and_trim(line, 12, 16);
    let element = match slice_and_trim(line, 76, 78) {
        "" => infer_element(line, name),
        symbol => normalize_element(symbol),
    };

    Some(Atom {
        id: slice_and_trim(line, 6, 11).parse().unwrap_or(0),
        name: name.to_string(),
        element,
        residue: slice_and_trim(line, 17, 20).to_string(),
        chain: slice_and_trim(line, 21, 22).to_string(),
        residue_id: slice_and_trim(line, 22, 26).parse().unwrap_or(0),
        position: Point3::new(x, y, z),
        occupancy: slice_and_trim(line, 54, 60).parse().unwrap_or(1.0),
        b_factor: slice_and_trim(line, 60, 66).parse().unwrap_or(0.0),
        hetero,
    })
}

/// Reader for the fixed-column PDB coordinate format.
///
/// Only ATOM and HETATM records are interpreted. A record with an unreadable
/// coordinate is skipped and parsing continues; nothing about the file content
/// can make reading fail.
pub struct PdbFile;

impl StructureFile for PdbFile {
    fn read_str(source_name: &str, text: &str) -> Molecule {
        let mut atoms = Vec::new();
        let mut dropped = 0usize;

        for (line_num, line) in split_lines(text).enumerate() {
            let hetero = if line.starts_with(ATOM_RECORD) {
                false
            } else if line.starts_with(HETATM_RECORD) {
                true
            } else {
                continue;
            };

            match parse_atom_record(line, hetero) {
                Some(atom) => atoms.push(atom),
                None => {
                    dropped += 1;
                    debug!(
                        source = source_name,
                        line = line_num + 1,
                        "Dropping atom record with unreadable coordinates"
                    );
                }
            }
        }

        if dropped > 0 {
            debug!(
                source = source_name,
                dropped, "Skipped malformed atom records while parsing"
            );
        }

        Molecule::new(source_name, display_name(source_name), atoms)
    }
}
