use crate::core::models::molecule::Molecule;
use crate::core::utils::residues::REPRESENTATIVE_ATOM_NAME;
use nalgebra::{DMatrix, Point3};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;

/// Symmetric matrix of Euclidean distances between residue representative positions.
///
/// Rows and columns follow [`residue_ids`](Distogram::residue_ids), which is
/// sorted ascending. Memory grows with the square of the residue count; very
/// large structures should be analysed with that in mind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distogram {
    residue_ids: Vec<i64>,
    distances: DMatrix<f64>,
}

impl Distogram {
    /// Number of residues, i.e. the matrix dimension.
    pub fn size(&self) -> usize {
        self.residue_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residue_ids.is_empty()
    }

    pub fn residue_ids(&self) -> &[i64] {
        &self.residue_ids
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.distances
    }

    pub fn distance(&self, i: usize, j: usize) -> Option<f64> {
        self.distances.get((i, j)).copied()
    }

    /// Copies the matrix into nested row vectors for renderers that expect them.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.distances
            .row_iter()
            .map(|row| row.iter().copied().collect())
            .collect()
    }

    /// Writes the matrix as CSV with a header row and a leading column of residue ids.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `writer` fails.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let header = std::iter::once("residue".to_string())
            .chain(self.residue_ids.iter().map(i64::to_string));
        csv_writer.write_record(header)?;

        for (row_idx, residue_id) in self.residue_ids.iter().enumerate() {
            let record = std::iter::once(residue_id.to_string()).chain(
                self.distances
                    .row(row_idx)
                    .iter()
                    .map(|d| format!("{:.3}", d))
                    .collect::<Vec<_>>(),
            );
            csv_writer.write_record(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Picks one position per distinct residue id, in ascending residue-id order.
///
/// The `CA` atom represents its residue when present; otherwise the first atom
/// of that residue id in file order does. Residue ids are not qualified by
/// chain, so equal numbers in different chains share one entry.
fn representative_positions(molecule: &Molecule) -> BTreeMap<i64, Point3<f64>> {
    let mut picked: BTreeMap<i64, (Point3<f64>, bool)> = BTreeMap::new();
    for atom in molecule.atoms() {
        let is_representative = atom.name == REPRESENTATIVE_ATOM_NAME;
        picked
            .entry(atom.residue_id)
            .and_modify(|(position, has_representative)| {
                if is_representative && !*has_representative {
                    *position = atom.position;
                    *has_representative = true;
                }
            })
            .or_insert((atom.position, is_representative));
    }
    picked
        .into_iter()
        .map(|(residue_id, (position, _))| (residue_id, position))
        .collect()
}

/// Computes the residue distance matrix of a molecule.
///
/// Only the upper triangle is evaluated; it is mirrored into the lower one and
/// the diagonal stays zero. A molecule without atoms yields a 0×0 matrix.
pub fn distogram(molecule: &Molecule) -> Distogram {
    let representatives = representative_positions(molecule);
    let n = representatives.len();
    let (residue_ids, positions): (Vec<i64>, Vec<Point3<f64>>) =
        representatives.into_iter().unzip();

    let mut distances = DMatrix::<f64>::zeros(n, n);
    for i in 0..n {
        for j in (i + 1)..n {
            let d = nalgebra::distance(&positions[i], &positions[j]);
            distances[(i, j)] = d;
            distances[(j, i)] = d;
        }
    }

    Distogram {
        residue_ids,
        distances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    fn ca(residue_id: i64, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(0, "C", "ALA", "A", residue_id, Point3::new(x, y, z)).with_name("CA")
    }

    #[test]
    fn two_residues_three_four_five_triangle() {
        let molecule = Molecule::new("m.pdb", "m", vec![ca(1, 0.0, 0.0, 0.0), ca(2, 3.0, 4.0, 0.0)]);
        let distogram = distogram(&molecule);

        assert_eq!(distogram.to_rows(), vec![vec![0.0, 5.0], vec![5.0, 0.0]]);
        assert_eq!(distogram.residue_ids(), &[1, 2]);
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let molecule = Molecule::new(
            "m.pdb",
            "m",
            vec![
                ca(3, 1.0, 2.0, 3.0),
                ca(1, -4.0, 0.5, 2.0),
                ca(2, 0.0, 0.0, 9.0),
                ca(4, 7.5, -1.0, 0.0),
            ],
        );
        let distogram = distogram(&molecule);
        assert_eq!(distogram.size(), 4);

        for i in 0..distogram.size() {
            assert_eq!(distogram.distance(i, i), Some(0.0));
            for j in 0..distogram.size() {
                let dij = distogram.distance(i, j).unwrap();
                let dji = distogram.distance(j, i).unwrap();
                assert!((dij - dji).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn rows_follow_ascending_residue_ids() {
        let molecule = Molecule::new(
            "m.pdb",
            "m",
            vec![ca(10, 0.0, 0.0, 0.0), ca(2, 0.0, 0.0, 2.0), ca(5, 0.0, 0.0, 7.0)],
        );
        let distogram = distogram(&molecule);

        assert_eq!(distogram.residue_ids(), &[2, 5, 10]);
        assert_eq!(distogram.distance(0, 1), Some(5.0));
        assert_eq!(distogram.distance(0, 2), Some(2.0));
    }

    #[test]
    fn dimension_equals_distinct_residue_count() {
        let molecule = Molecule::new(
            "m.pdb",
            "m",
            vec![
                Atom::new(1, "N", "ALA", "A", 1, Point3::origin()),
                ca(1, 1.0, 0.0, 0.0),
                Atom::new(3, "N", "GLY", "A", 2, Point3::new(2.0, 0.0, 0.0)),
                Atom::new(4, "N", "GLY", "B", 2, Point3::new(9.0, 0.0, 0.0)),
            ],
        );
        assert_eq!(distogram(&molecule).size(), 2);
    }

    #[test]
    fn alpha_carbon_represents_residue_over_earlier_atoms() {
        let molecule = Molecule::new(
            "m.pdb",
            "m",
            vec![
                Atom::new(1, "N", "ALA", "A", 1, Point3::new(100.0, 0.0, 0.0)),
                ca(1, 0.0, 0.0, 0.0),
                Atom::new(3, "N", "GLY", "A", 2, Point3::new(0.0, 6.0, 0.0)),
            ],
        );
        assert_eq!(distogram(&molecule).distance(0, 1), Some(6.0));
    }

    #[test]
    fn empty_molecule_yields_empty_matrix() {
        let distogram = distogram(&Molecule::new("e.pdb", "e", Vec::new()));
        assert!(distogram.is_empty());
        assert_eq!(distogram.matrix().shape(), (0, 0));
        assert!(distogram.to_rows().is_empty());
    }

    #[test]
    fn csv_export_has_header_and_labelled_rows() {
        let molecule = Molecule::new("m.pdb", "m", vec![ca(1, 0.0, 0.0, 0.0), ca(2, 3.0, 4.0, 0.0)]);
        let mut buffer = Vec::new();
        distogram(&molecule).write_csv(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "residue,1,2\n1,0.000,5.000\n2,5.000,0.000\n");
    }
}
