use crate::cli::StatsArgs;
use crate::error::{CliError, Result};
use foldscope::core::analytics::sequence::chain_sequences;
use foldscope::core::analytics::statistics::{MoleculeStatistics, statistics};
use foldscope::core::io::format::StructureFormat;
use foldscope::workflows::load::read_structure_file;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Serialize)]
struct FileSummary {
    file: String,
    name: String,
    format: StructureFormat,
    statistics: MoleculeStatistics,
    sequences: BTreeMap<String, String>,
}

pub async fn run(args: StatsArgs) -> Result<()> {
    let mut summaries = Vec::with_capacity(args.files.len());
    for path in &args.files {
        info!("Reading structure from {:?}", path);
        let summary = tokio::task::block_in_place(|| summarize(path))?;
        match summary {
            Some(summary) => summaries.push(summary),
            None => warn!(
                "Skipping {:?}: format is not parsed locally, no statistics available.",
                path
            ),
        }
    }

    let output = if args.json {
        serde_json::to_string_pretty(&summaries).map_err(|e| CliError::Other(e.into()))?
    } else {
        render_text(&summaries)
    };
    println!("{}", output);
    Ok(())
}

fn summarize(path: &Path) -> Result<Option<FileSummary>> {
    let file = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let bytes = std::fs::read(path)?;
    let parsed = read_structure_file(&file, bytes).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })?;

    Ok(parsed.molecule.map(|molecule| FileSummary {
        name: molecule.name().to_string(),
        format: parsed.format,
        statistics: statistics(&molecule),
        sequences: chain_sequences(&molecule),
        file,
    }))
}

fn render_text(summaries: &[FileSummary]) -> String {
    let mut out = String::new();
    for (i, summary) in summaries.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let stats = &summary.statistics;
        let _ = writeln!(out, "{} ({})", summary.name, summary.file);
        let _ = writeln!(out, "  Atoms:    {}", stats.total_atoms);
        let _ = writeln!(out, "  Elements: {}", stats.unique_elements.join(", "));
        let _ = writeln!(
            out,
            "  Waters:   {} atoms, ions: {} atoms",
            stats.water_count, stats.ion_count
        );
        let _ = writeln!(out, "  Chains:");
        for chain in &stats.chain_info {
            let _ = writeln!(
                out,
                "    {:<3} {:>6} residues {:>8} atoms",
                chain.chain_id, chain.residue_count, chain.atom_count
            );
        }
        let _ = writeln!(out, "  Residues:");
        for (residue, count) in &stats.residue_counts {
            let _ = writeln!(out, "    {:<4} {:>8}", residue, count);
        }
        for (chain, sequence) in &summary.sequences {
            let _ = writeln!(out, "  Sequence {}: {}", chain, sequence);
        }
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const PDB: &str = "\
ATOM      1  N   MET A   1       0.000   0.000   0.000  1.00  0.00           N
ATOM      2  CA  MET A   1       1.000   0.000   0.000  1.00  0.00           C
ATOM      3  CA  LYS B   1       4.000   0.000   0.000  1.00  0.00           C
HETATM    4  O   HOH B 201       9.000   0.000   0.000  1.00  0.00           O
";

    #[test]
    fn summarizes_pdb_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("two_chains.pdb");
        fs::write(&path, PDB).unwrap();

        let summary = summarize(&path).unwrap().unwrap();

        assert_eq!(summary.name, "two_chains");
        assert_eq!(summary.statistics.total_atoms, 4);
        assert_eq!(summary.statistics.water_count, 1);
        assert_eq!(summary.sequences["A"], "M");
        assert_eq!(summary.sequences["B"], "K");

        let text = render_text(&[summary]);
        assert!(text.starts_with("two_chains (two_chains.pdb)"));
        assert!(text.contains("Sequence A: M"));
    }

    #[test]
    fn passthrough_formats_have_no_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.cif");
        fs::write(&path, "data_model\n").unwrap();
        assert!(summarize(&path).unwrap().is_none());
    }

    #[test]
    fn missing_files_are_io_errors() {
        let dir = tempfile::tempdir().unwrap();
        let result = summarize(&dir.path().join("absent.pdb"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
