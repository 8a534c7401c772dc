use crate::cli::SessionArgs;
use crate::config::PartialViewerConfig;
use crate::error::{CliError, Result};
use crate::session::Session;
use crate::utils::progress::CliProgressHandler;
use foldscope::core::analytics::sequence::chain_sequences;
use foldscope::core::analytics::statistics::{MoleculeStatistics, statistics};
use foldscope::core::io::format::StructureFormat;
use foldscope::core::models::ids::StructureId;
use foldscope::engine::metadata::StructureMetadata;
use foldscope::engine::progress::ProgressReporter;
use foldscope::engine::structure::StructureSource;
use foldscope::engine::viewer::ViewerConfiguration;
use foldscope::workflows::load::LoadOutcome;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

/// Everything an external renderer needs to draw the session.
#[derive(Debug, Serialize)]
struct SceneManifest<'a> {
    viewer: &'a ViewerConfiguration,
    selected: Option<&'a StructureId>,
    structures: Vec<StructureEntry<'a>>,
    files: Vec<FileEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct StructureEntry<'a> {
    id: &'a StructureId,
    name: &'a str,
    source: StructureSource,
    format: StructureFormat,
    atoms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<MoleculeStatistics>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    sequences: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "StructureMetadata::is_empty")]
    metadata: &'a StructureMetadata,
}

#[derive(Debug, Serialize)]
struct FileEntry<'a> {
    name: &'a str,
    size: u64,
    path: Option<&'a PathBuf>,
    structure_id: &'a StructureId,
    ready: bool,
}

fn build_manifest<'a>(session: &'a Session<'_>) -> SceneManifest<'a> {
    let registry = session.registry();
    let structures = registry
        .structures()
        .iter()
        .map(|structure| {
            let molecule = structure.molecule.as_deref();
            StructureEntry {
                id: &structure.id,
                name: &structure.name,
                source: structure.source,
                format: structure.format,
                atoms: structure.atom_count(),
                statistics: molecule.map(statistics),
                sequences: molecule.map(chain_sequences).unwrap_or_default(),
                metadata: &structure.metadata,
            }
        })
        .collect();
    let files = registry
        .files()
        .iter()
        .map(|binding| FileEntry {
            name: &binding.file.name,
            size: binding.file.size,
            path: binding.file.path.as_ref(),
            structure_id: &binding.structure_id,
            ready: binding.is_ready(),
        })
        .collect();

    SceneManifest {
        viewer: session.viewer().config(),
        selected: registry.selected().map(|s| &s.id),
        structures,
        files,
    }
}

/// Counts submitted files that did not end up as a structure, including any
/// whose load task never reported back.
fn not_loaded(outcomes: &[LoadOutcome], submitted: usize) -> usize {
    let loaded = outcomes
        .iter()
        .filter(|o| matches!(o, LoadOutcome::Loaded(_)))
        .count();
    submitted.saturating_sub(loaded)
}

pub async fn run(args: SessionArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialViewerConfig::from_file(path)?,
        None => PartialViewerConfig::default(),
    };
    info!("Merging viewer configuration from file and CLI arguments...");
    let patch = partial_config.merge_with_cli(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
    let mut session = Session::new(reporter);
    session.apply_viewer_patch(patch);

    let outcomes = session.load_paths(&args.files).await;
    let failed = not_loaded(&outcomes, args.files.len());
    if failed > 0 {
        warn!("{} of {} file(s) could not be loaded.", failed, args.files.len());
    }
    if session.registry().is_empty() {
        return Err(CliError::Argument(
            "None of the given files could be loaded".to_string(),
        ));
    }

    if let Some(index) = args.select {
        session.select(index)?;
    }
    if args.with_distograms {
        let attached = session.compute_distograms().await;
        info!("Attached {} distogram(s).", attached);
    }

    let manifest = build_manifest(&session);
    let json = serde_json::to_string_pretty(&manifest).map_err(|e| CliError::Other(e.into()))?;
    match &args.output {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            println!(
                "✓ Scene manifest with {} structure(s) written to: {}",
                manifest.structures.len(),
                path.display()
            );
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;

    const PDB: &str = "\
ATOM      1  CA  ALA A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM      2  CA  GLY A   2       3.000   4.000   0.000  1.00  0.00           C
";

    fn session_args(argv: &[&str]) -> SessionArgs {
        match Cli::parse_from(argv).command {
            Commands::Session(args) => args,
            _ => panic!("Expected 'session' subcommand"),
        }
    }

    #[tokio::test]
    async fn manifest_carries_viewer_structures_and_files() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = dir.path().join("pair.pdb");
        fs::write(&pdb, PDB).unwrap();
        let cif = dir.path().join("model.cif");
        fs::write(&cif, "data_model\n").unwrap();

        let args = session_args(&[
            "foldscope",
            "session",
            pdb.to_str().unwrap(),
            cif.to_str().unwrap(),
            "--color-scheme",
            "chain",
            "--atom-size",
            "0.01",
        ]);
        let patch = PartialViewerConfig::default().merge_with_cli(&args).unwrap();

        let mut session = Session::new(ProgressReporter::new());
        session.apply_viewer_patch(patch);
        session.load_paths(&args.files).await;
        session.compute_distograms().await;

        let value = serde_json::to_value(build_manifest(&session)).unwrap();

        assert_eq!(value["viewer"]["color_scheme"], "chain");
        assert_eq!(value["viewer"]["atom_size"], 0.05);
        assert_eq!(value["structures"].as_array().unwrap().len(), 2);
        assert_eq!(value["files"].as_array().unwrap().len(), 2);
        assert!(value["selected"].is_string());

        let pair = value["structures"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == "pair")
            .unwrap();
        assert_eq!(pair["source"], "file");
        assert_eq!(pair["format"], "pdb");
        assert_eq!(pair["statistics"]["total_atoms"], 2);
        assert_eq!(pair["sequences"]["A"], "AG");
        assert!(pair["metadata"]["distogram"].is_object());

        let model = value["structures"]
            .as_array()
            .unwrap()
            .iter()
            .find(|s| s["name"] == "model")
            .unwrap();
        assert!(model.get("statistics").is_none());
        assert!(model.get("metadata").is_none());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_writes_manifest_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let pdb = dir.path().join("pair.pdb");
        fs::write(&pdb, PDB).unwrap();
        let out = dir.path().join("scene.json");

        let args = session_args(&[
            "foldscope",
            "session",
            pdb.to_str().unwrap(),
            "--select",
            "0",
            "-o",
            out.to_str().unwrap(),
        ]);
        run(args).await.unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["structures"][0]["name"], "pair");
        assert_eq!(written["viewer"]["view_mode"], "default");
    }

    #[test]
    fn files_without_a_loaded_outcome_count_as_failed() {
        let outcomes = vec![
            LoadOutcome::Loaded(StructureId::new("a.pdb-1")),
            LoadOutcome::Discarded(StructureId::new("b.pdb-2")),
        ];
        assert_eq!(not_loaded(&outcomes, 3), 2);
        assert_eq!(not_loaded(&outcomes[..1], 1), 0);
    }

    #[tokio::test]
    async fn same_named_files_both_reach_the_manifest() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        let paths = [first.path().join("pair.pdb"), second.path().join("pair.pdb")];
        for path in &paths {
            fs::write(path, PDB).unwrap();
        }

        let mut session = Session::new(ProgressReporter::new());
        let outcomes = session.load_paths(&paths).await;
        assert_eq!(not_loaded(&outcomes, paths.len()), 0);

        let value = serde_json::to_value(build_manifest(&session)).unwrap();
        assert_eq!(value["structures"].as_array().unwrap().len(), 2);
        assert_eq!(value["files"].as_array().unwrap().len(), 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn run_fails_when_nothing_loads() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.pdb");
        let args = session_args(&["foldscope", "session", missing.to_str().unwrap()]);
        assert!(matches!(run(args).await, Err(CliError::Argument(_))));
    }
}
