use clap::{Args, Parser, Subcommand};
use foldscope::engine::viewer::{ColorScheme, ViewMode};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "The foldscope developers",
    version,
    about = "foldscope CLI - Inspect protein structure files and prepare viewer sessions for an external renderer.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print atom, residue, chain and sequence summaries of structure files.
    Stats(StatsArgs),
    /// Compute the residue distance matrix of a structure and write it as CSV.
    Distogram(DistogramArgs),
    /// Load structures concurrently and emit a JSON scene manifest for a renderer.
    Session(SessionArgs),
}

/// Arguments for the `stats` subcommand.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Structure files to summarize.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Print the summaries as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `distogram` subcommand.
#[derive(Args, Debug)]
pub struct DistogramArgs {
    /// Structure file to analyse (PDB).
    #[arg(required = true, value_name = "FILE")]
    pub file: PathBuf,

    /// Path of the CSV file to write. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `session` subcommand.
#[derive(Args, Debug)]
pub struct SessionArgs {
    /// Structure files to load into the session.
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Viewer defaults in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the view mode (default, cartoon, spacefill, licorice, surface).
    #[arg(long, value_name = "MODE")]
    pub view_mode: Option<ViewMode>,

    /// Override the color scheme (default, chain, residue, element, bfactor, sequence).
    #[arg(long, value_name = "SCHEME")]
    pub color_scheme: Option<ColorScheme>,

    /// Override the atom size scale.
    #[arg(long, value_name = "FLOAT")]
    pub atom_size: Option<f64>,

    #[command(flatten)]
    pub ligand: LigandVisibility,

    #[command(flatten)]
    pub water_ion: WaterIonVisibility,

    /// Residue ids to highlight, comma separated.
    #[arg(long, value_name = "IDS", value_delimiter = ',')]
    pub highlight: Vec<i64>,

    /// Index of the structure to select after loading.
    #[arg(long, value_name = "INDEX")]
    pub select: Option<usize>,

    /// Compute and attach a distogram for every parsed structure.
    #[arg(long)]
    pub with_distograms: bool,

    /// Set a specific viewer value, overriding the config file.
    /// Can be used multiple times. Example: -S viewer.atom-size=0.8
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,

    /// Path of the manifest to write. Defaults to standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Mutually exclusive flags for ligand visibility.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct LigandVisibility {
    /// Show ligands.
    #[arg(long)]
    pub show_ligand: bool,
    /// Hide ligands.
    #[arg(long)]
    pub hide_ligand: bool,
}

impl LigandVisibility {
    pub fn requested(self) -> Option<bool> {
        visibility(self.show_ligand, self.hide_ligand)
    }
}

/// Mutually exclusive flags for water and ion visibility.
#[derive(Args, Debug, Clone, Copy)]
#[group(required = false, multiple = false)]
pub struct WaterIonVisibility {
    /// Show waters and ions.
    #[arg(long)]
    pub show_water_ion: bool,
    /// Hide waters and ions.
    #[arg(long)]
    pub hide_water_ion: bool,
}

impl WaterIonVisibility {
    pub fn requested(self) -> Option<bool> {
        visibility(self.show_water_ion, self.hide_water_ion)
    }
}

fn visibility(show: bool, hide: bool) -> Option<bool> {
    match (show, hide) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}
