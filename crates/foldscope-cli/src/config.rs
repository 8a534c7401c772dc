use crate::cli::SessionArgs;
use crate::error::{CliError, Result};
use foldscope::engine::viewer::{ColorScheme, ViewMode, ViewerPatch};
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
struct PartialViewerSection {
    #[serde(rename = "view-mode")]
    view_mode: Option<ViewMode>,
    #[serde(rename = "color-scheme")]
    color_scheme: Option<ColorScheme>,
    #[serde(rename = "atom-size")]
    atom_size: Option<f64>,
    #[serde(rename = "show-ligand")]
    show_ligand: Option<bool>,
    #[serde(rename = "show-water-ion")]
    show_water_ion: Option<bool>,
    highlight: Option<Vec<i64>>,
}

/// Viewer settings as read from a TOML file, before `--set` values and flags are applied.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct PartialViewerConfig {
    viewer: Option<PartialViewerSection>,
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn parse_variant<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| CliError::Config(format!("Invalid value for {}: {}", key, e)))
}

impl PartialViewerConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading viewer configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Resolves the final viewer patch: file values, then `--set` values, then explicit flags.
    pub fn merge_with_cli(mut self, args: &SessionArgs) -> Result<ViewerPatch> {
        self.apply_set_values(&args.set_values)?;
        let section = self.viewer.take().unwrap_or_default();

        let selected_residues = if !args.highlight.is_empty() {
            Some(args.highlight.iter().copied().collect())
        } else {
            section.highlight.map(|ids| ids.into_iter().collect())
        };

        Ok(ViewerPatch {
            view_mode: args.view_mode.or(section.view_mode),
            color_scheme: args.color_scheme.or(section.color_scheme),
            atom_size: args.atom_size.or(section.atom_size),
            show_ligand: args.ligand.requested().or(section.show_ligand),
            show_water_ion: args.water_ion.requested().or(section.show_water_ion),
            selected_residues,
        })
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        for kv_pair in set_values {
            let Some((key, value_str)) = kv_pair.split_once('=') else {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            };
            let section = self.viewer.get_or_insert_with(Default::default);

            match key.trim() {
                "viewer.view-mode" => section.view_mode = Some(parse_variant(key, value_str)?),
                "viewer.color-scheme" => section.color_scheme = Some(parse_variant(key, value_str)?),
                "viewer.atom-size" => section.atom_size = Some(parse_value(key, value_str, "float")?),
                "viewer.show-ligand" => {
                    section.show_ligand = Some(parse_value(key, value_str, "boolean")?)
                }
                "viewer.show-water-ion" => {
                    section.show_water_ion = Some(parse_value(key, value_str, "boolean")?)
                }
                "viewer.highlight" => {
                    section.highlight = Some(
                        value_str
                            .split(',')
                            .filter(|part| !part.trim().is_empty())
                            .map(|part| parse_value(key, part, "integer"))
                            .collect::<Result<Vec<i64>>>()?,
                    )
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
