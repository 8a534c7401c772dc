use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Smallest atom radius scale the renderer accepts.
pub const MIN_ATOM_SIZE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Default,
    Cartoon,
    Spacefill,
    Licorice,
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Default,
    Chain,
    Residue,
    Element,
    Bfactor,
    Sequence,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid {kind} '{value}' (expected one of: {expected})")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

impl FromStr for ViewMode {
    type Err = ParseVariantError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "cartoon" => Ok(Self::Cartoon),
            "spacefill" => Ok(Self::Spacefill),
            "licorice" => Ok(Self::Licorice),
            "surface" => Ok(Self::Surface),
            _ => Err(ParseVariantError {
                kind: "view mode",
                value: s.to_string(),
                expected: "default, cartoon, spacefill, licorice, surface",
            }),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Default => "default",
                Self::Cartoon => "cartoon",
                Self::Spacefill => "spacefill",
                Self::Licorice => "licorice",
                Self::Surface => "surface",
            }
        )
    }
}

impl FromStr for ColorScheme {
    type Err = ParseVariantError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(Self::Default),
            "chain" => Ok(Self::Chain),
            "residue" => Ok(Self::Residue),
            "element" => Ok(Self::Element),
            "bfactor" => Ok(Self::Bfactor),
            "sequence" => Ok(Self::Sequence),
            _ => Err(ParseVariantError {
                kind: "color scheme",
                value: s.to_string(),
                expected: "default, chain, residue, element, bfactor, sequence",
            }),
        }
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Default => "default",
                Self::Chain => "chain",
                Self::Residue => "residue",
                Self::Element => "element",
                Self::Bfactor => "bfactor",
                Self::Sequence => "sequence",
            }
        )
    }
}

/// Rendering settings shared by every loaded structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfiguration {
    pub view_mode: ViewMode,
    pub color_scheme: ColorScheme,
    pub atom_size: f64,
    pub show_ligand: bool,
    pub show_water_ion: bool,
    pub selected_residues: BTreeSet<i64>,
}

impl Default for ViewerConfiguration {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::Default,
            color_scheme: ColorScheme::Default,
            atom_size: 1.0,
            show_ligand: true,
            show_water_ion: false,
            selected_residues: BTreeSet::new(),
        }
    }
}

/// A partial update of [`ViewerConfiguration`]; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewerPatch {
    pub view_mode: Option<ViewMode>,
    pub color_scheme: Option<ColorScheme>,
    pub atom_size: Option<f64>,
    pub show_ligand: Option<bool>,
    pub show_water_ion: Option<bool>,
    pub selected_residues: Option<BTreeSet<i64>>,
}

impl ViewerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_atom_size(size: f64) -> f64 {
    if size.is_finite() {
        size.max(MIN_ATOM_SIZE)
    } else {
        MIN_ATOM_SIZE
    }
}

/// Owns the shared [`ViewerConfiguration`] and applies merge-patches to it.
#[derive(Debug, Clone, Default)]
pub struct ViewerController {
    config: ViewerConfiguration,
}

impl ViewerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration; its atom size is clamped like any other update.
    pub fn with_config(mut config: ViewerConfiguration) -> Self {
        config.atom_size = clamp_atom_size(config.atom_size);
        Self { config }
    }

    pub fn config(&self) -> &ViewerConfiguration {
        &self.config
    }

    /// Merges `patch` into the configuration.
    pub fn apply(&mut self, patch: ViewerPatch) {
        let ViewerPatch {
            view_mode,
            color_scheme,
            atom_size,
            show_ligand,
            show_water_ion,
            selected_residues,
        } = patch;

        if let Some(mode) = view_mode {
            self.config.view_mode = mode;
        }
        if let Some(scheme) = color_scheme {
            self.config.color_scheme = scheme;
        }
        if let Some(size) = atom_size {
            self.set_atom_size(size);
        }
        if let Some(show) = show_ligand {
            self.config.show_ligand = show;
        }
        if let Some(show) = show_water_ion {
            self.config.show_water_ion = show;
        }
        if let Some(residues) = selected_residues {
            self.config.selected_residues = residues;
        }
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.config.view_mode = mode;
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.config.color_scheme = scheme;
    }

    /// Sets the atom size, raising it to [`MIN_ATOM_SIZE`] if smaller or not finite.
    pub fn set_atom_size(&mut self, size: f64) {
        let clamped = clamp_atom_size(size);
        if clamped != size {
            debug!(requested = size, applied = clamped, "Clamped atom size");
        }
        self.config.atom_size = clamped;
    }

    pub fn set_show_ligand(&mut self, show: bool) {
        self.config.show_ligand = show;
    }

    pub fn set_show_water_ion(&mut self, show: bool) {
        self.config.show_water_ion = show;
    }

    /// Replaces the highlighted residues.
    pub fn highlight_residues(&mut self, residues: impl IntoIterator<Item = i64>) {
        self.config.selected_residues = residues.into_iter().collect();
    }

    /// Adds the residue to the highlight if absent, removes it otherwise.
    ///
    /// # Return
    ///
    /// Whether the residue is highlighted afterwards.
    pub fn toggle_residue(&mut self, residue_id: i64) -> bool {
        if self.config.selected_residues.remove(&residue_id) {
            false
        } else {
            self.config.selected_residues.insert(residue_id);
            true
        }
    }

    pub fn clear_highlight(&mut self) {
        self.config.selected_residues.clear();
    }
}
