//! Conversion options.
//!
//! Everything the converter treats as convention rather than structure lives
//! here: how model names encode polarity, which port names are supplies, which
//! nets are the rails, and where each layout lane starts. All sections can be
//! overridden from JSON; missing keys keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::ConvertError;
use crate::layout::Point;
use crate::parser::schema::Polarity;

/// Default power/ground port lexicon
pub const POWER_GROUND_PORTS: &[&str] = &["VDD", "VCC", "VSS", "GND", "VGND", "VPWR", "VNB", "VPB"];

/// Options for one conversion run (CLI or library).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    pub naming: NamingConvention,
    pub ports: PortRules,
    pub nets: SupplyNets,
    pub layout: LayoutConfig,
}

impl ConvertOptions {
    /// Parse options from a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, ConvertError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ConvertError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&content)?;
        tracing::debug!("Loaded conversion options from {}", path.display());
        Ok(options)
    }
}

/// How a `<library><separator><model>` token is split and how the model name
/// encodes polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConvention {
    pub separator: String,
    /// Model-name prefixes that mark a PMOS device; everything else is NMOS
    pub pmos_prefixes: Vec<String>,
}

impl Default for NamingConvention {
    fn default() -> Self {
        Self {
            separator: "__".to_string(),
            pmos_prefixes: vec!["p".to_string()],
        }
    }
}

impl NamingConvention {
    /// Split a model token into `(library, model)`.
    pub fn split_model<'a>(&self, token: &'a str) -> Option<(&'a str, &'a str)> {
        let (library, model) = token.split_once(self.separator.as_str())?;
        if library.is_empty() || model.is_empty() {
            return None;
        }
        Some((library, model))
    }

    pub fn polarity(&self, model: &str) -> Polarity {
        if self
            .pmos_prefixes
            .iter()
            .any(|prefix| model.starts_with(prefix.as_str()))
        {
            Polarity::Pmos
        } else {
            Polarity::Nmos
        }
    }
}

/// Port classification rules for the subcircuit header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortRules {
    pub power_ground: Vec<String>,
    /// Keep supply ports that follow the input/output boundary as inputs
    pub supplies_always_inputs: bool,
}

impl Default for PortRules {
    fn default() -> Self {
        Self {
            power_ground: POWER_GROUND_PORTS.iter().map(|s| s.to_string()).collect(),
            supplies_always_inputs: false,
        }
    }
}

impl PortRules {
    pub fn is_power_ground(&self, port: &str) -> bool {
        self.power_ground.iter().any(|p| p == port)
    }
}

/// Rail net names used by inverter detection and terminal orientation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SupplyNets {
    pub supply: String,
    pub ground: String,
    /// Swap source and drain at parse time so rails sit in `source` (supply)
    /// and `drain` (ground). Off keeps netlist terminals as written.
    pub orient_terminals: bool,
}

impl Default for SupplyNets {
    fn default() -> Self {
        Self {
            supply: "VPWR".to_string(),
            ground: "VGND".to_string(),
            orient_terminals: false,
        }
    }
}

/// Lane origins and pitches in schematic canvas units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal pitch between devices
    pub spacing: i64,
    /// Vertical pitch between stacked series devices
    pub vertical_spacing: i64,
    pub io_origin: Point,
    pub inverter_origin: Point,
    pub parallel_origin: Point,
    pub pmos_origin: Point,
    pub nmos_origin: Point,
    pub series_origin: Point,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            spacing: 120,
            vertical_spacing: 60,
            io_origin: Point::new(-120, -40),
            inverter_origin: Point::new(20, 30),
            parallel_origin: Point::new(20, 250),
            pmos_origin: Point::new(20, 450),
            nmos_origin: Point::new(20, 650),
            series_origin: Point::new(20, 850),
        }
    }
}
