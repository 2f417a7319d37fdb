//! Core conversion pipeline shared by the CLI and library users.
//! Parse, classify, lay out and render in one pass; nothing is produced on error.

use std::path::Path;

use serde::Serialize;

use crate::config::ConvertOptions;
use crate::emit::render_schematic;
use crate::layout::{layout_schematic, Layout};
use crate::parser::schema::Subcircuit;
use crate::parser::{FormatError, SpiceParser};
use crate::ports::{classify_ports, PortSplit};
use crate::report::ClassificationReport;
use crate::topology::{Classification, TopologyClassifier};

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result of converting one subcircuit.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub subcircuit: Subcircuit,
    pub ports: PortSplit,
    pub classification: Classification,
    pub layout: Layout,
    /// Rendered xschem text
    pub schematic: String,
    pub report: ClassificationReport,
    pub stats: ConversionStats,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionStats {
    pub transistors: usize,
    pub inverters: usize,
    pub parallel: usize,
    pub series: usize,
    pub approximate: usize,
    pub leftover_pmos: usize,
    pub leftover_nmos: usize,
    pub pins: u32,
}

impl ConversionStats {
    fn collect(subcircuit: &Subcircuit, classification: &Classification, layout: &Layout) -> Self {
        Self {
            transistors: subcircuit.transistors.len(),
            inverters: classification.inverters.len(),
            parallel: classification.parallel.len(),
            series: classification.series.len(),
            approximate: classification.series.iter().filter(|g| g.approximate).count(),
            leftover_pmos: classification.leftover_pmos.len(),
            leftover_nmos: classification.leftover_nmos.len(),
            pins: layout.pin_count,
        }
    }

    pub fn grouped(&self) -> usize {
        self.transistors - self.leftover_pmos - self.leftover_nmos
    }
}

/// Core conversion API used by the CLI.
pub struct ConverterCore;

impl ConverterCore {
    /// Convert the subcircuit window of a SPICE netlist.
    pub fn convert(text: &str, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
        let subcircuit = SpiceParser::new(options).parse(text)?;
        let ports = classify_ports(&subcircuit.ports, &options.ports);
        let classification = TopologyClassifier::classify(&subcircuit.transistors, &options.nets);
        let layout = layout_schematic(&options.layout, &subcircuit.transistors, &ports, &classification);
        let schematic = render_schematic(&layout);
        let report = ClassificationReport::new(&subcircuit, &ports, &classification);
        let stats = ConversionStats::collect(&subcircuit, &classification, &layout);

        tracing::info!(
            "Converted {}: {} transistors, {} grouped, {} pins",
            subcircuit.name,
            stats.transistors,
            stats.grouped(),
            stats.pins
        );

        Ok(Conversion {
            subcircuit,
            ports,
            classification,
            layout,
            schematic,
            report,
            stats,
        })
    }

    /// Read and convert a netlist file.
    pub fn convert_file(path: &Path, options: &ConvertOptions) -> Result<Conversion, ConvertError> {
        let text = std::fs::read_to_string(path)?;
        tracing::debug!("Read {} bytes from {}", text.len(), path.display());
        Self::convert(&text, options)
    }
}
