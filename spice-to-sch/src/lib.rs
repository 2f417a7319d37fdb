//! spice-to-sch - SPICE MOSFET subcircuit to xschem schematic converter
//!
//! Reads the `.subckt` ... `.ends` window of a transistor-level netlist,
//! groups the transistors by topology (inverter pairs, parallel stacks,
//! series chains) and places each group in its own lane of an xschem
//! schematic.
//!
//! # Quick Start
//!
//! ```no_run
//! use spice_to_sch::{ConvertOptions, ConverterCore};
//! use std::path::Path;
//!
//! let options = ConvertOptions::default();
//! let conversion = ConverterCore::convert_file(Path::new("nand2.spice"), &options).unwrap();
//!
//! for group in &conversion.report.groups {
//!     println!("{:?}: {}", group.kind, group.members.join(", "));
//! }
//! std::fs::write("nand2.sch", &conversion.schematic).unwrap();
//! ```
//!
//! # Pipeline
//!
//! - **Parser**: subcircuit window, `+` continuations, device fields
//! - **Ports**: input/output split at the first supply port
//! - **Topology**: inverter, parallel and series passes over a claim pool
//! - **Layout**: one lane per group kind, pin ids in emission order
//! - **Emit**: xschem text records

pub mod config;
pub mod core;
pub mod emit;
pub mod layout;
pub mod parser;
pub mod ports;
pub mod report;
pub mod topology;

// Re-export main types
pub use config::{ConvertOptions, LayoutConfig, NamingConvention, PortRules, SupplyNets};
pub use core::{Conversion, ConversionStats, ConvertError, ConverterCore};
pub use parser::schema::{Polarity, Subcircuit, Transistor, TransistorId};
pub use parser::{FormatError, SpiceParser};
pub use ports::PortSplit;
pub use report::ClassificationReport;
pub use topology::{Classification, GroupKind, TopologyClassifier, TransistorGroup};

/// Convert netlist text to xschem text with default options (convenience wrapper).
pub fn convert(text: &str) -> Result<String, ConvertError> {
    ConverterCore::convert(text, &ConvertOptions::default()).map(|c| c.schematic)
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        Classification, ClassificationReport, Conversion, ConvertError, ConvertOptions, ConverterCore,
        FormatError, GroupKind, Polarity, TopologyClassifier, Transistor,
    };
}
