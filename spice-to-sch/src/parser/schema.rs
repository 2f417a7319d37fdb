//! Netlist model: transistor records and the subcircuit that carries them.

use serde::{Deserialize, Serialize};

/// Index of a transistor inside its subcircuit's arena.
///
/// Equal to the ordinal of the device line in the subcircuit body, and used as
/// the `M<id>` reference designator suffix in the schematic.
pub type TransistorId = usize;

/// Transistor polarity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Pmos,
    Nmos,
}

/// A four-terminal MOSFET instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transistor {
    pub id: TransistorId,
    /// Instance token from the netlist (e.g. `X3`)
    pub instance: String,
    pub drain: String,
    pub gate: String,
    pub source: String,
    pub body: String,
    pub polarity: Polarity,
    pub width: String,
    pub length: String,
    /// Model name, e.g. `pfet_01v8_hvt`
    pub model: String,
    /// Library name, e.g. `sky130_fd_pr`
    pub library: String,
}

impl Transistor {
    pub fn is_pmos(&self) -> bool {
        self.polarity == Polarity::Pmos
    }

    /// True when the source or drain of `self` equals the source or drain of `other`.
    pub fn shares_channel_node(&self, other: &Transistor) -> bool {
        self.source == other.source
            || self.source == other.drain
            || self.drain == other.source
            || self.drain == other.drain
    }

    /// Swap source and drain so that the supply-facing terminal ends up in
    /// `source` and the ground-facing one in `drain`.
    ///
    /// Only applied at construction time, and only when orientation is
    /// enabled; records are never mutated after they leave the parser.
    pub(crate) fn oriented(mut self, supply: &str, ground: &str) -> Self {
        if self.drain == supply || self.source == ground {
            std::mem::swap(&mut self.drain, &mut self.source);
        }
        self
    }

    /// Symbol reference in `<library>/<model>.sym` form
    pub fn symbol(&self) -> String {
        format!("{}/{}.sym", self.library, self.model)
    }
}

/// One parsed `.subckt` ... `.ends` window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subcircuit {
    pub name: String,
    /// Port names in header order
    pub ports: Vec<String>,
    /// Transistor arena; `transistors[i].id == i`
    pub transistors: Vec<Transistor>,
    /// 1-based line number of the header
    pub header_line: usize,
}

impl Subcircuit {
    pub fn transistor(&self, id: TransistorId) -> Option<&Transistor> {
        self.transistors.get(id)
    }

    pub fn pmos_count(&self) -> usize {
        self.transistors.iter().filter(|t| t.is_pmos()).count()
    }

    pub fn nmos_count(&self) -> usize {
        self.transistors.len() - self.pmos_count()
    }
}
