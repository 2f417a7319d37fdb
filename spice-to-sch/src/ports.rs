//! Port Classifier
//!
//! Splits a subcircuit's port list into input and output pins. Supply and
//! ground ports are declared between the inputs and the outputs by
//! convention, so the first power/ground port marks the boundary: it and
//! everything before it are inputs, everything after it is an output.

use serde::{Deserialize, Serialize};

use crate::config::PortRules;
use crate::parser::FormatError;

/// Ordered input and output pin names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortSplit {
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
}

impl PortSplit {
    pub fn len(&self) -> usize {
        self.inputs.len() + self.outputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Classify the ports of a `.subckt NAME PORT...` header line.
pub fn classify_header(line: &str, line_number: usize, rules: &PortRules) -> Result<PortSplit, FormatError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(FormatError::MalformedHeader {
            line: line_number,
            tokens: tokens.len(),
        });
    }
    let ports: Vec<String> = tokens[2..].iter().map(|s| s.to_string()).collect();
    Ok(classify_ports(&ports, rules))
}

/// Classify an already tokenized port list, preserving relative order.
pub fn classify_ports(ports: &[String], rules: &PortRules) -> PortSplit {
    let mut split = PortSplit::default();
    let mut past_boundary = false;

    for port in ports {
        let is_supply = rules.is_power_ground(port);
        let keep_as_input = is_supply && rules.supplies_always_inputs;

        if !past_boundary || keep_as_input {
            split.inputs.push(port.clone());
        } else {
            split.outputs.push(port.clone());
        }

        if is_supply {
            past_boundary = true;
        }
    }

    split
}
