//! Serializable summary of how a subcircuit was classified.

use serde::{Deserialize, Serialize};

use crate::parser::schema::{Subcircuit, Transistor};
use crate::ports::PortSplit;
use crate::topology::{Classification, GroupKind, TransistorGroup};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub kind: GroupKind,
    /// Instance names in member order
    pub members: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub approximate: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub subcircuit: String,
    pub inputs: Vec<String>,
    pub outputs: Vec<String>,
    pub groups: Vec<GroupReport>,
    pub leftover_pmos: Vec<String>,
    pub leftover_nmos: Vec<String>,
}

impl ClassificationReport {
    pub fn new(subcircuit: &Subcircuit, ports: &PortSplit, classification: &Classification) -> Self {
        let arena = &subcircuit.transistors;
        let groups = classification
            .inverters
            .iter()
            .chain(&classification.parallel)
            .chain(&classification.series)
            .map(|g| GroupReport::new(g, arena))
            .collect();

        Self {
            subcircuit: subcircuit.name.clone(),
            inputs: ports.inputs.clone(),
            outputs: ports.outputs.clone(),
            groups,
            leftover_pmos: instance_names(&classification.leftover_pmos, arena),
            leftover_nmos: instance_names(&classification.leftover_nmos, arena),
        }
    }

    /// Groups whose ordering could not be fully resolved
    pub fn approximate_groups(&self) -> impl Iterator<Item = &GroupReport> {
        self.groups.iter().filter(|g| g.approximate)
    }
}

impl GroupReport {
    fn new(group: &TransistorGroup, arena: &[Transistor]) -> Self {
        Self {
            kind: group.kind,
            members: instance_names(&group.members, arena),
            approximate: group.approximate,
        }
    }
}

fn instance_names(ids: &[usize], arena: &[Transistor]) -> Vec<String> {
    ids.iter().map(|&id| arena[id].instance.clone()).collect()
}
