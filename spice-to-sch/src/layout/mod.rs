//! Layout Engine
//!
//! Maps classified groups to absolute placements. Every group kind owns a
//! lane whose origin comes from [`LayoutConfig`]; within a lane the only state
//! is a horizontal cursor. Pin ids come from a [`PinCounter`] owned by the
//! engine, so they are assigned in exactly the order elements are produced.

pub mod geometry;
pub mod pins;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::parser::schema::{Polarity, Transistor, TransistorId};
use crate::ports::PortSplit;
use crate::topology::{external_nodes, Classification, TransistorGroup};

pub use geometry::{Point, Wire};
pub use pins::{PinCounter, PinId};

/// Distance from a device origin to its channel terminals
const TERMINAL_OFFSET: i64 = 30;
/// Distance from a device origin to its body/gate pins
const PIN_OFFSET: i64 = 20;
/// Vertical pitch between I/O pins
const IO_PITCH: i64 = 20;

/// xschem rotation code for pins whose label sits to the right
const ROT_RIGHT: u8 = 2;
/// xschem rotation code for pins whose label sits to the left
const ROT_LEFT: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PinSymbol {
    Input,
    Output,
    Label,
}

impl PinSymbol {
    pub fn symbol(self) -> &'static str {
        match self {
            PinSymbol::Input => "ipin.sym",
            PinSymbol::Output => "opin.sym",
            PinSymbol::Label => "lab_pin.sym",
        }
    }
}

/// A pin-bearing component: I/O pin or labelled connection pin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PinPlacement {
    pub id: PinId,
    pub symbol: PinSymbol,
    pub position: Point,
    pub rotation: u8,
    pub label: String,
}

/// A transistor symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevicePlacement {
    pub reference: TransistorId,
    pub symbol: String,
    pub position: Point,
    pub rotation: u8,
    pub mirror: bool,
    pub width: String,
    pub length: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Element {
    Device(DevicePlacement),
    Pin(PinPlacement),
    Wire(Wire),
}

impl Element {
    pub fn as_pin(&self) -> Option<&PinPlacement> {
        match self {
            Element::Pin(pin) => Some(pin),
            _ => None,
        }
    }
}

/// Channel and gate terminals to expose as labelled pins; the body pin is
/// always drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Terminals {
    pub source: bool,
    pub drain: bool,
    pub gate: bool,
}

impl Terminals {
    pub const ALL: Self = Self {
        source: true,
        drain: true,
        gate: true,
    };
}

/// Placements in emission order plus the number of pin ids used
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub elements: Vec<Element>,
    pub pin_count: u32,
}

impl Layout {
    pub fn pins(&self) -> impl Iterator<Item = &PinPlacement> {
        self.elements.iter().filter_map(Element::as_pin)
    }
}

pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    arena: &'a [Transistor],
    pins: PinCounter,
    elements: Vec<Element>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, arena: &'a [Transistor]) -> Self {
        Self::with_counter(config, arena, PinCounter::new())
    }

    /// Continue numbering from an existing counter.
    pub fn with_counter(config: &'a LayoutConfig, arena: &'a [Transistor], pins: PinCounter) -> Self {
        Self {
            config,
            arena,
            pins,
            elements: Vec::new(),
        }
    }

    /// Lay out a whole subcircuit in emission order: I/O pins, inverters,
    /// parallel groups, series chains, leftover PMOS row, leftover NMOS row.
    pub fn layout(mut self, ports: &PortSplit, classification: &Classification) -> Layout {
        let config = self.config;
        self.place_io(ports);
        self.place_inverters(&classification.inverters);
        self.place_parallel(&classification.parallel);
        self.place_series(&classification.series);
        self.place_row(&classification.leftover_pmos, config.pmos_origin);
        self.place_row(&classification.leftover_nmos, config.nmos_origin);
        self.finish()
    }

    pub fn finish(self) -> Layout {
        Layout {
            elements: self.elements,
            pin_count: self.pins.issued(),
        }
    }

    /// Inputs stack downwards from the I/O origin, outputs upwards from one
    /// column to the right.
    pub fn place_io(&mut self, ports: &PortSplit) {
        let origin = self.config.io_origin;
        for input in &ports.inputs {
            let y = origin.y + i64::from(self.pins.issued()) * IO_PITCH;
            self.pin(PinSymbol::Input, Point::new(origin.x, y), ROT_LEFT, input);
        }
        for (index, output) in ports.outputs.iter().enumerate() {
            let position = Point::new(origin.x + PIN_OFFSET, origin.y - (index as i64 + 1) * IO_PITCH);
            self.pin(PinSymbol::Output, position, ROT_LEFT, output);
        }
    }

    pub fn place_inverters(&mut self, groups: &[TransistorGroup]) {
        let origin = self.config.inverter_origin;
        let mut cursor = origin.x;

        for group in groups {
            let arena = self.arena;
            let (Some(pmos), Some(nmos)) = (group.find(arena, Polarity::Pmos), group.find(arena, Polarity::Nmos)) else {
                tracing::warn!("Skipping inverter group {:?} without a PMOS/NMOS pair", group.members);
                continue;
            };

            let p = Point::new(cursor, origin.y - TERMINAL_OFFSET);
            let n = Point::new(cursor, origin.y + TERMINAL_OFFSET);

            self.device(
                pmos,
                p,
                Terminals {
                    drain: false,
                    gate: false,
                    ..Terminals::ALL
                },
            );
            self.device(
                nmos,
                n,
                Terminals {
                    source: false,
                    gate: false,
                    ..Terminals::ALL
                },
            );

            let input = n.offset(-60, -TERMINAL_OFFSET);
            let output = n.offset(140, -TERMINAL_OFFSET);
            self.pin(PinSymbol::Label, input, ROT_LEFT, &nmos.gate);
            self.pin(PinSymbol::Label, output, ROT_RIGHT, &nmos.source);

            let internal = &pmos.drain;
            self.wire(n.offset(-PIN_OFFSET, -TERMINAL_OFFSET), input, internal);
            self.wire(p.offset(-PIN_OFFSET, 0), n.offset(-PIN_OFFSET, 0), internal);
            self.wire(n.offset(PIN_OFFSET, -TERMINAL_OFFSET), output, internal);

            cursor += self.config.spacing * 3;
        }
    }

    pub fn place_parallel(&mut self, groups: &[TransistorGroup]) {
        let origin = self.config.parallel_origin;
        let spacing = self.config.spacing;
        let mut cursor = origin.x;

        for group in groups {
            let arena = self.arena;
            for (index, &id) in group.members.iter().enumerate() {
                let position = Point::new(cursor + index as i64 * spacing, origin.y);
                self.device(&arena[id], position, Terminals::ALL);
            }

            if let Some(&first) = group.members.first() {
                if group.len() > 1 {
                    let shared = &arena[first];
                    let left = cursor + PIN_OFFSET;
                    let right = cursor + (group.len() as i64 - 1) * spacing + PIN_OFFSET;

                    let top = origin.y - TERMINAL_OFFSET;
                    let bottom = origin.y + TERMINAL_OFFSET;
                    self.wire(Point::new(left, top), Point::new(right, top), &shared.source);
                    self.wire(Point::new(left, bottom), Point::new(right, bottom), &shared.drain);
                }
            }

            cursor += (group.len() as i64 + 1) * spacing;
        }
    }

    /// Stack each chain vertically and expose only its two external nodes.
    pub fn place_series(&mut self, groups: &[TransistorGroup]) {
        let origin = self.config.series_origin;
        let mut cursor = origin.x;

        for group in groups {
            let arena = self.arena;
            let members: Vec<&Transistor> = group.members.iter().map(|&id| &arena[id]).collect();
            let external = external_nodes(members.iter().copied());

            let mut positions = Vec::with_capacity(members.len());
            for (index, member) in members.iter().enumerate() {
                let position = Point::new(cursor, origin.y + index as i64 * self.config.vertical_spacing);
                positions.push(position);
                self.device(
                    member,
                    position,
                    Terminals {
                        source: false,
                        drain: false,
                        gate: true,
                    },
                );
            }

            if let (Some(first), Some(last), Some(&top), Some(&bottom)) =
                (members.first(), members.last(), positions.first(), positions.last())
            {
                let top_node = chain_end_node(first, &external, true);
                let bottom_node = chain_end_node(last, &external, false);
                self.pin(
                    PinSymbol::Label,
                    top.offset(PIN_OFFSET, -TERMINAL_OFFSET),
                    ROT_RIGHT,
                    top_node,
                );
                self.pin(
                    PinSymbol::Label,
                    bottom.offset(PIN_OFFSET, TERMINAL_OFFSET),
                    ROT_RIGHT,
                    bottom_node,
                );
            }

            cursor += self.config.spacing * 2;
        }
    }

    /// Simple left-to-right row with every terminal pinned.
    pub fn place_row(&mut self, ids: &[TransistorId], origin: Point) {
        let arena = self.arena;
        for (index, &id) in ids.iter().enumerate() {
            let position = Point::new(origin.x + index as i64 * self.config.spacing, origin.y);
            self.device(&arena[id], position, Terminals::ALL);
        }
    }

    fn device(&mut self, t: &Transistor, position: Point, terminals: Terminals) {
        self.elements.push(Element::Device(DevicePlacement {
            reference: t.id,
            symbol: t.symbol(),
            position,
            rotation: 0,
            mirror: false,
            width: t.width.clone(),
            length: t.length.clone(),
            model: t.model.clone(),
        }));

        self.pin(PinSymbol::Label, position.offset(PIN_OFFSET, 0), ROT_RIGHT, &t.body);
        if terminals.source {
            self.pin(
                PinSymbol::Label,
                position.offset(PIN_OFFSET, -TERMINAL_OFFSET),
                ROT_RIGHT,
                &t.source,
            );
        }
        if terminals.drain {
            self.pin(
                PinSymbol::Label,
                position.offset(PIN_OFFSET, TERMINAL_OFFSET),
                ROT_RIGHT,
                &t.drain,
            );
        }
        if terminals.gate {
            self.pin(PinSymbol::Label, position.offset(-PIN_OFFSET, 0), ROT_LEFT, &t.gate);
        }
    }

    fn pin(&mut self, symbol: PinSymbol, position: Point, rotation: u8, label: &str) {
        let id = self.pins.next_id();
        self.elements.push(Element::Pin(PinPlacement {
            id,
            symbol,
            position,
            rotation,
            label: label.to_string(),
        }));
    }

    fn wire(&mut self, start: Point, end: Point, label: &str) {
        self.elements.push(Element::Wire(Wire::new(start, end, label)));
    }
}

/// Node to expose at one end of a series chain.
///
/// PMOS chains hang from the supply side, so the top prefers the source and
/// the bottom the drain; NMOS chains are the other way round. When the
/// preferred terminal is internal to the chain the other one is used.
fn chain_end_node<'t>(t: &'t Transistor, external: &[&str], top: bool) -> &'t str {
    let (preferred, fallback) = if t.is_pmos() == top {
        (&t.source, &t.drain)
    } else {
        (&t.drain, &t.source)
    };
    if external.contains(&preferred.as_str()) {
        preferred
    } else {
        fallback
    }
}

/// Lay out a classified subcircuit with a fresh pin counter.
pub fn layout_schematic(
    config: &LayoutConfig,
    arena: &[Transistor],
    ports: &PortSplit,
    classification: &Classification,
) -> Layout {
    LayoutEngine::new(config, arena).layout(ports, classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::GroupKind;

    fn device(id: usize, drain: &str, gate: &str, source: &str, polarity: Polarity) -> Transistor {
        Transistor {
            id,
            instance: format!("X{id}"),
            drain: drain.to_string(),
            gate: gate.to_string(),
            source: source.to_string(),
            body: "B".to_string(),
            polarity,
            width: "1".to_string(),
            length: "1".to_string(),
            model: "fet".to_string(),
            library: "lib".to_string(),
        }
    }

    fn labels(layout: &Layout) -> Vec<(&str, Point)> {
        layout.pins().map(|p| (p.label.as_str(), p.position)).collect()
    }

    #[test]
    fn test_io_pins() {
        let config = LayoutConfig::default();
        let ports = PortSplit {
            inputs: vec!["A".into(), "B".into()],
            outputs: vec!["Y".into(), "Z".into()],
        };
        let mut engine = LayoutEngine::new(&config, &[]);
        engine.place_io(&ports);
        let layout = engine.finish();

        assert_eq!(
            labels(&layout),
            vec![
                ("A", Point::new(-120, -40)),
                ("B", Point::new(-120, -20)),
                ("Y", Point::new(-100, -60)),
                ("Z", Point::new(-100, -80)),
            ]
        );
        assert_eq!(layout.pin_count, 4);
    }

    #[test]
    fn test_single_device_pins() {
        let config = LayoutConfig::default();
        let arena = vec![device(0, "d", "g", "s", Polarity::Nmos)];
        let mut engine = LayoutEngine::new(&config, &arena);
        engine.place_row(&[0], Point::new(0, 0));
        let layout = engine.finish();

        assert_eq!(
            labels(&layout),
            vec![
                ("B", Point::new(20, 0)),
                ("s", Point::new(20, -30)),
                ("d", Point::new(20, 30)),
                ("g", Point::new(-20, 0)),
            ]
        );
        assert!(matches!(layout.elements[0], Element::Device(ref d) if d.reference == 0));
    }

    #[test]
    fn test_parallel_wires_span_group() {
        let config = LayoutConfig::default();
        let arena = vec![
            device(0, "d", "a", "s", Polarity::Pmos),
            device(1, "d", "b", "s", Polarity::Pmos),
            device(2, "d", "c", "s", Polarity::Pmos),
        ];
        let group = TransistorGroup::new(GroupKind::Parallel, vec![0, 1, 2]);
        let mut engine = LayoutEngine::new(&config, &arena);
        engine.place_parallel(&[group]);
        let layout = engine.finish();

        let wires: Vec<&Wire> = layout
            .elements
            .iter()
            .filter_map(|e| match e {
                Element::Wire(w) => Some(w),
                _ => None,
            })
            .collect();
        assert_eq!(
            wires,
            vec![
                &Wire::new(Point::new(40, 220), Point::new(280, 220), "s"),
                &Wire::new(Point::new(40, 280), Point::new(280, 280), "d"),
            ]
        );
        assert_eq!(layout.pin_count, 12);
    }

    #[test]
    fn test_parallel_rails_follow_first_member() {
        // Hand-built group whose members disagree on source
        let config = LayoutConfig::default();
        let arena = vec![
            device(0, "d", "a", "s", Polarity::Nmos),
            device(1, "d", "b", "other", Polarity::Nmos),
        ];
        let group = TransistorGroup::new(GroupKind::Parallel, vec![0, 1]);
        let mut engine = LayoutEngine::new(&config, &arena);
        engine.place_parallel(&[group]);
        let layout = engine.finish();

        assert!(layout
            .elements
            .contains(&Element::Wire(Wire::new(Point::new(40, 220), Point::new(160, 220), "s"))));
        assert_eq!(layout.pin_count, 8);
    }

    #[test]
    fn test_series_exposes_external_nodes() {
        let config = LayoutConfig::default();
        let arena = vec![
            device(0, "n1", "a", "in", Polarity::Nmos),
            device(1, "n2", "b", "n1", Polarity::Nmos),
            device(2, "out", "c", "n2", Polarity::Nmos),
        ];
        let group = TransistorGroup::new(GroupKind::Series, vec![0, 1, 2]);
        let mut engine = LayoutEngine::new(&config, &arena);
        engine.place_series(&[group]);
        let layout = engine.finish();

        let pins = labels(&layout);
        // body + gate per device, then the two chain ends
        assert_eq!(pins.len(), 8);
        assert_eq!(pins[6], ("in", Point::new(40, 820)));
        assert_eq!(pins[7], ("out", Point::new(40, 1000)));
    }

    #[test]
    fn test_chain_end_preference() {
        let pmos = device(0, "d", "g", "s", Polarity::Pmos);
        let nmos = device(1, "d", "g", "s", Polarity::Nmos);
        let both = ["s", "d"];
        assert_eq!(chain_end_node(&pmos, &both, true), "s");
        assert_eq!(chain_end_node(&pmos, &both, false), "d");
        assert_eq!(chain_end_node(&nmos, &both, true), "d");
        assert_eq!(chain_end_node(&nmos, &both, false), "s");
        assert_eq!(chain_end_node(&pmos, &["d"], true), "d");
    }
}
