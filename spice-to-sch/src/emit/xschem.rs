use std::fmt::Write;

use crate::layout::{DevicePlacement, Element, Layout, PinPlacement, PinSymbol, Wire};

/// File banner written before any record
pub const HEADER: &str = "v {xschem version=3.4.6RC file_version=1.2\n}\nG {}\nK {}\nV {}\nS {}\nE {}\n";

/// Accumulates xschem records into a string buffer.
#[derive(Debug, Default)]
pub struct XschemWriter {
    out: String,
}

impl XschemWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn header(&mut self) {
        self.out.push_str(HEADER);
    }

    pub fn device(&mut self, device: &DevicePlacement) {
        // Writing into a String cannot fail
        let _ = write!(
            self.out,
            "C {{{}}} {} {} {} {} {{name=M{}\nW={}\nL={}\nmodel={}\nspiceprefix=X\n}}\n",
            device.symbol,
            device.position.x,
            device.position.y,
            device.rotation,
            u8::from(device.mirror),
            device.reference,
            device.width,
            device.length,
            device.model,
        );
    }

    pub fn pin(&mut self, pin: &PinPlacement) {
        let _ = match pin.symbol {
            PinSymbol::Input | PinSymbol::Output => writeln!(
                self.out,
                "C {{{}}} {} {} {} 0 {{name={} lab={}}}",
                pin.symbol.symbol(),
                pin.position.x,
                pin.position.y,
                pin.rotation,
                pin.id,
                pin.label,
            ),
            PinSymbol::Label => writeln!(
                self.out,
                "C {{{}}} {} {} {} 0 {{name={} sig_type=std_logic lab={}}}",
                pin.symbol.symbol(),
                pin.position.x,
                pin.position.y,
                pin.rotation,
                pin.id,
                pin.label,
            ),
        };
    }

    pub fn wire(&mut self, wire: &Wire) {
        let _ = writeln!(
            self.out,
            "N {} {} {} {} {{lab={}}}",
            wire.start.x, wire.start.y, wire.end.x, wire.end.y, wire.label,
        );
    }

    pub fn element(&mut self, element: &Element) {
        match element {
            Element::Device(device) => self.device(device),
            Element::Pin(pin) => self.pin(pin),
            Element::Wire(wire) => self.wire(wire),
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Render a full schematic: banner followed by every element in layout order.
pub fn render_schematic(layout: &Layout) -> String {
    let mut writer = XschemWriter::new();
    writer.header();
    for element in &layout.elements {
        writer.element(element);
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PinId, Point};

    #[test]
    fn test_header_only() {
        let out = render_schematic(&Layout::default());
        assert_eq!(out, HEADER);
        assert!(out.starts_with("v {xschem version=3.4.6RC file_version=1.2\n}"));
    }

    #[test]
    fn test_device_record() {
        let mut writer = XschemWriter::new();
        writer.device(&DevicePlacement {
            reference: 3,
            symbol: "sky130_fd_pr/nfet_01v8.sym".to_string(),
            position: Point::new(20, 60),
            rotation: 0,
            mirror: false,
            width: "0.65".to_string(),
            length: "0.15".to_string(),
            model: "nfet_01v8".to_string(),
        });
        assert_eq!(
            writer.finish(),
            "C {sky130_fd_pr/nfet_01v8.sym} 20 60 0 0 {name=M3\nW=0.65\nL=0.15\nmodel=nfet_01v8\nspiceprefix=X\n}\n"
        );
    }

    #[test]
    fn test_pin_records() {
        let mut writer = XschemWriter::new();
        writer.pin(&PinPlacement {
            id: PinId(0),
            symbol: PinSymbol::Input,
            position: Point::new(-120, -40),
            rotation: 0,
            label: "A".to_string(),
        });
        writer.pin(&PinPlacement {
            id: PinId(1),
            symbol: PinSymbol::Output,
            position: Point::new(-100, -60),
            rotation: 0,
            label: "Y".to_string(),
        });
        writer.pin(&PinPlacement {
            id: PinId(2),
            symbol: PinSymbol::Label,
            position: Point::new(40, 0),
            rotation: 2,
            label: "VPWR".to_string(),
        });
        assert_eq!(
            writer.finish(),
            "C {ipin.sym} -120 -40 0 0 {name=p0 lab=A}\n\
             C {opin.sym} -100 -60 0 0 {name=p1 lab=Y}\n\
             C {lab_pin.sym} 40 0 2 0 {name=p2 sig_type=std_logic lab=VPWR}\n"
        );
    }

    #[test]
    fn test_io_pin_rotation_is_rendered() {
        let mut writer = XschemWriter::new();
        writer.pin(&PinPlacement {
            id: PinId(4),
            symbol: PinSymbol::Output,
            position: Point::new(0, 0),
            rotation: 2,
            label: "Q".to_string(),
        });
        assert_eq!(writer.finish(), "C {opin.sym} 0 0 2 0 {name=p4 lab=Q}\n");
    }

    #[test]
    fn test_wire_record() {
        let mut writer = XschemWriter::new();
        writer.wire(&Wire::new(Point::new(0, 30), Point::new(-40, 30), "Y"));
        assert_eq!(writer.finish(), "N 0 30 -40 30 {lab=Y}\n");
    }
}
