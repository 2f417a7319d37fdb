//! Convert a netlist and print how its transistors were grouped.

use spice_to_sch::prelude::*;
use std::path::Path;

fn main() -> Result<(), ConvertError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/nand2.spice".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example convert_netlist [path/to/cell.spice]");
        std::process::exit(1);
    }

    let conversion = ConverterCore::convert_file(path, &ConvertOptions::default())?;
    let report = &conversion.report;

    println!("Subcircuit: {}", report.subcircuit);
    println!("Inputs:  {}", report.inputs.join(" "));
    println!("Outputs: {}", report.outputs.join(" "));
    println!();

    for group in &report.groups {
        let marker = if group.approximate { " (approximate order)" } else { "" };
        println!("{:?}: {}{}", group.kind, group.members.join(" - "), marker);
    }
    if !report.leftover_pmos.is_empty() {
        println!("Leftover PMOS: {}", report.leftover_pmos.join(" "));
    }
    if !report.leftover_nmos.is_empty() {
        println!("Leftover NMOS: {}", report.leftover_nmos.join(" "));
    }

    println!();
    println!(
        "{} transistors, {} pins",
        conversion.stats.transistors, conversion.stats.pins
    );
    Ok(())
}
