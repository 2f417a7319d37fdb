pub mod schema;
pub mod spice;

// Re-export for convenience
pub use schema::*;
pub use spice::{parse_subcircuit, FormatError, SpiceParser};
