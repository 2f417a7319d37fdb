//! Emitter
//!
//! Renders placement records as schematic text. Nothing here validates or
//! re-numbers anything; the layout engine has already fixed positions and
//! pin ids.

pub mod xschem;

pub use xschem::{render_schematic, XschemWriter, HEADER};
