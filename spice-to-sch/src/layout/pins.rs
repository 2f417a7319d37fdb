//! Pin identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique suffix of a placed pin (`p<n>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PinId(pub u32);

impl fmt::Display for PinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// Hands out pin ids in strict emission order.
///
/// One counter belongs to one conversion; it is threaded through the layout
/// engine explicitly so separate conversions never share numbering.
#[derive(Debug, Default)]
pub struct PinCounter {
    next: u32,
}

impl PinCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the next id.
    pub fn next_id(&mut self) -> PinId {
        let id = PinId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids handed out so far, which is also the value the next
    /// call to [`next_id`](Self::next_id) returns.
    pub fn issued(&self) -> u32 {
        self.next
    }
}
