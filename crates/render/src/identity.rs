//! Wire identity
//!
//! A wire is identified by the ordered pair of pins it joins. Either side may
//! be missing while a connection is being dragged out of a pin.

use joint_core::PinId;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Ordered (start, end) pin pair naming one drawn wire
///
/// `(a, b)` and `(b, a)` are different wires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireId {
    pub start: Option<PinId>,
    pub end: Option<PinId>,
}

impl WireId {
    pub fn new(start: Option<PinId>, end: Option<PinId>) -> Self {
        Self { start, end }
    }

    /// Both pins present
    pub fn linked(start: PinId, end: PinId) -> Self {
        Self::new(Some(start), Some(end))
    }

    /// A wire with at least one end following the mouse
    pub fn is_preview(&self) -> bool {
        self.start.is_none() || self.end.is_none()
    }

    /// The pin a preview wire is attached to
    pub fn connected_pin(&self) -> Option<PinId> {
        match (self.start, self.end) {
            (Some(pin), None) | (None, Some(pin)) => Some(pin),
            _ => None,
        }
    }
}

impl Hash for WireId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Missing pins hash as zero
        self.start.map_or(0, |pin| pin.as_u128()).hash(state);
        self.end.map_or(0, |pin| pin.as_u128()).hash(state);
    }
}

impl std::fmt::Display for WireId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let side = |pin: Option<PinId>| pin.map_or_else(|| "-".to_string(), |p| p.to_string());
        write!(f, "{} -> {}", side(self.start), side(self.end))
    }
}
