//! Last-write-wins pointer position shared between input and simulation.
//!
//! Both coordinates are packed into one `AtomicU64` (two `f32` bit patterns),
//! so a reader can never observe `x` from one event and `y` from another,
//! even when input arrives on a different thread than the frame loop.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::DVec2;

/// Both halves are the all-ones `f32` NaN pattern.
const ABSENT: u64 = u64::MAX;

/// Shared pointer state. Cloning shares the same cell.
#[derive(Debug, Clone)]
pub struct PointerHandle {
    bits: Arc<AtomicU64>,
}

impl PointerHandle {
    /// A cell with no pointer present.
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(ABSENT)),
        }
    }

    /// Records the latest pointer position. Non-finite input clears the cell.
    pub fn move_to(&self, x: f64, y: f64) {
        let bits = if x.is_finite() && y.is_finite() {
            pack(x as f32, y as f32)
        } else {
            ABSENT
        };
        self.bits.store(bits, Ordering::Relaxed);
    }

    /// Marks the pointer as gone (left the window).
    pub fn leave(&self) {
        self.bits.store(ABSENT, Ordering::Relaxed);
    }

    /// The latest position, if any.
    pub fn position(&self) -> Option<DVec2> {
        let bits = self.bits.load(Ordering::Relaxed);
        if bits == ABSENT {
            return None;
        }
        let (x, y) = unpack(bits);
        Some(DVec2::new(x as f64, y as f64))
    }

    /// Whether two handles share one cell.
    pub fn same_cell(&self, other: &PointerHandle) -> bool {
        Arc::ptr_eq(&self.bits, &other.bits)
    }
}

impl Default for PointerHandle {
    fn default() -> Self {
        Self::new()
    }
}

fn pack(x: f32, y: f32) -> u64 {
    ((x.to_bits() as u64) << 32) | y.to_bits() as u64
}

fn unpack(bits: u64) -> (f32, f32) {
    (f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
}
