//! Per-rule cell storage.

use crate::{CellState, RequestType};

/// One [`CellState`] per [`RequestType`] for a single (source, destination)
/// pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RuleCells([CellState; RequestType::COUNT]);

impl RuleCells {
    /// All cells unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// State of the cell for `ty`.
    pub fn get(&self, ty: RequestType) -> CellState {
        self.0[ty.index()]
    }

    /// Overwrite the cell for `ty`.
    pub fn set(&mut self, ty: RequestType, state: CellState) {
        self.0[ty.index()] = state;
    }

    /// True when every cell is unset.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|s| !s.is_set())
    }

    /// Set cells in [`RequestType::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (RequestType, CellState)> + '_ {
        RequestType::ALL
            .into_iter()
            .map(move |ty| (ty, self.get(ty)))
            .filter(|(_, state)| state.is_set())
    }

    /// Pack into the 2-bits-per-type snapshot encoding.
    pub fn to_bits(&self) -> u32 {
        RequestType::ALL.iter().fold(0u32, |bits, &ty| {
            bits | (u32::from(self.get(ty).as_u8()) << ty.bit_offset())
        })
    }

    /// Unpack from the snapshot encoding. Bits outside known fields are
    /// dropped.
    pub fn from_bits(bits: u32) -> Self {
        let mut cells = Self::new();
        for ty in RequestType::ALL {
            let v = ((bits >> ty.bit_offset()) & 3) as u8;
            // A 2-bit value always maps to a state
            if let Some(state) = CellState::from_u8(v) {
                cells.set(ty, state);
            }
        }
        cells
    }
}
