//! Numbered parameter store and coordinate-system table.

use super::{Axis, AxisValues};
use serde::Serialize;
use std::collections::BTreeMap;

/// Highest addressable parameter.
pub const MAX_ADDRESS: u16 = 5400;
/// G28 home position, X at this address through C at `+5`.
pub const G28_HOME: u16 = 5161;
/// G30 home position, X at this address through C at `+5`.
pub const G30_HOME: u16 = 5181;
/// G92 axis offsets, X at this address through C at `+5`.
pub const AXIS_OFFSETS: u16 = 5211;
/// Active coordinate system slot (1..=9).
pub const ACTIVE_COORDINATE_SYSTEM: u16 = 5220;
/// Coordinate system 1, X axis. Each further slot adds [`COORDINATE_SYSTEM_STRIDE`].
pub const COORDINATE_SYSTEM_BASE: u16 = 5221;
/// Address distance between consecutive coordinate-system slots.
pub const COORDINATE_SYSTEM_STRIDE: u16 = 20;

/// Address of `axis` within a six-axis block starting at `base`.
pub fn axis_address(base: u16, axis: Axis) -> u16 {
    base + axis.index() as u16
}

/// Address of `axis` for coordinate-system slot `1..=9`.
pub fn coordinate_system_address(slot: u8, axis: Axis) -> u16 {
    axis_address(
        COORDINATE_SYSTEM_BASE + u16::from(slot.saturating_sub(1)) * COORDINATE_SYSTEM_STRIDE,
        axis,
    )
}

/// Sparse register file addressed `0..=5400`. Unset addresses read as `0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterStore {
    values: BTreeMap<u16, f64>,
}

impl Default for ParameterStore {
    /// Power-on contents: everything zero except coordinate system 1 active.
    fn default() -> Self {
        let mut store = Self {
            values: BTreeMap::new(),
        };
        store.set(ACTIVE_COORDINATE_SYSTEM, 1.0);
        store
    }
}

impl ParameterStore {
    /// Read a parameter. Unset and out-of-range addresses read as `0`.
    pub fn get(&self, address: u16) -> f64 {
        self.values.get(&address).copied().unwrap_or(0.0)
    }

    /// Write a parameter. Returns `false` (and stores nothing) when
    /// `address` is above [`MAX_ADDRESS`].
    pub fn set(&mut self, address: u16, value: f64) -> bool {
        if address > MAX_ADDRESS {
            return false;
        }
        if value == 0.0 {
            self.values.remove(&address);
        } else {
            self.values.insert(address, value);
        }
        true
    }

    /// Read six consecutive axis values starting at `base`.
    pub fn axes(&self, base: u16) -> AxisValues {
        let mut out = AxisValues::default();
        for axis in Axis::ALL {
            out[axis] = self.get(axis_address(base, axis));
        }
        out
    }

    /// Write six consecutive axis values starting at `base`.
    pub fn set_axes(&mut self, base: u16, values: &AxisValues) {
        for axis in Axis::ALL {
            self.set(axis_address(base, axis), values[axis]);
        }
    }

    /// Iterate over non-zero parameters in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, f64)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }
}

/// Origins of the nine work coordinate systems.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoordinateSystemTable {
    slots: [AxisValues; 9],
}

impl CoordinateSystemTable {
    /// Origin of slot `1..=9`.
    pub fn get(&self, slot: u8) -> Option<&AxisValues> {
        self.slots.get(usize::from(slot).checked_sub(1)?)
    }

    /// Set one axis of slot `1..=9`. Returns `false` for an invalid slot.
    pub fn set(&mut self, slot: u8, axis: Axis, value: f64) -> bool {
        match usize::from(slot)
            .checked_sub(1)
            .and_then(|i| self.slots.get_mut(i))
        {
            Some(origin) => {
                origin[axis] = value;
                true
            }
            None => false,
        }
    }
}
