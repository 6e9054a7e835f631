//! RPN/NRPN accumulation across Control Change messages.
//!
//! Parameter numbers arrive as controller 101/100 (RPN MSB/LSB) or 99/98 (NRPN MSB/LSB);
//! values arrive as data entry controller 6 (MSB) and 38 (LSB). Values are cached per
//! parameter number so a lone LSB update keeps the MSB from an earlier write.

use crate::packet::{Cable, CABLE_COUNT};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const CC_DATA_ENTRY_MSB: u8 = 6;
pub const CC_DATA_ENTRY_LSB: u8 = 38;
pub const CC_NRPN_LSB: u8 = 98;
pub const CC_NRPN_MSB: u8 = 99;
pub const CC_RPN_LSB: u8 = 100;
pub const CC_RPN_MSB: u8 = 101;

/// "No parameter selected".
pub const NULL_FUNCTION: u16 = 0x3FFF;

const LSB_MASK: u16 = 0x007F;
const MSB_MASK: u16 = 0x3F80;

/// Which parameter namespace data entry currently applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterMode {
    #[default]
    None,
    Rpn,
    Nrpn,
}

/// How tracker state is keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterScope {
    /// One state for the whole endpoint. Interleaved sequences on different cables
    /// share parameter selection and cached values.
    #[default]
    Shared,
    /// Independent state per cable.
    PerCable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParameterKind {
    Registered,
    NonRegistered,
}

/// A data entry applied to the selected parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterUpdate {
    pub kind: ParameterKind,
    /// 14-bit parameter number.
    pub function: u16,
    /// 14-bit accumulated value.
    pub value: u16,
}

impl ParameterUpdate {
    #[inline]
    pub fn msb(&self) -> u8 {
        ((self.value >> 7) & 0x7F) as u8
    }

    #[inline]
    pub fn lsb(&self) -> u8 {
        (self.value & 0x7F) as u8
    }
}

#[derive(Debug, Clone)]
struct ParameterState {
    mode: ParameterMode,
    rpn_function: u16,
    nrpn_function: u16,
    rpn_values: HashMap<u16, u16>,
    nrpn_values: HashMap<u16, u16>,
}

impl Default for ParameterState {
    fn default() -> Self {
        Self {
            mode: ParameterMode::None,
            rpn_function: NULL_FUNCTION,
            nrpn_function: NULL_FUNCTION,
            rpn_values: HashMap::new(),
            nrpn_values: HashMap::new(),
        }
    }
}

impl ParameterState {
    fn select_rpn(&mut self, function: u16) {
        self.rpn_function = function;
        self.mode = if function == NULL_FUNCTION {
            ParameterMode::None
        } else {
            ParameterMode::Rpn
        };
    }

    fn select_nrpn(&mut self, function: u16) {
        self.nrpn_function = function;
        self.mode = ParameterMode::Nrpn;
    }

    /// Writes one half of the selected parameter's value. `keep` masks the half that
    /// persists from the previous write.
    fn data_entry(&mut self, keep: u16, bits: u16) -> Option<ParameterUpdate> {
        let (kind, function, values) = match self.mode {
            ParameterMode::Rpn => (
                ParameterKind::Registered,
                self.rpn_function,
                &mut self.rpn_values,
            ),
            ParameterMode::Nrpn => (
                ParameterKind::NonRegistered,
                self.nrpn_function,
                &mut self.nrpn_values,
            ),
            ParameterMode::None => return None,
        };

        let slot = values.entry(function).or_insert(0);
        *slot = (*slot & keep) | bits;

        Some(ParameterUpdate {
            kind,
            function,
            value: *slot,
        })
    }
}

#[derive(Debug, Clone)]
pub struct RpnNrpnTracker {
    scope: ParameterScope,
    states: Vec<ParameterState>,
}

impl RpnNrpnTracker {
    pub fn new(scope: ParameterScope) -> Self {
        let slots = match scope {
            ParameterScope::Shared => 1,
            ParameterScope::PerCable => CABLE_COUNT,
        };
        Self {
            scope,
            states: vec![ParameterState::default(); slots],
        }
    }

    pub fn mode(&self, cable: Cable) -> ParameterMode {
        self.states[self.slot(cable)].mode
    }

    /// Feeds one Control Change. Returns an update when it was a data entry for a
    /// selected parameter; every other controller only changes selection state or is
    /// ignored.
    pub fn process(&mut self, cable: Cable, controller: u8, value: u8) -> Option<ParameterUpdate> {
        let slot = self.slot(cable);
        let state = &mut self.states[slot];
        let value = u16::from(value & 0x7F);

        match controller {
            CC_DATA_ENTRY_MSB => state.data_entry(LSB_MASK, value << 7),
            CC_DATA_ENTRY_LSB => state.data_entry(MSB_MASK, value),
            CC_NRPN_LSB => {
                state.select_nrpn((state.nrpn_function & MSB_MASK) | value);
                None
            }
            CC_NRPN_MSB => {
                state.select_nrpn((state.nrpn_function & LSB_MASK) | (value << 7));
                None
            }
            CC_RPN_LSB => {
                state.select_rpn((state.rpn_function & MSB_MASK) | value);
                None
            }
            CC_RPN_MSB => {
                state.select_rpn((state.rpn_function & LSB_MASK) | (value << 7));
                None
            }
            _ => None,
        }
    }

    /// Forgets all selections and cached values.
    pub fn reset(&mut self) {
        self.states.fill(ParameterState::default());
    }

    #[inline]
    fn slot(&self, cable: Cable) -> usize {
        match self.scope {
            ParameterScope::Shared => 0,
            ParameterScope::PerCable => cable.index(),
        }
    }
}

impl Default for RpnNrpnTracker {
    fn default() -> Self {
        Self::new(ParameterScope::default())
    }
}
