//! State word layout (big-endian, byte 0 first):
//!
//! | bytes  | field                                  |
//! |--------|----------------------------------------|
//! | 0      | last family tag (0 = uninitialized)    |
//! | 1..4   | last anchor tick (i24)                 |
//! | 4..32  | last family params, raw (28 bytes)     |

use serde::{Deserialize, Serialize};

use crate::codec::{read_i24, write_i24};
use crate::constants::{FAMILY_PARAMS_SIZE, WORD_SIZE};
use crate::types::{DistributionFamily, FamilyParams, StateWord};

const FAMILY_OFFSET: usize = 0;
const ANCHOR_OFFSET: usize = 1;
const FAMILY_PARAMS_OFFSET: usize = 4;

/// Per-pool state carried between queries by the pool engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionState {
    pub last_family: DistributionFamily,
    pub last_anchor_tick: i32,
    pub last_family_params: FamilyParams,
}

impl DistributionState {
    pub fn new(family: DistributionFamily, anchor_tick: i32, family_params: FamilyParams) -> Self {
        Self {
            last_family: family,
            last_anchor_tick: anchor_tick,
            last_family_params: family_params,
        }
    }

    pub fn uninitialized() -> Self {
        Self::new(DistributionFamily::None, 0, [0u8; FAMILY_PARAMS_SIZE])
    }

    pub fn initialized(&self) -> bool {
        self.last_family != DistributionFamily::None
    }

    pub fn encode(&self) -> StateWord {
        encode_state(self)
    }
}

pub fn decode_state(word: &StateWord) -> DistributionState {
    let bytes = &word.0;
    let mut last_family_params = [0u8; FAMILY_PARAMS_SIZE];
    last_family_params.copy_from_slice(&bytes[FAMILY_PARAMS_OFFSET..WORD_SIZE]);
    DistributionState {
        last_family: DistributionFamily::from_tag(bytes[FAMILY_OFFSET]),
        last_anchor_tick: read_i24(bytes, ANCHOR_OFFSET),
        last_family_params,
    }
}

/// Anchor ticks are stored in 24 bits; every tick of the domain fits
pub fn encode_state(state: &DistributionState) -> StateWord {
    let mut bytes = [0u8; WORD_SIZE];
    bytes[FAMILY_OFFSET] = state.last_family.tag();
    write_i24(&mut bytes, ANCHOR_OFFSET, state.last_anchor_tick);
    bytes[FAMILY_PARAMS_OFFSET..WORD_SIZE].copy_from_slice(&state.last_family_params);
    StateWord(bytes)
}
