//! Params word layout (big-endian, byte 0 first):
//!
//! | bytes  | field                          |
//! |--------|--------------------------------|
//! | 0      | family tag                     |
//! | 1..4   | TWAP lookback seconds (u24)    |
//! | 4..32  | family params (28 bytes)       |

use serde::{Deserialize, Serialize};

use crate::codec::{read_u24, write_u24};
use crate::constants::{FAMILY_PARAMS_SIZE, MAX_TWAP_LOOKBACK_SECONDS, WORD_SIZE};
use crate::types::{DistributionFamily, FamilyParams, ParamsWord};

const FAMILY_OFFSET: usize = 0;
const LOOKBACK_OFFSET: usize = 1;
const FAMILY_PARAMS_OFFSET: usize = 4;

/// Decoded distribution configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionParams {
    pub family: DistributionFamily,
    /// 0 means the supplied reference tick is used as-is
    pub twap_lookback_seconds: u32,
    pub family_params: FamilyParams,
}

impl DistributionParams {
    pub fn new(
        family: DistributionFamily,
        twap_lookback_seconds: u32,
        family_params: FamilyParams,
    ) -> Self {
        Self {
            family,
            twap_lookback_seconds,
            family_params,
        }
    }

    pub fn encode(&self) -> ParamsWord {
        encode_params(self)
    }
}

pub fn decode_params(word: &ParamsWord) -> DistributionParams {
    let bytes = &word.0;
    let mut family_params = [0u8; FAMILY_PARAMS_SIZE];
    family_params.copy_from_slice(&bytes[FAMILY_PARAMS_OFFSET..WORD_SIZE]);
    DistributionParams {
        family: DistributionFamily::from_tag(bytes[FAMILY_OFFSET]),
        twap_lookback_seconds: read_u24(bytes, LOOKBACK_OFFSET),
        family_params,
    }
}

/// Lookbacks wider than 24 bits are truncated; validation rejects them first
pub fn encode_params(params: &DistributionParams) -> ParamsWord {
    let mut bytes = [0u8; WORD_SIZE];
    bytes[FAMILY_OFFSET] = params.family.tag();
    write_u24(
        &mut bytes,
        LOOKBACK_OFFSET,
        params.twap_lookback_seconds & MAX_TWAP_LOOKBACK_SECONDS,
    );
    bytes[FAMILY_PARAMS_OFFSET..WORD_SIZE].copy_from_slice(&params.family_params);
    ParamsWord(bytes)
}
