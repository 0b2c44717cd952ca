//! Sanitize table: which family-param bytes define a shape.
//!
//! Bytes outside the kept ranges (the shift-mode byte and unused trailing
//! bytes) may change without resetting a pool's distribution state.

use serde::{Deserialize, Serialize};

use crate::constants::FAMILY_PARAMS_SIZE;
use crate::errors::{LdfError, LdfResult};
use crate::types::{DistributionFamily, FamilyParams};

/// Half-open `[start, end)` byte range of the family params
pub type ByteRange = [u8; 2];

/// Per-family list of shape-relevant byte ranges
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeTable {
    pub uniform: Vec<ByteRange>,
    pub geometric_with_carpet: Vec<ByteRange>,
    pub double_geometric_with_carpet: Vec<ByteRange>,
}

impl Default for SanitizeTable {
    fn default() -> Self {
        Self {
            // tick lower/upper or offset/length
            uniform: vec![[1, 7]],
            // min tick, length, alpha, carpet weight
            geometric_with_carpet: vec![[1, 14]],
            // every byte after the shift mode is used
            double_geometric_with_carpet: vec![[1, 28]],
        }
    }
}

impl SanitizeTable {
    fn ranges(&self, family: DistributionFamily) -> &[ByteRange] {
        match family {
            DistributionFamily::Uniform => &self.uniform,
            DistributionFamily::GeometricWithCarpet => &self.geometric_with_carpet,
            DistributionFamily::DoubleGeometricWithCarpet => &self.double_geometric_with_carpet,
            DistributionFamily::None | DistributionFamily::Unrecognized(_) => &[],
        }
    }

    /// 0xff for every kept byte of the family, 0x00 elsewhere
    pub fn keep_mask(&self, family: DistributionFamily) -> FamilyParams {
        let mut mask = [0u8; FAMILY_PARAMS_SIZE];
        for [start, end] in self.ranges(family) {
            let start = (*start as usize).min(FAMILY_PARAMS_SIZE);
            let end = (*end as usize).min(FAMILY_PARAMS_SIZE);
            if start < end {
                mask[start..end].fill(0xff);
            }
        }
        mask
    }

    pub fn sanitize(&self, family: DistributionFamily, params: &FamilyParams) -> FamilyParams {
        let mask = self.keep_mask(family);
        let mut sanitized = [0u8; FAMILY_PARAMS_SIZE];
        for (out, (byte, keep)) in sanitized.iter_mut().zip(params.iter().zip(mask.iter())) {
            *out = byte & keep;
        }
        sanitized
    }

    pub fn validate(&self) -> LdfResult<()> {
        let families = [
            ("uniform", &self.uniform),
            ("geometric_with_carpet", &self.geometric_with_carpet),
            ("double_geometric_with_carpet", &self.double_geometric_with_carpet),
        ];
        for (name, ranges) in families {
            for [start, end] in ranges.iter() {
                if start >= end || *end as usize > FAMILY_PARAMS_SIZE {
                    return Err(LdfError::invalid_config(
                        &format!("sanitize.{}", name),
                        &format!("range [{}, {}) must be non-empty and within 28 bytes", start, end),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Sanitize with the default table
pub fn sanitize_family_params(family: DistributionFamily, params: &FamilyParams) -> FamilyParams {
    SanitizeTable::default().sanitize(family, params)
}
