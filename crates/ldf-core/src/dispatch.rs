//! # Family Dispatcher
//!
//! Routes a family tag to the matching base distribution. Shapes are decoded
//! afresh on every call; nothing is cached between queries.

use crate::distributions::{
    BaseFamily, CarpetedDoubleGeometricDistribution, CarpetedGeometricDistribution, DensityCurve,
    UniformDistribution,
};
use crate::errors::{LdfError, LdfResult};
use crate::types::{DistributionFamily, FamilyParams, LdfType, ShiftMode};

/// A decoded shape of one of the supported families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Uniform(UniformDistribution),
    GeometricWithCarpet(CarpetedGeometricDistribution),
    DoubleGeometricWithCarpet(CarpetedDoubleGeometricDistribution),
}

impl Shape {
    /// Decode `family_params` against the reference tick.
    /// `None` and unrecognized families are rejected.
    pub fn decode(
        family: DistributionFamily,
        reference_tick: i32,
        tick_spacing: i32,
        family_params: &FamilyParams,
    ) -> LdfResult<Self> {
        match family {
            DistributionFamily::Uniform => Ok(Self::Uniform(UniformDistribution::decode(
                reference_tick,
                tick_spacing,
                family_params,
            ))),
            DistributionFamily::GeometricWithCarpet => Ok(Self::GeometricWithCarpet(
                CarpetedGeometricDistribution::decode(reference_tick, tick_spacing, family_params),
            )),
            DistributionFamily::DoubleGeometricWithCarpet => Ok(Self::DoubleGeometricWithCarpet(
                CarpetedDoubleGeometricDistribution::decode(
                    reference_tick,
                    tick_spacing,
                    family_params,
                ),
            )),
            DistributionFamily::None | DistributionFamily::Unrecognized(_) => {
                Err(LdfError::InvalidParams)
            }
        }
    }

    pub fn family(&self) -> DistributionFamily {
        match self {
            Self::Uniform(_) => UniformDistribution::FAMILY,
            Self::GeometricWithCarpet(_) => CarpetedGeometricDistribution::FAMILY,
            Self::DoubleGeometricWithCarpet(_) => CarpetedDoubleGeometricDistribution::FAMILY,
        }
    }

    pub fn shift_mode(&self) -> ShiftMode {
        match self {
            Self::Uniform(shape) => shape.shift_mode(),
            Self::GeometricWithCarpet(shape) => shape.shift_mode(),
            Self::DoubleGeometricWithCarpet(shape) => shape.shift_mode(),
        }
    }

    pub fn anchor_tick(&self) -> i32 {
        match self {
            Self::Uniform(shape) => shape.anchor_tick(),
            Self::GeometricWithCarpet(shape) => shape.anchor_tick(),
            Self::DoubleGeometricWithCarpet(shape) => shape.anchor_tick(),
        }
    }

    pub fn with_anchor(&self, anchor_tick: i32) -> Self {
        match self {
            Self::Uniform(shape) => Self::Uniform(shape.with_anchor(anchor_tick)),
            Self::GeometricWithCarpet(shape) => {
                Self::GeometricWithCarpet(shape.with_anchor(anchor_tick))
            }
            Self::DoubleGeometricWithCarpet(shape) => {
                Self::DoubleGeometricWithCarpet(shape.with_anchor(anchor_tick))
            }
        }
    }
}

impl DensityCurve for Shape {
    fn tick_spacing(&self) -> i32 {
        match self {
            Self::Uniform(shape) => shape.tick_spacing(),
            Self::GeometricWithCarpet(shape) => shape.tick_spacing(),
            Self::DoubleGeometricWithCarpet(shape) => shape.tick_spacing(),
        }
    }

    fn liquidity_density_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        match self {
            Self::Uniform(shape) => shape.liquidity_density_x64(rounded_tick),
            Self::GeometricWithCarpet(shape) => shape.liquidity_density_x64(rounded_tick),
            Self::DoubleGeometricWithCarpet(shape) => shape.liquidity_density_x64(rounded_tick),
        }
    }

    fn cumulative_amount0_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        match self {
            Self::Uniform(shape) => shape.cumulative_amount0_x64(rounded_tick),
            Self::GeometricWithCarpet(shape) => shape.cumulative_amount0_x64(rounded_tick),
            Self::DoubleGeometricWithCarpet(shape) => shape.cumulative_amount0_x64(rounded_tick),
        }
    }

    fn cumulative_amount1_x64(&self, rounded_tick: i32) -> LdfResult<u128> {
        match self {
            Self::Uniform(shape) => shape.cumulative_amount1_x64(rounded_tick),
            Self::GeometricWithCarpet(shape) => shape.cumulative_amount1_x64(rounded_tick),
            Self::DoubleGeometricWithCarpet(shape) => shape.cumulative_amount1_x64(rounded_tick),
        }
    }
}

/// Structural validation routed by family. `None` and unrecognized families
/// are never valid.
pub fn is_valid_params(
    tick_spacing: i32,
    twap_lookback_seconds: u32,
    family: DistributionFamily,
    family_params: &FamilyParams,
    ldf_type: LdfType,
) -> bool {
    match family {
        DistributionFamily::Uniform => UniformDistribution::is_valid_params(
            tick_spacing,
            twap_lookback_seconds,
            family_params,
            ldf_type,
        ),
        DistributionFamily::GeometricWithCarpet => CarpetedGeometricDistribution::is_valid_params(
            tick_spacing,
            twap_lookback_seconds,
            family_params,
            ldf_type,
        ),
        DistributionFamily::DoubleGeometricWithCarpet => {
            CarpetedDoubleGeometricDistribution::is_valid_params(
                tick_spacing,
                twap_lookback_seconds,
                family_params,
                ldf_type,
            )
        }
        DistributionFamily::None | DistributionFamily::Unrecognized(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_i24;
    use crate::constants::FAMILY_PARAMS_SIZE;

    fn uniform(lower: i32, upper: i32) -> FamilyParams {
        let mut params = [0u8; FAMILY_PARAMS_SIZE];
        params[0] = ShiftMode::Static as u8;
        write_i24(&mut params, 1, lower);
        write_i24(&mut params, 4, upper);
        params
    }

    #[test]
    fn test_unsupported_families_rejected() {
        let params = uniform(-60, 60);
        assert_eq!(
            Shape::decode(DistributionFamily::None, 0, 60, &params),
            Err(LdfError::InvalidParams)
        );
        assert_eq!(
            Shape::decode(DistributionFamily::Unrecognized(9), 0, 60, &params),
            Err(LdfError::InvalidParams)
        );
        let stateful = LdfType::DynamicAndStateful;
        assert!(!is_valid_params(60, 0, DistributionFamily::None, &params, stateful));
        assert!(!is_valid_params(60, 0, DistributionFamily::Unrecognized(4), &params, stateful));
        assert!(is_valid_params(60, 0, DistributionFamily::Uniform, &params, stateful));
    }

    #[test]
    fn test_shape_matches_family() {
        let params = uniform(-60, 60);
        let shape = Shape::decode(DistributionFamily::Uniform, 0, 60, &params).unwrap();
        let direct = UniformDistribution::decode(0, 60, &params);
        assert_eq!(shape.family(), DistributionFamily::Uniform);
        assert_eq!(shape.query(0).unwrap(), direct.query(0).unwrap());
        assert_eq!(shape.anchor_tick(), -60);
        assert_eq!(shape.with_anchor(0).anchor_tick(), 0);
    }
}
