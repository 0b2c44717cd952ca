use ldf_core::codec::{write_i24, write_u16, write_u32};
use ldf_core::{
    DistributionFamily, DistributionParams, FamilyParams, ParamsWord, ShiftMode, FAMILY_PARAMS_SIZE,
};

/// Segment fields of a geometric shape: (length, alpha, weight)
pub type SegmentFields = (u16, u32, u32);

pub fn uniform_static(tick_lower: i32, tick_upper: i32) -> FamilyParams {
    uniform(ShiftMode::Static, tick_lower, tick_upper)
}

/// Uniform range `length` spacings wide, starting `offset` ticks from the
/// reference tick
pub fn uniform_dynamic(shift_mode: ShiftMode, offset: i32, length: i32) -> FamilyParams {
    uniform(shift_mode, offset, length)
}

fn uniform(shift_mode: ShiftMode, first: i32, second: i32) -> FamilyParams {
    let mut params = [0u8; FAMILY_PARAMS_SIZE];
    params[0] = shift_mode as u8;
    write_i24(&mut params, 1, first);
    write_i24(&mut params, 4, second);
    params
}

pub fn geometric(
    shift_mode: ShiftMode,
    tick: i32,
    length: u16,
    alpha: u32,
    carpet_weight: u32,
) -> FamilyParams {
    let mut params = [0u8; FAMILY_PARAMS_SIZE];
    params[0] = shift_mode as u8;
    write_i24(&mut params, 1, tick);
    write_u16(&mut params, 4, length);
    write_u32(&mut params, 6, alpha);
    write_u32(&mut params, 10, carpet_weight);
    params
}

pub fn double_geometric(
    shift_mode: ShiftMode,
    tick: i32,
    segment0: SegmentFields,
    segment1: SegmentFields,
    carpet_weight: u32,
) -> FamilyParams {
    let mut params = [0u8; FAMILY_PARAMS_SIZE];
    params[0] = shift_mode as u8;
    write_i24(&mut params, 1, tick);
    write_u16(&mut params, 4, segment0.0);
    write_u32(&mut params, 6, segment0.1);
    write_u32(&mut params, 10, segment0.2);
    write_u16(&mut params, 14, segment1.0);
    write_u32(&mut params, 16, segment1.1);
    write_u32(&mut params, 20, segment1.2);
    write_u32(&mut params, 24, carpet_weight);
    params
}

pub fn params_word(
    family: DistributionFamily,
    twap_lookback_seconds: u32,
    family_params: FamilyParams,
) -> ParamsWord {
    DistributionParams::new(family, twap_lookback_seconds, family_params).encode()
}
