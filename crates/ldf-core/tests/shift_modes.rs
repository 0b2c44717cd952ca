//! Shift-mode enforcement through the engine pipeline.

#[cfg(test)]
mod tests {
    use ldf_core::codec::decode_state;
    use ldf_core::shift::enforce_shift;
    use ldf_core::{DistributionFamily, ShiftMode};
    use ldf_test_utils::*;
    use proptest::prelude::*;

    fn anchor_of(output: &ldf_core::QueryOutput) -> i32 {
        decode_state(&output.new_state).last_anchor_tick
    }

    #[test]
    fn test_monotonic_up_holds_anchor() {
        let mut ctx = TestContext::new(DEFAULT_TICK_SPACING);
        let params = params_word(
            DistributionFamily::Uniform,
            0,
            uniform_dynamic(ShiftMode::Right, -20, 4),
        );

        let output = ctx.query_and_commit(0, 0, params).unwrap();
        assert_eq!(anchor_of(&output), -20);
        assert!(!output.should_surge);

        let output = ctx.query_and_commit(0, 100, params).unwrap();
        assert_eq!(anchor_of(&output), 80);
        assert!(output.should_surge);

        // reference falls back; the range stays at [80, 120)
        let output = ctx.query_and_commit(30, 50, params).unwrap();
        assert_eq!(anchor_of(&output), 80);
        assert!(!output.should_surge);
        assert_eq!(output.liquidity_density_x64, 0);

        let held = ctx.query_and_commit(80, 50, params).unwrap();
        assert!(held.liquidity_density_x64 > 0);

        let output = ctx.query_and_commit(0, 200, params).unwrap();
        assert_eq!(anchor_of(&output), 180);
        assert!(output.should_surge);
    }

    #[test]
    fn test_monotonic_down_holds_anchor() {
        let mut ctx = TestContext::new(DEFAULT_TICK_SPACING);
        let params = params_word(
            DistributionFamily::GeometricWithCarpet,
            0,
            geometric(ShiftMode::Left, -50, 10, ALPHA_DECAY, CARPET_ONE_PERCENT),
        );

        assert_eq!(anchor_of(&ctx.query_and_commit(0, 0, params).unwrap()), -50);

        let output = ctx.query_and_commit(0, 500, params).unwrap();
        assert_eq!(anchor_of(&output), -50);
        assert!(!output.should_surge);

        let output = ctx.query_and_commit(0, -500, params).unwrap();
        assert_eq!(anchor_of(&output), -550);
        assert!(output.should_surge);
    }

    #[test]
    fn test_both_follows_reference() {
        let mut ctx = TestContext::new(DEFAULT_TICK_SPACING);
        let params = params_word(
            DistributionFamily::Uniform,
            0,
            uniform_dynamic(ShiftMode::Both, -20, 4),
        );

        ctx.query_and_commit(0, 0, params).unwrap();
        let output = ctx.query_and_commit(0, -300, params).unwrap();
        assert_eq!(anchor_of(&output), -320);
        assert!(output.should_surge);

        let output = ctx.query_and_commit(0, 300, params).unwrap();
        assert_eq!(anchor_of(&output), 280);
    }

    #[test]
    fn test_twap_lookback_replaces_reference() {
        let mut ctx = TestContext::with_pool(
            DEFAULT_TICK_SPACING,
            MockPool {
                twap_tick: Some(1_000),
                ..MockPool::default()
            },
        );
        let params = params_word(
            DistributionFamily::Uniform,
            600,
            uniform_dynamic(ShiftMode::Both, -20, 4),
        );
        // the supplied reference tick is ignored
        let output = ctx.query_and_commit(0, -77_777, params).unwrap();
        assert_eq!(anchor_of(&output), 980);
    }

    proptest! {
        #[test]
        fn prop_monotonic_up_anchor_never_decreases(references in prop::collection::vec(-20_000i32..20_000, 1..20)) {
            let mut ctx = TestContext::new(DEFAULT_TICK_SPACING);
            let params = params_word(
                DistributionFamily::Uniform,
                0,
                uniform_dynamic(ShiftMode::Right, -100, 20),
            );
            let mut previous: Option<i32> = None;
            for reference in references {
                let output = ctx.query_and_commit(0, reference, params).unwrap();
                let anchor = anchor_of(&output);
                if let Some(previous) = previous {
                    prop_assert!(anchor >= previous);
                    prop_assert_eq!(output.should_surge, anchor != previous);
                }
                previous = Some(anchor);
            }
        }

        #[test]
        fn prop_monotonic_down_anchor_never_increases(references in prop::collection::vec(-20_000i32..20_000, 1..20)) {
            let mut ctx = TestContext::new(DEFAULT_TICK_SPACING);
            let params = params_word(
                DistributionFamily::DoubleGeometricWithCarpet,
                0,
                double_geometric(
                    ShiftMode::Left,
                    -100,
                    (10, ALPHA_DECAY, 1),
                    (10, ALPHA_GROWTH, 1),
                    CARPET_ONE_PERCENT,
                ),
            );
            let mut previous: Option<i32> = None;
            for reference in references {
                let anchor = anchor_of(&ctx.query_and_commit(0, reference, params).unwrap());
                if let Some(previous) = previous {
                    prop_assert!(anchor <= previous);
                }
                previous = Some(anchor);
            }
        }

        #[test]
        fn prop_enforce_shift_modes(raw in -500_000i32..500_000, previous in -500_000i32..500_000) {
            prop_assert_eq!(enforce_shift(raw, previous, ShiftMode::Both), raw);
            prop_assert_eq!(enforce_shift(raw, previous, ShiftMode::Static), raw);
            prop_assert!(enforce_shift(raw, previous, ShiftMode::Right) >= previous);
            prop_assert!(enforce_shift(raw, previous, ShiftMode::Left) <= previous);
        }
    }
}
