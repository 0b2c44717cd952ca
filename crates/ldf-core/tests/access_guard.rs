//! Query access is limited to the trusted set inside the deployed instance.

#[cfg(test)]
mod tests {
    use ldf_core::{CallContext, DistributionFamily, LdfError, StateWord};
    use ldf_test_utils::*;

    fn setup() -> (TestContext, ldf_core::QueryContext) {
        let ctx = TestContext::new(DEFAULT_TICK_SPACING);
        let query = ctx.context(
            0,
            0,
            params_word(DistributionFamily::Uniform, 0, uniform_static(-50, 50)),
            StateWord::default(),
        );
        (ctx, query)
    }

    fn run_all(ctx: &TestContext, query: &ldf_core::QueryContext, call: &CallContext) -> Vec<LdfError> {
        let engine = &ctx.engine;
        vec![
            engine.query(query, call).unwrap_err(),
            engine.liquidity_density_x64(query, call).unwrap_err(),
            engine.cumulative_amount0(query, 1_000, call).unwrap_err(),
            engine.cumulative_amount1(query, 1_000, call).unwrap_err(),
            engine
                .compute_swap(query, 10, 1_000, true, true, call)
                .unwrap_err(),
        ]
    }

    #[test]
    fn test_trusted_callers_are_served() {
        let (ctx, query) = setup();
        for caller in [HUB, QUOTER, INSTANCE] {
            let call = CallContext::new(caller, INSTANCE);
            assert!(ctx.engine.query(&query, &call).is_ok());
            assert!(ctx.engine.liquidity_density_x64(&query, &call).is_ok());
        }
    }

    #[test]
    fn test_untrusted_caller_rejected_everywhere() {
        let (ctx, query) = setup();
        let call = CallContext::new(STRANGER, INSTANCE);
        for err in run_all(&ctx, &query, &call) {
            assert_eq!(err, LdfError::UntrustedCaller { caller: STRANGER });
        }
    }

    #[test]
    fn test_foreign_execution_rejected_everywhere() {
        let (ctx, query) = setup();
        // even the hub is refused when the code runs outside the instance
        let call = CallContext::new(HUB, STRANGER);
        for err in run_all(&ctx, &query, &call) {
            assert_eq!(err, LdfError::ForeignExecutionContext);
            assert!(err.is_authorization());
        }
    }

    #[test]
    fn test_owner_is_not_a_trusted_caller() {
        let (ctx, query) = setup();
        let call = CallContext::new(OWNER, INSTANCE);
        assert!(matches!(
            ctx.engine.query(&query, &call),
            Err(LdfError::UntrustedCaller { .. })
        ));
    }
}
