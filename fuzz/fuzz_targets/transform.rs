#![no_main]

use libfuzzer_sys::fuzz_target;
use markup::{TokenizerConfig, tokenize_with};
use springform::context::keys;
use springform::{Context, EvalError, NAMESPACE, StaticNode};

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let config = TokenizerConfig::new().declare("f", NAMESPACE);
    let events = tokenize_with(input, &config);

    let evaluator = |expr: &str, _: &Context| {
        if expr.starts_with('!') {
            return Err(EvalError::new("rejected"));
        }
        Ok(Some(StaticNode::boxed(expr, "v")))
    };
    let mut ctx = Context::new();
    for key in keys::TOGGLES {
        ctx.set(key, true);
    }
    ctx.set(keys::TABINDEX_VALUE, 1_i64);
    let _ = springform::rewrite(events, &mut ctx, &evaluator);
    assert_eq!(ctx.depth(), 1, "frames leaked for {input:?}");
});
