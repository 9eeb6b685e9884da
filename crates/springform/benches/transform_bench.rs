use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use markup::{Event, TokenizerConfig, tokenize_with};
use springform::json::JsonEvaluator;
use springform::{Config, NAMESPACE, rewrite};

const SMALL_FORMS: usize = 16;
const LARGE_FORMS: usize = 4_000;

fn make_forms(count: usize) -> String {
    let mut out = String::with_capacity(count.saturating_mul(320));
    out.push_str(r#"<f:with auto-name="on" auto-value="on" auto-domid="on" tabindex="1" auto-tabindex="on">"#);
    for _ in 0..count {
        out.push_str(r#"<fieldset><label for="auto">Name</label><input f:bind="user.name"/>"#);
        out.push_str(r#"<input type="checkbox" f:bind="user.admin"/>"#);
        out.push_str(r#"<select f:bind="user.plan"><option>free</option><option value="pro">Pro</option></select>"#);
        out.push_str(r#"<textarea f:bind="user.bio">old</textarea></fieldset>"#);
    }
    out.push_str("</f:with>");
    out
}

fn events(count: usize) -> Vec<Event> {
    let config = TokenizerConfig::new().declare("f", NAMESPACE);
    tokenize_with(&make_forms(count), &config)
}

fn evaluator() -> JsonEvaluator {
    JsonEvaluator::new(serde_json::json!({
        "user": {"name": "Ada", "admin": true, "plan": "pro", "bio": "Analyst"}
    }))
}

fn bench_transform(c: &mut Criterion, name: &str, forms: usize) {
    let input = events(forms);
    let evaluator = evaluator();
    let config = Config::default();
    c.bench_function(name, |b| {
        b.iter_batched(
            || (input.clone(), config.context()),
            |(events, mut ctx)| {
                let out = rewrite(events, &mut ctx, &evaluator).expect("rewrite");
                black_box(out.len())
            },
            BatchSize::LargeInput,
        );
    });
}

fn bench_transform_small(c: &mut Criterion) {
    bench_transform(c, "bench_transform_small", SMALL_FORMS);
}

fn bench_transform_large(c: &mut Criterion) {
    bench_transform(c, "bench_transform_large", LARGE_FORMS);
}

fn bench_transform_passthrough(c: &mut Criterion) {
    let input = markup::tokenize(&markup::make_form_blocks(LARGE_FORMS));
    let evaluator = evaluator();
    c.bench_function("bench_transform_passthrough", |b| {
        b.iter_batched(
            || input.clone(),
            |events| {
                let mut ctx = springform::Context::new();
                black_box(rewrite(events, &mut ctx, &evaluator).expect("rewrite").len())
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_transform_small,
    bench_transform_large,
    bench_transform_passthrough
);
criterion_main!(benches);
