use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};

use bi_report::expression::parse_expression;
use bi_report::expression::tokenizer::Tokenizer;
use bi_report::model::{Record, Value};
use bi_report::{ExpressionEvaluator, RenderContext};

const EXPRESSION: &str = "(total * 1.2 - discount) / count > 10 and region = 'North'";

fn scope() -> Record {
    let mut record = Record::new();
    record.insert("total".to_string(), Value::Integer(1200));
    record.insert("discount".to_string(), Value::Integer(40));
    record.insert("count".to_string(), Value::Integer(12));
    record.insert("region".to_string(), Value::from("North"));
    record
}

fn benchmark_front_end(c: &mut Criterion) {
    c.bench_function("tokenize", |b| {
        b.iter(|| {
            let mut tokenizer = Tokenizer::new(black_box(EXPRESSION));
            let mut count = 0;
            while let Ok(Some(_)) = tokenizer.next_token() {
                count += 1;
            }
            black_box(count)
        })
    });

    c.bench_function("parse", |b| {
        b.iter(|| black_box(parse_expression(black_box(EXPRESSION))))
    });
}

fn benchmark_evaluation(c: &mut Criterion) {
    let root = scope();
    let row = scope();
    let root_context = RenderContext::root(&root);
    let row_context = root_context.child(&row);

    let mut group = c.benchmark_group("evaluate");

    let cached = ExpressionEvaluator::default();
    group.bench_function("cached", |b| {
        b.iter(|| black_box(cached.evaluate(&row_context, black_box(EXPRESSION))))
    });

    let uncached = ExpressionEvaluator::default().with_cache(false);
    group.bench_function("uncached", |b| {
        b.iter(|| black_box(uncached.evaluate(&row_context, black_box(EXPRESSION))))
    });

    group.bench_function("scope_lookup", |b| {
        b.iter(|| black_box(cached.evaluate(&row_context, black_box("region"))))
    });

    group.finish();
}

criterion_group!(benches, benchmark_front_end, benchmark_evaluation);
criterion_main!(benches);
