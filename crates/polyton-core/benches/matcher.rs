use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use polyton_core::{translate, Matcher, RuleTable};

const INPUTS: &[(&str, &str)] = &[
    ("word", "a)/nqrwpos "),
    ("diacritics", "th=| h(me/ra| w(=| a_)/|"),
    (
        "verse",
        "mh=nin a)/eide qea\\/ Phlhi+a/dew A)xilh=os ou)lome/nhn, h(\\ muri/' A)xaioi=s a)/lge' e)/qhke",
    ),
];

fn bench_lookup(c: &mut Criterion) {
    let table = RuleTable::global();
    let keys: Vec<char> = "a_)/|".chars().collect();
    c.bench_function("table/lookup_longest", |b| b.iter(|| table.lookup(&keys)));
}

fn bench_translate(c: &mut Criterion) {
    let table = RuleTable::global();
    let mut group = c.benchmark_group("matcher/translate");
    for &(label, input) in INPUTS {
        group.bench_with_input(BenchmarkId::new(label, input.len()), &input, |b, &input| {
            b.iter(|| translate(&table, input));
        });
    }
    group.finish();
}

fn bench_feed(c: &mut Criterion) {
    let table = RuleTable::global();
    let mut matcher = Matcher::new(Arc::clone(&table));
    c.bench_function("matcher/feed_key", |b| {
        b.iter(|| {
            let mut n = matcher.feed('a').len();
            n += matcher.feed(')').len();
            n += matcher.feed('/').len();
            n
        })
    });
}

criterion_group!(benches, bench_lookup, bench_translate, bench_feed);
criterion_main!(benches);
