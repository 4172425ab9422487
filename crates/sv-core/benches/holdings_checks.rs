//! Criterion benchmarks for the per-record holdings checks.
//!
//! Benchmarks magic-word classification, slash-year reconciliation, and
//! policy resolution, which run once per record (or per file) in a
//! validation pass.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sv_config::ValidatorConfig;
use sv_core::magic_words::{classify, classify_all, MagicWordCondition};
use sv_core::policy::PolicyResolver;
use sv_core::years::{end_dates_compatible, resolve_earlier, resolve_later, start_dates_compatible};

// ── Magic words ─────────────────────────────────────────────────────

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("holdings/classify");

    let statements = [
        ("plain", "v.1(1965)-v.40(2004)"),
        ("incomplete", "v.1-5 (1965-1969) incomplete; lacking v.3 no.2"),
        ("bound", "v.1-12 bd. w/ suppl."),
        ("nonprint", "v.30 (1994) also on C.D."),
    ];

    for (name, holdings) in statements {
        group.bench_with_input(BenchmarkId::new("single", name), holdings, |b, h| {
            b.iter(|| {
                black_box(classify(
                    Some(black_box(h)),
                    None,
                    Some("gift of the estate"),
                    MagicWordCondition::Completeness,
                ))
            })
        });
        group.bench_with_input(BenchmarkId::new("all", name), holdings, |b, h| {
            b.iter(|| black_box(classify_all(Some(black_box(h)), None, None)))
        });
    }

    group.finish();
}

// ── Slash years ─────────────────────────────────────────────────────

fn bench_years(c: &mut Criterion) {
    let mut group = c.benchmark_group("holdings/years");

    let cases = [
        ("no_match", 2001, "v.12 no.4"),
        ("short_suffix", 2001, "v.3 (2000/01)"),
        ("full_range", 2000, "v.1 (1999-2000)"),
    ];

    for (name, year, text) in cases {
        group.bench_with_input(BenchmarkId::new("earlier", name), &(year, text), |b, &(y, t)| {
            b.iter(|| black_box(resolve_earlier(black_box(y), black_box(t))))
        });
        group.bench_with_input(BenchmarkId::new("later", name), &(year, text), |b, &(y, t)| {
            b.iter(|| black_box(resolve_later(black_box(y), black_box(t))))
        });
    }

    group.bench_function("start_and_end", |b| {
        b.iter(|| {
            black_box(start_dates_compatible(2001, "2001", 2000, "2000/01"));
            black_box(end_dates_compatible(2000, "2000", 2001, "2000/01"));
        })
    });

    group.finish();
}

// ── Policy resolution ───────────────────────────────────────────────

fn bench_policy(c: &mut Criterion) {
    let mut group = c.benchmark_group("holdings/policy");

    let config = ValidatorConfig::from_json(
        r#"{
            "disqualifying_issues": { "issn_mismatch": 1 },
            "files": { "yale.special.mrk": { "input_fields": { "oclc": "1" } } },
            "programs": {
                "yale": { "file_type": "MARC", "input_fields": { "oclc": "35a" } },
                "harvard": { "input_fields": { "oclc": "B" } }
            },
            "aliases": { "hul": "harvard" }
        }"#,
    )
    .expect("bench config");
    let resolver = PolicyResolver::new(&config);

    for file in ["yale.special.mrk", "yale.2021.mrk", "hul.tsv", "mit.mrk"] {
        group.bench_with_input(BenchmarkId::new("resolve", file), file, |b, f| {
            b.iter(|| black_box(resolver.resolve(black_box(f))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_classify, bench_years, bench_policy);
criterion_main!(benches);
