use criterion::{criterion_group, criterion_main, Criterion};
use recsift::core::declaration::TypeDeclaration;
use recsift::core::types::RawTable;
use recsift::operators::{filter::filter, Normalizer};

const HEADERS: [&str; 5] = ["Name", "Age", "Date of Admission", "Billing Amount", "Doctor"];

fn make_table(rows: usize) -> RawTable {
    let data = (0..rows)
        .map(|i| {
            vec![
                // every fourth row repeats an earlier name in another case
                if i % 4 == 3 {
                    format!("PERSON {}", i - 1)
                } else {
                    format!("person {i}")
                },
                (18 + i % 70).to_string(),
                format!("2024-{:02}-{:02}", i % 12 + 1, i % 28 + 1),
                format!("{}.25", 100 + i % 5000),
                format!("Dr. {}", i % 40),
            ]
        })
        .collect();
    RawTable::new(HEADERS.iter().map(|h| h.to_string()).collect(), data)
}

fn bench_normalize(c: &mut Criterion) {
    let raw = make_table(10_000);
    let decl = TypeDeclaration::healthcare();
    c.bench_function("normalize_10k", |b| {
        b.iter(|| {
            let _ = Normalizer::new(&decl).run(&raw).unwrap();
        })
    });
}

fn bench_filter(c: &mut Criterion) {
    let decl = TypeDeclaration::healthcare();
    let set = Normalizer::new(&decl).run(&make_table(10_000)).unwrap().records;
    c.bench_function("filter_10k", |b| {
        b.iter(|| {
            let _ = filter(&set, Some("son 12"));
        })
    });
}

criterion_group!(cleaning, bench_normalize, bench_filter);
criterion_main!(cleaning);
