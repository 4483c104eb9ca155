//! Criterion benchmarks for delimited-text loading.
//!
//! Measures tokenizing and validating synthetic observation files of
//! increasing size.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package zipstats-data
//! ```

use std::fmt::Write as _;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use zipstats_core::RegionStoreBuilder;
use zipstats_data::{ByteSource, RowTokenizer, SourceFormat, load_observations};

const ROW_COUNTS: &[usize] = &[1_000, 10_000];

fn observation_file(rows: usize) -> String {
    let mut text = String::from(
        "zip_code,etl_timestamp,partially_vaccinated,fully_vaccinated,NEG,POS,deaths,hospitalized,boosted\n",
    );
    for index in 0..rows {
        let zip = 19_100 + index % 50;
        let day = 1 + index % 28;
        let _ = writeln!(
            text,
            "{zip},2021-05-{day:02} 17:20:02,{index},{},\"{}\",2,0,1,{}",
            index / 2,
            index % 3,
            index % 7
        );
    }
    text
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for &rows in ROW_COUNTS {
        let input = observation_file(rows);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let mut tokenizer = RowTokenizer::new(ByteSource::new(input.as_bytes()));
                let mut count = 0_usize;
                while let Ok(Some(row)) = tokenizer.next_row() {
                    count += row.len();
                }
                count
            });
        });
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_observations");
    for &rows in ROW_COUNTS {
        let input = observation_file(rows);
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::from_parameter(rows), &input, |b, input| {
            b.iter(|| {
                let mut builder = RegionStoreBuilder::new();
                load_observations(input.as_bytes(), SourceFormat::DelimitedText, &mut builder)
                    .map(|summary| summary.rows_accepted)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tokenize, bench_load);
criterion_main!(benches);
