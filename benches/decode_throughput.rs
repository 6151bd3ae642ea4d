//! Benchmarks for the per-datagram hot path
//!
//! - Decoding the bundled DREF and DATA samples
//! - Decode + apply through the channel store, including text formatting
//! - One strip chart frame, which must not grow with width
//!
//! Platform: Cross-platform (uses bundled sample packets, CI-safe)

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use xplane_monitor::chart::{ChartGeometry, DrawCommand, StripChartBuffer};
use xplane_monitor::protocol::{self, samples};
use xplane_monitor::{ChannelStore, ChannelTable};

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    group.throughput(Throughput::Bytes(samples::DATA_GROUPS.len() as u64));
    group.bench_function("data_six_records", |b| {
        b.iter(|| black_box(protocol::decode(black_box(samples::DATA_GROUPS))))
    });

    group.throughput(Throughput::Bytes(samples::GROUNDSPEED_DREF.len() as u64));
    group.bench_function("dref", |b| {
        b.iter(|| black_box(protocol::decode(black_box(samples::GROUNDSPEED_DREF))))
    });

    group.finish();
}

fn bench_ingest(c: &mut Criterion) {
    let mut store = ChannelStore::new(Arc::new(ChannelTable::builtin()));

    c.bench_function("ingest_data_six_records", |b| {
        b.iter(|| black_box(store.ingest(black_box(samples::DATA_GROUPS))))
    });
}

fn bench_chart_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_frame");

    for width in [100u32, 1_000, 10_000] {
        let mut chart = StripChartBuffer::new(ChartGeometry::new(width, 200));
        chart.configure(6);
        let sample = [0.1f32, -0.2, 0.3, -0.4, 0.5, -0.6];
        let mut commands: Vec<DrawCommand> = Vec::with_capacity(16);

        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| {
                commands.clear();
                chart.push_sample(black_box(&sample)).ok();
                black_box(chart.advance_into(&mut commands))
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_ingest, bench_chart_frame);
criterion_main!(benches);
