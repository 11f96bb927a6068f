//! Benchmarks for MBP reconstruction throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use mbp_reconstructor::{Action, BookEngine, EngineConfig, MboEvent, Side};

fn create_test_events(count: usize) -> Vec<MboEvent> {
    let mut events = Vec::with_capacity(count);
    let base_price: i64 = 5_500_000; // $5.50

    for i in 0..count {
        let order_id = (i + 1) as u64;
        let is_bid = i % 2 == 0;
        let price_offset = ((i % 10) as i64) * 10_000; // $0.01 increments

        let price = if is_bid {
            base_price - price_offset
        } else {
            base_price + 10_000 + price_offset
        };

        let action = match i % 7 {
            0..=4 => Action::Add,
            5 => Action::Cancel,
            _ => Action::Trade,
        };

        events.push(
            MboEvent::new(
                action,
                if is_bid { Side::Bid } else { Side::Ask },
                price,
                ((i % 100) + 1) as u32,
                // Cancels and trades target earlier adds.
                if action == Action::Add {
                    order_id
                } else {
                    order_id.saturating_sub(5)
                },
            )
            .with_sequence(i as u64 + 1),
        );
    }

    events
}

fn bench_engine(c: &mut Criterion) {
    let events = create_test_events(10_000);

    let mut group = c.benchmark_group("reconstruction");
    group.throughput(Throughput::Elements(events.len() as u64));

    group.bench_function("apply_events", |b| {
        b.iter(|| {
            let mut engine = BookEngine::with_config(
                EngineConfig::default().with_logging(false).with_timing(false),
            );
            for event in &events {
                black_box(engine.apply(event));
            }
        })
    });

    group.finish();
}

fn bench_projection(c: &mut Criterion) {
    // Populate a realistic book, then measure the snapshot path alone.
    let events = create_test_events(1_000);
    let mut engine =
        BookEngine::with_config(EngineConfig::default().with_logging(false).with_timing(false));
    for event in &events {
        engine.apply(event);
    }

    let probe = MboEvent::new(Action::Add, Side::Bid, 5_490_000, 10, 1_000_001);

    let mut group = c.benchmark_group("projection");
    group.bench_function("top_levels", |b| {
        b.iter(|| black_box(engine.bid_side().top_levels()))
    });
    group.bench_function("apply_single", |b| {
        b.iter(|| {
            let mut engine = engine.clone();
            black_box(engine.apply(&probe))
        })
    });
    group.finish();
}

fn bench_parser(c: &mut Criterion) {
    let line = "2025-07-17T08:05:03.360677248Z,2025-07-17T08:05:03.360519907Z,160,2,1108,A,B,5.510000,100,0,817593,130,165200,851012,ARL";

    let mut group = c.benchmark_group("parser");
    group.bench_function("parse_mbo_line", |b| {
        b.iter(|| black_box(mbp_reconstructor::parse_mbo_line(black_box(line))))
    });
    group.finish();
}

criterion_group!(benches, bench_engine, bench_projection, bench_parser);
criterion_main!(benches);
