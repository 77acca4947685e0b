use criterion::{Criterion, black_box, criterion_group, criterion_main};
use shelf_slots::{GridModel, MergedSlot, SlotRegistry, compress, decompress};

/// Largest shelf the settings editor allows, with every other pair merged.
fn wide_shelf() -> (GridModel, Vec<MergedSlot>) {
    let grid = GridModel::new(20, 20, 1, "A").expect("grid");
    let merges = (0..20u16)
        .flat_map(|row| (0..20u16).step_by(4).map(move |col| (row, col)))
        .map(|(row, col)| MergedSlot::new(grid.slot_number_at(row, col), 2))
        .collect();
    (grid, merges)
}

fn codec_round_trip(c: &mut Criterion) {
    let (grid, merges) = wide_shelf();
    c.bench_function("codec_round_trip_20x20", |b| {
        b.iter(|| {
            let registry = decompress(&grid, black_box(&merges)).expect("decompress");
            black_box(compress(&registry));
        });
    });
}

fn resize_sweep(c: &mut Criterion) {
    let (grid, _) = wide_shelf();
    let base = SlotRegistry::initialize(grid, &[]).expect("registry");
    c.bench_function("resize_sweep_20x20", |b| {
        b.iter(|| {
            let mut registry = base.clone();
            for row in 0..20 {
                let id = registry.slot_at(row, 0).expect("slot").id();
                for span in (1..=20).chain((1..20).rev()) {
                    registry.resize(id, black_box(span)).expect("resize");
                }
            }
            black_box(registry.len());
        });
    });
}

fn move_sweep(c: &mut Criterion) {
    let (grid, merges) = wide_shelf();
    let base = decompress(&grid, &merges).expect("registry");
    c.bench_function("move_attempts_20x20", |b| {
        b.iter(|| {
            let mut registry = base.clone();
            let id = registry.slot_at(0, 0).expect("slot").id();
            for row in 0..20 {
                for col in 0..20 {
                    let _ = registry.move_slot(id, black_box(row), black_box(col));
                }
            }
        });
    });
}

criterion_group!(benches, codec_round_trip, resize_sweep, move_sweep);
criterion_main!(benches);
