use criterion::{black_box, criterion_group, criterion_main, Criterion, SamplingMode};

use oxchess::board::Board;
use oxchess::perft::perft;

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";
const POSITION_3_FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";

pub fn bench_perft_start_4(c: &mut Criterion) {
    c.bench_function("perft start depth 4", |b| {
        b.iter(|| {
            let mut board = Board::new();
            perft(&mut board, black_box(4))
        })
    });
}

pub fn bench_perft_kiwipete_3(c: &mut Criterion) {
    c.bench_function("perft kiwipete depth 3", |b| {
        b.iter(|| {
            let mut board = Board::from_fen(KIWIPETE_FEN).unwrap();
            perft(&mut board, black_box(3))
        })
    });
}

pub fn bench_perft_position_3_depth_5(c: &mut Criterion) {
    c.bench_function("perft position 3 depth 5", |b| {
        b.iter(|| {
            let mut board = Board::from_fen(POSITION_3_FEN).unwrap();
            perft(&mut board, black_box(5))
        })
    });
}

pub fn bench_perft_start_5(c: &mut Criterion) {
    let mut group = c.benchmark_group("flat-sampling");
    group.sample_size(10);
    group.sampling_mode(SamplingMode::Flat);
    group.bench_function("perft start depth 5", |b| {
        b.iter(|| {
            let mut board = Board::new();
            perft(&mut board, black_box(5))
        })
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_perft_start_4,
    bench_perft_kiwipete_3,
    bench_perft_position_3_depth_5,
    bench_perft_start_5,
);
criterion_main!(benches);
