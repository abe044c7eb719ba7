use criterion::{black_box, criterion_group, criterion_main, Criterion};
use raytris::core::{Board, HandlingSettings, InputFrame, Playfield, Session};
use raytris::term::{encode_diff_into, GameView, Viewport};
use raytris::types::{Tetromino, HEIGHT};

fn bench_update(c: &mut Criterion) {
    let settings = HandlingSettings::default();
    let mut field = Playfield::with_seed(12345);
    let idle = InputFrame::idle();

    c.bench_function("playfield_update_idle", |b| {
        b.iter(|| {
            if field.lost() {
                field.restart();
            }
            field.update(black_box(&idle), &settings);
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let settings = HandlingSettings::default();
    let mut field = Playfield::with_seed(12345);
    let drop = InputFrame {
        hard_drop: true,
        ..InputFrame::idle()
    };

    c.bench_function("hard_drop_cycle", |b| {
        b.iter(|| {
            if field.lost() {
                field.restart();
            }
            field.update(black_box(&drop), &settings);
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            for y in HEIGHT - 4..HEIGHT {
                board.fill_row_except(y, &[], Tetromino::I);
            }
            black_box(board.clear_full_rows());
        })
    });
}

fn bench_ghost(c: &mut Criterion) {
    let field = Playfield::with_seed(12345);

    c.bench_function("ghost_piece", |b| {
        b.iter(|| black_box(field.ghost_piece()))
    });
}

fn bench_render_diff(c: &mut Criterion) {
    let session = Session::new(Playfield::with_seed(12345));
    let view = GameView::default();
    let viewport = Viewport::new(80, 24);
    let prev = view.render(&session, viewport);
    let next = view.render(&session, viewport);
    let mut out = Vec::with_capacity(4096);

    c.bench_function("render_diff_unchanged", |b| {
        b.iter(|| {
            out.clear();
            encode_diff_into(black_box(&prev), black_box(&next), &mut out).ok();
        })
    });
}

criterion_group!(
    benches,
    bench_update,
    bench_hard_drop,
    bench_line_clear,
    bench_ghost,
    bench_render_diff
);
criterion_main!(benches);
