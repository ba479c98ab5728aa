use criterion::{criterion_group, criterion_main, Criterion};

use rectangle::palette::{PaletteGenerator, DEFAULT_SEED, INITIAL_PALETTE};
use rectangle::{ColorAnimation, FRAME_LIMIT};

pub fn full_transition(c: &mut Criterion) {
    let target = PaletteGenerator::from_seed(DEFAULT_SEED).next_palette();

    c.bench_function("full_transition", |b| {
        b.iter(|| {
            let mut animation = ColorAnimation::new(INITIAL_PALETTE);
            animation.start(INITIAL_PALETTE, target);

            for _ in 0..FRAME_LIMIT {
                animation.advance();
            }

            animation.frame_count()
        })
    });
}

criterion_group!(benches, full_transition);
criterion_main!(benches);
