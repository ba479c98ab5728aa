use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::color::Rgb;
use crate::vertex::VERTEX_COUNT;

/// Seed used by the demo so every run shows the same sequence of colors.
pub const DEFAULT_SEED: u64 = 428;

/// `#f6a509`, `#cb2dde`, `#0eeed1`, `#068918`
pub const INITIAL_PALETTE: [Rgb; VERTEX_COUNT] = [
    Rgb::new(246.0 / 255.0, 165.0 / 255.0, 9.0 / 255.0),
    Rgb::new(203.0 / 255.0, 45.0 / 255.0, 222.0 / 255.0),
    Rgb::new(14.0 / 255.0, 238.0 / 255.0, 209.0 / 255.0),
    Rgb::new(6.0 / 255.0, 137.0 / 255.0, 24.0 / 255.0),
];

pub const WHITE_PALETTE: [Rgb; VERTEX_COUNT] = [Rgb::WHITE; VERTEX_COUNT];

/// Source of random vertex palettes.
pub struct PaletteGenerator<R: Rng = Xoshiro256PlusPlus> {
    rng: R,
}

impl PaletteGenerator {
    pub fn from_seed(seed: u64) -> Self {
        Self::new(Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<R: Rng> PaletteGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    pub fn next_color(&mut self) -> Rgb {
        Rgb::new(
            self.rng.gen_range(0.0..=1.0),
            self.rng.gen_range(0.0..=1.0),
            self.rng.gen_range(0.0..=1.0),
        )
    }

    pub fn next_palette(&mut self) -> [Rgb; VERTEX_COUNT] {
        [
            self.next_color(),
            self.next_color(),
            self.next_color(),
            self.next_color(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_palette_matches_hex() {
        let hex = ["#f6a509", "#cb2dde", "#0eeed1", "#068918"];

        for (c, h) in INITIAL_PALETTE.iter().zip(hex) {
            assert_eq!(*c, Rgb::from_hex(h).unwrap());
        }
    }

    #[test]
    fn seeded_palettes_repeat() {
        let mut a = PaletteGenerator::from_seed(DEFAULT_SEED);
        let mut b = PaletteGenerator::from_seed(DEFAULT_SEED);

        for _ in 0..5 {
            assert_eq!(a.next_palette(), b.next_palette());
        }
    }

    #[test]
    fn palettes_are_normalized() {
        let mut generator = PaletteGenerator::from_seed(7);

        for _ in 0..100 {
            for c in generator.next_palette() {
                for ch in [c.r, c.g, c.b] {
                    assert!((0.0..=1.0).contains(&ch));
                }
            }
        }
    }

    #[test]
    fn accepts_any_rng() {
        let mut generator = PaletteGenerator::new(rand::rngs::SmallRng::seed_from_u64(1));

        let c = generator.next_color();
        assert!([c.r, c.g, c.b].iter().all(|ch| (0.0..=1.0).contains(ch)));
    }
}
