use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Per-character note source. Seeded sources repeat their patterns exactly.
#[derive(Clone, Debug)]
pub struct PatternRng(ChaCha8Rng);

impl PatternRng {
    pub fn seeded(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(ChaCha8Rng::from_entropy())
    }

    /// `len` lane indices in `0..lanes`, never the same lane twice in a row.
    pub fn make_stream(&mut self, len: usize, lanes: usize) -> Vec<usize> {
        let lanes = lanes.max(2);
        let mut notes = Vec::with_capacity(len);
        let mut last = None;
        for _ in 0..len {
            let mut note = self.0.gen_range(0..lanes);
            while Some(note) == last {
                note = self.0.gen_range(0..lanes);
            }
            notes.push(note);
            last = Some(note);
        }
        notes
    }
}
