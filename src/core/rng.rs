// Copyright @yucwang 2026

use crate::math::constants::Float;

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() as Float) / (u32::MAX as Float)
    }

    /// Uniform integer in `[0, bound)`; `bound` of zero yields zero.
    pub fn next_below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        (((self.next_u32() as u64) * (bound as u64)) >> 32) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::LcgRng;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = LcgRng::new(42);
        let mut b = LcgRng::new(42);
        for _ in 0..64 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_next_below_in_range() {
        let mut rng = LcgRng::new(7);
        let mut seen_last = false;
        for _ in 0..10000 {
            let v = rng.next_below(13);
            assert!(v < 13);
            seen_last |= v == 12;
        }
        assert!(seen_last);
        assert_eq!(rng.next_below(0), 0);
    }
}
