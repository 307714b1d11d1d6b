/// Small deterministic scalar stream used by the explosion generators.
///
/// Each trigger gets its own stream; there is no shared state between streams,
/// so bursts from different notes never correlate. The mixing scheme is
/// mulberry32: one `u32` accumulator, no allocation.
#[derive(Clone, Debug)]
pub struct RandomStream {
    state: u32,
}

impl RandomStream {
    pub fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Stream for one note trigger. The same (note, velocity, entropy) triple
    /// always yields the same sequence within a run.
    pub fn for_trigger(note: i32, velocity: f32, entropy: u32) -> Self {
        Self::new(trigger_seed(note, velocity, entropy))
    }

    /// Next value in [0, 1).
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^= t >> 14;
        // 24 high bits keep the result strictly below 1.0 in f32
        (t >> 8) as f32 / (1u32 << 24) as f32
    }

    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.next_f32()
    }

    /// Symmetric value in [-half, half).
    #[inline]
    pub fn signed(&mut self, half: f32) -> f32 {
        (self.next_f32() - 0.5) * 2.0 * half
    }

    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }
}

pub fn trigger_seed(note: i32, velocity: f32, entropy: u32) -> u32 {
    let vel_q = (velocity.clamp(0.0, 1.0) * 1000.0).round() as u32;
    let mut h = (note as u32).wrapping_mul(0x9E37_79B1);
    h ^= vel_q.wrapping_mul(0x85EB_CA6B);
    h ^= entropy;
    h ^= h >> 16;
    h = h.wrapping_mul(0x7FEB_352D);
    h ^= h >> 15;
    h
}
