use rand::RngCore;

/// A random source that returns the same word forever.
pub(crate) struct ConstRng(pub u64);

impl ConstRng {
    /// Every `f64` draw is just below 1.0.
    pub fn high() -> Self {
        Self(u64::MAX)
    }

    /// Every `f64` draw is exactly 0.0.
    pub fn low() -> Self {
        Self(0)
    }
}

impl RngCore for ConstRng {
    fn next_u32(&mut self) -> u32 {
        (self.0 >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.0
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        for chunk in dst.chunks_mut(8) {
            let bytes = self.0.to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }
}
