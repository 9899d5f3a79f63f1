//! A 32-bit multiplicative hasher tuned for small integer keys.

use core::hash::Hasher;
use core::ops::BitXor;

const K: u32 = 0x9e3779b9;

/// Hasher for voxel grid coordinates.
///
/// Grid coordinates are short sequences of `i32`, so the state is a single `u32`
/// mixed with a rotate/xor/multiply step per word. Unlike the default hashers the
/// result does not depend on the pointer size nor on a random seed.
#[derive(Copy, Clone, Debug, Default)]
pub struct CoordHasher32 {
    hash: u32,
}

impl CoordHasher32 {
    #[inline]
    fn mix(&mut self, word: u32) {
        self.hash = self.hash.rotate_left(5).bitxor(word).wrapping_mul(K);
    }
}

impl Hasher for CoordHasher32 {
    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        let mut chunks = bytes.chunks_exact(4);
        for chunk in &mut chunks {
            self.mix(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));
        }
        for byte in chunks.remainder() {
            self.mix(*byte as u32);
        }
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i);
    }

    #[inline]
    fn write_i32(&mut self, i: i32) {
        self.mix(i as u32);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i as u32);
        self.mix((i >> 32) as u32);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.write_u64(i as u64);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.hash as u64
    }
}
