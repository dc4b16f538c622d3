//! Random number generation for the path tracer.
//!
//! A 32-bit xorshift generator plus a fixed codebook of near-unit directions.
//! Image determinism depends on the exact order of draws, so the generator is
//! always passed explicitly and never reseeded while a pixel is in flight.

use fxtrace_math::{Fixed, Vec3, FRAC_BITS};
use rand::{RngCore, SeedableRng};

/// Seed used when none is given, and in place of zero.
pub const DEFAULT_SEED: u32 = 12345;

/// Number of entries in [`UNIT_VECTOR_LUT`]. Indexed by the low 7 bits of a draw.
pub const UNIT_VECTOR_LUT_SIZE: usize = 128;

/// Fractional bits of the codebook entries (8.8).
const LUT_FRAC_BITS: u32 = 8;

/// Near-unit directions at 8.8 precision.
///
/// Only 124 entries are authored; the last four are zero and make the bounce
/// direction collapse onto the surface normal.
#[rustfmt::skip]
pub const UNIT_VECTOR_LUT: [[i16; 3]; UNIT_VECTOR_LUT_SIZE] = [
    [148, 148, 148], [-148, -148, -148],
    [210, 0, 148], [-210, 0, -148],
    [0, 210, 148], [0, -210, -148],
    [148, 210, 0], [-148, -210, 0],
    [256, 0, 0], [-256, 0, 0],
    [0, 256, 0], [0, -256, 0],
    [0, 0, 256], [0, 0, -256],
    [182, 182, 0], [-182, -182, 0],
    [182, 0, 182], [-182, 0, -182],
    [0, 182, 182], [0, -182, -182],
    [102, 102, 226], [-102, -102, -226],
    [102, 226, 102], [-102, -226, -102],
    [226, 102, 102], [-226, -102, -102],
    [128, 128, 182], [-128, -128, -182],
    [128, 182, 128], [-128, -182, -128],
    [182, 128, 128], [-182, -128, -128],
    [48, 252, 39], [-48, -252, -39],
    [252, 39, 48], [-252, -39, -48],
    [39, 48, 252], [-39, -48, -252],
    [156, 195, 5], [-156, -195, -5],
    [195, 5, 156], [-195, -5, -156],
    [5, 156, 195], [-5, -156, -195],
    [70, 70, 238], [-70, -70, -238],
    [70, 238, 70], [-70, -238, -70],
    [238, 70, 70], [-238, -70, -70],
    [217, 86, 98], [-217, -86, -98],
    [86, 98, 217], [-86, -98, -217],
    [98, 217, 86], [-98, -217, -86],
    [239, 48, 78], [-239, -48, -78],
    [48, 78, 239], [-48, -78, -239],
    [78, 239, 48], [-78, -239, -48],
    [180, 34, 193], [-180, 34, -193],
    [34, 193, 180], [-34, -193, -180],
    [193, 180, 34], [-193, -180, -34],
    [45, 210, 160], [-45, -210, -160],
    [210, 160, 45], [-210, -160, -45],
    [160, 45, 210], [-160, -45, -210],
    [125, 230, 70], [-125, -230, -70],
    [230, 70, 125], [-230, -70, -125],
    [70, 125, 230], [-70, -125, -230],
    [190, 200, 20], [-190, -200, -20],
    [200, 20, 190], [-200, -20, -190],
    [20, 190, 200], [-20, -190, -200],
    [95, 215, 140], [-95, -215, -140],
    [215, 140, 95], [-215, -140, -95],
    [140, 95, 215], [-140, -95, -215],
    [60, 180, 230], [-60, -180, -230],
    [180, 230, 60], [-180, -230, -60],
    [230, 60, 180], [-230, -60, -180],
    [130, 200, 150], [-130, -200, -150],
    [200, 150, 130], [-200, -150, -130],
    [150, 130, 200], [-150, -130, -200],
    [85, 145, 240], [-85, -145, -240],
    [145, 240, 85], [-145, -240, -85],
    [240, 85, 145], [-240, -85, -145],
    [170, 100, 220], [-170, -100, -220],
    [100, 220, 170], [-100, -220, -170],
    [220, 170, 100], [-220, -170, -100],
    [66, 210, 195], [-66, -210, -195],
    [210, 195, 66], [-210, -195, -66],
    [195, 66, 210], [-195, -66, -210],
    [110, 180, 210], [-110, -180, -210],
    [0, 0, 0], [0, 0, 0],
    [0, 0, 0], [0, 0, 0],
];

/// 32-bit xorshift generator (shift triple 13, 17, 5).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator. Zero is a fixed point of xorshift and is replaced by
    /// [`DEFAULT_SEED`].
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { DEFAULT_SEED } else { seed };
        Self { state }
    }

    /// Independent stream for one pixel, used when pixels render concurrently.
    pub fn for_pixel(seed: u32, x: u32, y: u32) -> Self {
        let mut h = seed ^ x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
        // murmur3 finalizer
        h ^= h >> 16;
        h = h.wrapping_mul(0x85EB_CA6B);
        h ^= h >> 13;
        h = h.wrapping_mul(0xC2B2_AE35);
        h ^= h >> 16;
        Self::new(h)
    }

    /// Current state word.
    pub fn state(&self) -> u32 {
        self.state
    }

    #[inline]
    fn step(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RngCore for XorShift32 {
    fn next_u32(&mut self) -> u32 {
        self.step()
    }

    fn next_u64(&mut self) -> u64 {
        let hi = self.step() as u64;
        let lo = self.step() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.step().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for XorShift32 {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::new((state as u32) ^ ((state >> 32) as u32))
    }
}

/// Uniform fixed-point value in [0, 1) from the high bits of one draw.
pub fn rand_fixed(rng: &mut dyn RngCore) -> Fixed {
    let draw = rng.next_u32() as u64;
    Fixed::from_raw(((draw << FRAC_BITS) >> 32) as i32)
}

/// Codebook entry selected by the low 7 bits of one draw, at working precision.
pub fn random_unit_vector(rng: &mut dyn RngCore) -> Vec3 {
    let index = (rng.next_u32() & 0x7F) as usize;
    lut_entry(index)
}

/// Codebook entry `index`, rescaled from 8.8 to working precision.
pub fn lut_entry(index: usize) -> Vec3 {
    let [x, y, z] = UNIT_VECTOR_LUT[index];
    let shift = FRAC_BITS - LUT_FRAC_BITS;
    Vec3::from_raw((x as i32) << shift, (y as i32) << shift, (z as i32) << shift)
}

/// Diffuse bounce direction around `normal`.
///
/// Adds a codebook vector to the normal and renormalizes. This is a cheap,
/// biased stand-in for cosine-weighted hemisphere sampling.
pub fn bounce_direction(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    (normal + random_unit_vector(rng)).normalize()
}
