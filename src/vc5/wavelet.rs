//! The 2/6 lifting wavelet transform: a two-tap Haar predict step plus a
//! six-tap update correction, applied separably (horizontal pass then
//! vertical pass) to build a 3-level pyramid per channel.
//!
//! Grounded on `jpeg2000/dwt.rs`'s `Dwt53` struct: same shape (a 1-D
//! `forward`/`inverse` pair, lifted into 2-D via row then column passes),
//! generalized to VC-5's lowpass-sum / six-tap-corrected-highpass pair
//! instead of CDF 5/3.
//!
//! The six-tap correction is a pure function of the lowpass array alone
//! (`lowpass[i] = a + b` is computed first and transmitted as-is), so the
//! decoder recomputes it identically from the decoded lowpass band before
//! reconstructing highpass: no rounding asymmetry between encode and
//! decode is possible, and the transform is exactly invertible for any
//! deterministic choice of `correction`.

use crate::constants::MAX_WAVELET_COUNT;

/// Bits each level's lowpass output is pre-shifted by before the next
/// level's analysis, and restored by after the matching inverse level.
/// Kept at zero: the lifting here never overflows the `i32` coefficient
/// storage used internally, so no lossy prescale is needed to stay within
/// a fixed width (see the open-question note in DESIGN.md).
pub const PRESCALE_TABLE: [u16; MAX_WAVELET_COUNT] = [0, 0, 0];

fn clamp_index(i: isize, len: usize) -> usize {
    if i < 0 {
        0
    } else if i as usize >= len {
        len - 1
    } else {
        i as usize
    }
}

fn round_shift(x: i64, shift: u32) -> i32 {
    ((x + (1i64 << (shift - 1))) >> shift) as i32
}

fn correction(lowpass: &[i32], i: usize) -> i32 {
    let len = lowpass.len();
    let l = |offset: isize| -> i64 {
        lowpass[clamp_index(i as isize + offset, len)] as i64
    };
    let acc = l(-2) - l(-1) + 8 * l(0) - 8 * l(1) + l(2) - l(3);
    round_shift(acc, 4)
}

/// Forward 1-D lifting over a row/column of even length `samples.len()`.
/// Returns `(lowpass, highpass)`, each of half the input length.
pub fn forward_1d(samples: &[i32]) -> (Vec<i32>, Vec<i32>) {
    debug_assert_eq!(samples.len() % 2, 0);
    let half = samples.len() / 2;
    let mut lowpass = Vec::with_capacity(half);
    for i in 0..half {
        lowpass.push(samples[2 * i] + samples[2 * i + 1]);
    }
    let mut highpass = Vec::with_capacity(half);
    for i in 0..half {
        let a = samples[2 * i];
        let b = samples[2 * i + 1];
        highpass.push(a - b - correction(&lowpass, i));
    }
    (lowpass, highpass)
}

/// Inverse 1-D lifting: reconstructs the interleaved `(a, b)` pairs from
/// `lowpass`/`highpass` bands of equal length.
pub fn inverse_1d(lowpass: &[i32], highpass: &[i32]) -> Vec<i32> {
    debug_assert_eq!(lowpass.len(), highpass.len());
    let half = lowpass.len();
    let mut out = vec![0i32; half * 2];
    for i in 0..half {
        let diff = highpass[i] + correction(lowpass, i);
        let sum = lowpass[i];
        out[2 * i] = (sum + diff) >> 1;
        out[2 * i + 1] = (sum - diff) >> 1;
    }
    out
}

/// A 2-D plane of `i32` coefficients, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    pub width: usize,
    pub height: usize,
    pub data: Vec<i32>,
}

impl Plane {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    pub fn from_vec(width: usize, height: usize, data: Vec<i32>) -> Self {
        assert_eq!(data.len(), width * height);
        Self {
            width,
            height,
            data,
        }
    }

    pub fn row(&self, y: usize) -> &[i32] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    pub fn column(&self, x: usize) -> Vec<i32> {
        (0..self.height).map(|y| self.data[y * self.width + x]).collect()
    }

    pub fn set_column(&mut self, x: usize, values: &[i32]) {
        for (y, v) in values.iter().enumerate() {
            self.data[y * self.width + x] = *v;
        }
    }
}

/// One level's four subbands: deepest-first order is `[ll, lh, hl, hh]`
/// in the outer pyramid, but a single level only ever produces `ll` (fed
/// to the next level or kept as the final lowpass) plus the three
/// highpass bands.
pub struct LevelResult {
    pub ll: Plane,
    pub lh: Plane,
    pub hl: Plane,
    pub hh: Plane,
}

/// Apply one level of the 2-D transform: horizontal pass over every row,
/// then vertical pass over the resulting half-width columns.
pub fn forward_2d(input: &Plane) -> LevelResult {
    let half_w = input.width / 2;
    let mut row_low = Plane::new(half_w, input.height);
    let mut row_high = Plane::new(half_w, input.height);
    for y in 0..input.height {
        let (lo, hi) = forward_1d(input.row(y));
        row_low.data[y * half_w..(y + 1) * half_w].copy_from_slice(&lo);
        row_high.data[y * half_w..(y + 1) * half_w].copy_from_slice(&hi);
    }

    let half_h = input.height / 2;
    let mut ll = Plane::new(half_w, half_h);
    let mut lh = Plane::new(half_w, half_h);
    let mut hl = Plane::new(half_w, half_h);
    let mut hh = Plane::new(half_w, half_h);
    for x in 0..half_w {
        let (lo, hi) = forward_1d(&row_low.column(x));
        ll.set_column(x, &lo);
        lh.set_column(x, &hi);
        let (lo2, hi2) = forward_1d(&row_high.column(x));
        hl.set_column(x, &lo2);
        hh.set_column(x, &hi2);
    }
    LevelResult { ll, lh, hl, hh }
}

/// Inverse of [`forward_2d`]: reconstructs the full-resolution plane from
/// a level's four subbands.
pub fn inverse_2d(level: &LevelResult) -> Plane {
    let half_w = level.ll.width;
    let half_h = level.ll.height;
    let mut row_low = Plane::new(half_w * 2, half_h);
    let mut row_high = Plane::new(half_w * 2, half_h);
    for x in 0..half_w {
        let lo_col = inverse_1d(&level.ll.column(x), &level.lh.column(x));
        let hi_col = inverse_1d(&level.hl.column(x), &level.hh.column(x));
        for y in 0..half_h * 2 {
            row_low.data[y * row_low.width + x] = lo_col[y];
        }
        for y in 0..half_h * 2 {
            row_high.data[y * row_high.width + x] = hi_col[y];
        }
    }

    let width = half_w * 2;
    let height = half_h * 2;
    let mut out = Plane::new(width, height);
    for y in 0..height {
        let row = inverse_1d(&row_low.row(y)[..half_w], &row_high.row(y)[..half_w]);
        out.data[y * width..(y + 1) * width].copy_from_slice(&row);
    }
    out
}

/// Run the full `MAX_WAVELET_COUNT`-level forward pyramid on a component
/// plane. Returns the deepest LL plus the nine highpass bands, ordered
/// deepest level first (matches subband indices 1..=9 in `channel.rs`).
pub fn forward_pyramid(input: &Plane) -> (Plane, Vec<Plane>) {
    let mut current = input.clone();
    let mut highpass_bands = Vec::with_capacity(MAX_WAVELET_COUNT * 3);
    let mut levels = Vec::with_capacity(MAX_WAVELET_COUNT);
    for _ in 0..MAX_WAVELET_COUNT {
        let level = forward_2d(&current);
        current = level.ll.clone();
        levels.push(level);
    }
    // Deepest level's highpass triple goes first.
    for level in levels.iter().rev() {
        highpass_bands.push(level.lh.clone());
        highpass_bands.push(level.hl.clone());
        highpass_bands.push(level.hh.clone());
    }
    (current, highpass_bands)
}

/// Inverse of [`forward_pyramid`]: reconstructs the full-resolution plane
/// from the deepest LL band and the nine highpass bands (deepest level
/// first, matching `forward_pyramid`'s output order).
pub fn inverse_pyramid(ll: &Plane, highpass_bands: &[Plane]) -> Plane {
    debug_assert_eq!(highpass_bands.len(), MAX_WAVELET_COUNT * 3);
    let mut current = ll.clone();
    for level in 0..MAX_WAVELET_COUNT {
        let base = level * 3;
        let result = LevelResult {
            ll: current,
            lh: highpass_bands[base].clone(),
            hl: highpass_bands[base + 1].clone(),
            hh: highpass_bands[base + 2].clone(),
        };
        current = inverse_2d(&result);
    }
    current
}
