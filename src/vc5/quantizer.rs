//! Midtread scalar quantization of wavelet coefficients.
//!
//! Mirrors `jpeg2000/quantization.rs`'s `quantize_scalar`/`dequantize_scalar`
//! pair but without the dead-zone widening: VC-5 subbands use a plain
//! midtread quantizer, and subband 0 (the deepest lowpass) always carries
//! `quant = 1`, i.e. is never actually quantized.

use crate::constants::MAX_SUBBAND_COUNT;

/// Per-subband quantization step sizes for one channel, in subband order
/// (index 0 is the deepest LL, 1..=9 are the three highpass triples from
/// deepest to shallowest level).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizationVector(pub [u16; MAX_SUBBAND_COUNT]);

impl QuantizationVector {
    pub fn step(&self, subband: usize) -> u16 {
        self.0[subband]
    }

    /// True if every step is monotonically non-increasing relative to
    /// `other`, i.e. `other` is at least as fine everywhere.
    pub fn is_no_coarser_than(&self, other: &QuantizationVector) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(a, b)| a >= b)
    }
}

/// Midtread quantize: `q = sign(c) * (|c| + quant/2) / quant`.
pub fn quantize(coefficient: i32, quant: u16) -> i32 {
    if quant <= 1 {
        return coefficient;
    }
    let q = quant as i32;
    let half = q / 2;
    let magnitude = coefficient.unsigned_abs() as i32;
    let quantized = (magnitude + half) / q;
    if coefficient < 0 {
        -quantized
    } else {
        quantized
    }
}

/// Dequantize: `c = q * quant`. Exact inverse of [`quantize`] up to the
/// rounding already folded into the forward step.
pub fn dequantize(quantized: i32, quant: u16) -> i32 {
    if quant <= 1 {
        return quantized;
    }
    quantized * quant as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lossless_at_unit_quant() {
        for c in [-1000, -1, 0, 1, 4095, -4095] {
            assert_eq!(dequantize(quantize(c, 1), 1), c);
        }
    }

    #[test]
    fn quantize_is_symmetric_in_sign() {
        assert_eq!(quantize(100, 8), -quantize(-100, 8));
        assert_eq!(quantize(0, 8), 0);
    }

    #[test]
    fn dequantize_reconstructs_within_half_step() {
        let quant = 6u16;
        for c in -500..=500 {
            let q = quantize(c, quant);
            let recon = dequantize(q, quant);
            assert!((recon - c).abs() <= quant as i32 / 2 + 1);
        }
    }

    #[test]
    fn coarser_vector_detection() {
        let fine = QuantizationVector([1; MAX_SUBBAND_COUNT]);
        let mut coarse = [2u16; MAX_SUBBAND_COUNT];
        coarse[0] = 1;
        let coarse = QuantizationVector(coarse);
        assert!(fine.is_no_coarser_than(&coarse));
        assert!(!coarse.is_no_coarser_than(&fine));
    }
}
