//! Quality presets: a named point on the rate/distortion curve, mapped to
//! a per-subband [`QuantizationVector`]. Subband 0 (the deepest lowpass)
//! is always quantized at 1 regardless of preset, per
//! `quantizer::QuantizationVector` convention.

use crate::constants::MAX_SUBBAND_COUNT;
use crate::vc5::quantizer::QuantizationVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quality {
    Low,
    Medium,
    High,
    Fs1Fast,
    Fs1,
    Fs2,
}

impl Quality {
    /// Returns the six presets ordered coarsest-to-finest.
    pub const ALL: [Quality; 6] = [
        Quality::Low,
        Quality::Medium,
        Quality::High,
        Quality::Fs1Fast,
        Quality::Fs1,
        Quality::Fs2,
    ];

    pub fn quantization_vector(self) -> QuantizationVector {
        // Subbands 1..=3 are the deepest (coarsest-frequency) highpass
        // triple, 4..=6 the middle level, 7..=9 the shallowest (finest
        // detail); shallower levels get coarser quantization since they
        // carry the least visually significant detail per bit spent.
        let (level2, level1, level0) = match self {
            Quality::Low => (4, 6, 8),
            Quality::Medium => (3, 4, 6),
            Quality::High => (2, 3, 4),
            Quality::Fs1Fast => (2, 2, 3),
            Quality::Fs1 => (1, 1, 2),
            Quality::Fs2 => (1, 1, 1),
        };
        let mut steps = [1u16; MAX_SUBBAND_COUNT];
        steps[1..4].fill(level2);
        steps[4..7].fill(level1);
        steps[7..10].fill(level0);
        QuantizationVector(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subband_zero_is_always_lossless() {
        for q in Quality::ALL {
            assert_eq!(q.quantization_vector().step(0), 1);
        }
    }

    #[test]
    fn fs2_is_fully_lossless() {
        let vector = Quality::Fs2.quantization_vector();
        assert!(vector.0.iter().all(|&s| s == 1));
    }

    #[test]
    fn quality_increases_monotonically_in_fineness() {
        let coarsest = Quality::Low.quantization_vector();
        let finest = Quality::Fs2.quantization_vector();
        assert!(finest.is_no_coarser_than(&coarsest));

        let mut previous = Quality::Low.quantization_vector();
        for q in &Quality::ALL[1..] {
            let current = q.quantization_vector();
            assert!(current.is_no_coarser_than(&previous));
            previous = current;
        }
    }
}
