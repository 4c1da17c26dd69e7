//! Fixed-precision encoding of the deepest lowpass (subband 0) band.
//!
//! Unlike the highpass subbands, the LL band is dense (few if any zeros),
//! so run-length coding buys nothing; it is written as a row-major array
//! of fixed-width unsigned values instead, preceded by a tag giving the
//! bit width actually used. `quant` for this subband is always 1 per
//! `quantizer::QuantizationVector` convention, so these values are the
//! lossless lowpass coefficients.

use crate::error::{CodecError, CodecResult};
use crate::vc5::bitstream::{BitstreamReader, BitstreamWriter, Segment};
use crate::vc5::tag::Tag;

pub const MIN_PRECISION: u32 = 8;
pub const MAX_PRECISION: u32 = 32;

fn bits_needed(max_value: u32) -> u32 {
    if max_value == 0 {
        MIN_PRECISION
    } else {
        (32 - max_value.leading_zeros()).max(MIN_PRECISION)
    }
}

/// Encode the lowpass band. Every value must be non-negative (the
/// deepest LL band holds DC-like sums, never negative by construction of
/// the forward transform).
pub fn encode_lowpass(writer: &mut BitstreamWriter, coefficients: &[i32]) -> CodecResult<()> {
    let mut max_value = 0u32;
    for &c in coefficients {
        if c < 0 {
            return Err(CodecError::LowpassValue);
        }
        max_value = max_value.max(c as u32);
    }
    let precision = bits_needed(max_value);
    if precision > MAX_PRECISION {
        return Err(CodecError::LowpassPrecision);
    }
    writer.put_segment(Segment::new(Tag::MaxBitsPerComponent.required(), precision as u16))?;
    for &c in coefficients {
        writer.write_bits(c as u32, precision);
    }
    writer.align_to_segment();
    Ok(())
}

pub fn decode_lowpass(reader: &mut BitstreamReader<'_>, count: usize) -> CodecResult<Vec<i32>> {
    let header = reader.get_segment()?;
    if Tag::try_from(header.tag)? != Tag::MaxBitsPerComponent {
        return Err(CodecError::RequiredParameter);
    }
    let precision = header.value as u32;
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(CodecError::LowpassPrecision);
    }
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        out.push(reader.read_bits(precision)? as i32);
    }
    reader.align_to_segment();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_typical_lowpass_values() {
        let coeffs: Vec<i32> = (0..64).map(|i| (i * 211) % 40000).collect();
        let mut writer = BitstreamWriter::new();
        encode_lowpass(&mut writer, &coeffs).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(decode_lowpass(&mut reader, coeffs.len()).unwrap(), coeffs);
    }

    #[test]
    fn all_zero_lowpass_uses_minimum_precision() {
        let coeffs = vec![0i32; 16];
        let mut writer = BitstreamWriter::new();
        encode_lowpass(&mut writer, &coeffs).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(decode_lowpass(&mut reader, 16).unwrap(), coeffs);
    }

    #[test]
    fn negative_lowpass_value_is_rejected() {
        let coeffs = vec![-1i32];
        let mut writer = BitstreamWriter::new();
        assert_eq!(encode_lowpass(&mut writer, &coeffs), Err(CodecError::LowpassValue));
    }

    #[test]
    fn out_of_range_precision_tag_is_rejected() {
        let mut writer = BitstreamWriter::new();
        writer.put_segment(Segment::new(Tag::MaxBitsPerComponent.required(), 3)).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(decode_lowpass(&mut reader, 1), Err(CodecError::LowpassPrecision));
    }
}
