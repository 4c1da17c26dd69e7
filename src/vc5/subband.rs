//! Subband entropy coding: row-major run-length + magnitude + sign over a
//! quantized coefficient plane, terminated by a band-end marker and
//! padded to the next segment boundary (the "band trailer").

use crate::constants::part;
use crate::error::{CodecError, CodecResult};
use crate::vc5::bitstream::{BitstreamReader, BitstreamWriter};
use crate::vc5::codebook::{self, Symbol};
use crate::vc5::tag::Tag;

/// Encode one subband's coefficients. `width * height` must equal
/// `coefficients.len()`.
pub fn encode_subband(writer: &mut BitstreamWriter, coefficients: &[i32], width: usize, height: usize) -> CodecResult<()> {
    if coefficients.len() != width * height {
        return Err(CodecError::BandOverfull);
    }
    let mut run = 0u32;
    for &c in coefficients {
        if c == 0 {
            run += 1;
            continue;
        }
        if run > 0 {
            codebook::write_run(writer, run);
            run = 0;
        }
        let magnitude = c.unsigned_abs();
        codebook::write_magnitude(writer, magnitude);
        writer.write_bit(if c < 0 { 1 } else { 0 });
    }
    if run > 0 {
        codebook::write_run(writer, run);
    }
    codebook::write_band_end(writer);
    writer.align_to_segment();
    Ok(())
}

/// Decode one subband's coefficients. Returns an error if the band-end
/// marker is reached with too few or too many coefficients produced.
pub fn decode_subband(reader: &mut BitstreamReader<'_>, width: usize, height: usize) -> CodecResult<Vec<i32>> {
    let expected = width * height;
    let mut out = Vec::with_capacity(expected);
    loop {
        match codebook::decode_symbol(reader)? {
            Symbol::Run(run) => {
                if out.len() as u64 + run as u64 > expected as u64 {
                    return Err(CodecError::BandOverfull);
                }
                out.resize(out.len() + run as usize, 0);
            }
            Symbol::Magnitude(magnitude) => {
                if out.len() >= expected {
                    return Err(CodecError::BandOverfull);
                }
                let sign = if magnitude != 0 { reader.read_bit()? } else { 0 };
                let value = if sign == 1 { -(magnitude as i32) } else { magnitude as i32 };
                out.push(value);
            }
            Symbol::BandEnd => break,
        }
    }
    if out.len() != expected {
        return Err(CodecError::BandUnderfull);
    }
    reader.align_to_segment();
    Ok(out)
}

/// Write the tag-value pairs that precede a highpass subband's payload:
/// its index within the channel, the prescale shift its level's lowpass
/// was already pre-shifted by (see [`crate::vc5::wavelet::PRESCALE_TABLE`]),
/// and the quantization step it was coded with.
pub fn write_subband_header(writer: &mut BitstreamWriter, subband_index: u16, prescale: u16, quant: u16) -> CodecResult<()> {
    use crate::vc5::bitstream::Segment;
    writer.put_segment(Segment::new(Tag::SubbandNumber.required(), subband_index))?;
    writer.put_segment(Segment::new(Tag::SubbandPrescale.required(), prescale))?;
    writer.put_segment(Segment::new(Tag::SubbandQuantization.required(), quant))?;
    Ok(())
}

pub fn read_subband_header(reader: &mut BitstreamReader<'_>) -> CodecResult<(u16, u16, u16)> {
    let number = reader.get_segment()?;
    if Tag::try_from(number.tag)? != Tag::SubbandNumber {
        return Err(CodecError::RequiredParameter);
    }
    let prescale = reader.get_segment()?;
    if Tag::try_from(prescale.tag)? != Tag::SubbandPrescale {
        return Err(CodecError::RequiredParameter);
    }
    let quant = reader.get_segment()?;
    if Tag::try_from(quant.tag)? != Tag::SubbandQuantization {
        return Err(CodecError::RequiredParameter);
    }
    Ok((number.value, prescale.value, quant.value))
}

/// Guard against `enabled_parts` lacking the elementary bit, which every
/// subband operation in this module assumes is set.
pub fn require_elementary_part(enabled_parts: u32) -> CodecResult<()> {
    if enabled_parts & (1 << part::ELEMENTARY) == 0 {
        return Err(CodecError::EnabledParts);
    }
    Ok(())
}
