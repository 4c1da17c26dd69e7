//! Per-channel framing: header, the 10-subband chunk sequence (deepest LL
//! then the three highpass triples, shallowest last), the channel-size
//! index that lets a reader skip straight to any subband, and the
//! trailer.

use crate::constants::MAX_SUBBAND_COUNT;
use crate::error::{CodecError, CodecResult};
use crate::vc5::bitstream::{BitstreamReader, BitstreamWriter, ChunkHeader, Segment};
use crate::vc5::lowpass;
use crate::vc5::quantizer::QuantizationVector;
use crate::vc5::subband;
use crate::vc5::tag::{ChunkType, Tag};
use crate::vc5::wavelet::Plane;

/// Byte length of each subband's chunk within a channel, in subband
/// order. Lets a reader (e.g. the thumbnail fast path) seek directly to
/// any subband without decoding the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSizeTable(pub [u32; MAX_SUBBAND_COUNT]);

impl ChannelSizeTable {
    pub fn total_bytes(&self) -> u32 {
        self.0.iter().sum()
    }
}

/// One channel's decomposed coefficient planes: the deepest LL plus the
/// nine highpass bands in `forward_pyramid` order.
pub struct ChannelPlanes {
    pub ll: Plane,
    pub highpass: Vec<Plane>,
}

/// Encode one channel: header, channel-size index (reserved then
/// back-patched), the 10 subband chunks, and the trailer.
pub fn encode_channel(
    writer: &mut BitstreamWriter,
    channel_index: u16,
    planes: &ChannelPlanes,
    quant: &QuantizationVector,
) -> CodecResult<ChannelSizeTable> {
    debug_assert_eq!(planes.highpass.len(), MAX_SUBBAND_COUNT - 1);

    writer.put_segment(Segment::new(Tag::ChannelHeader.required(), channel_index))?;
    writer.put_segment(Segment::new(Tag::ImageWidth.required(), planes.ll.width as u16 * 8))?;
    writer.put_segment(Segment::new(Tag::ImageHeight.required(), planes.ll.height as u16 * 8))?;

    let index_header = ChunkHeader::new(ChunkType::ChannelSizeIndex as u8, MAX_SUBBAND_COUNT as u32)?;
    writer.put_chunk_header(index_header)?;
    let index_pos = writer.tell();
    for _ in 0..MAX_SUBBAND_COUNT {
        writer.put_segment(Segment::new(0, 0))?;
    }

    let mut sizes = [0u32; MAX_SUBBAND_COUNT];

    let start = writer.tell();
    lowpass::encode_lowpass(writer, &planes.ll.data)?;
    sizes[0] = (writer.tell() - start) as u32;

    for (i, band) in planes.highpass.iter().enumerate() {
        let subband_index = i + 1;
        let level = i / 3;
        let start = writer.tell();
        subband::write_subband_header(
            writer,
            subband_index as u16,
            crate::vc5::wavelet::PRESCALE_TABLE[level],
            quant.step(subband_index),
        )?;
        let quantized: Vec<i32> = band
            .data
            .iter()
            .map(|&c| crate::vc5::quantizer::quantize(c, quant.step(subband_index)))
            .collect();
        subband::encode_subband(writer, &quantized, band.width, band.height)?;
        sizes[subband_index] = (writer.tell() - start) as u32;
    }

    // Each size table entry packs the 32-bit byte length across the
    // segment's tag and value halves; these entries are never read back
    // as tag-value pairs, only reassembled into a `u32` in `decode_channel`.
    for (i, size) in sizes.iter().enumerate() {
        writer.patch_segment(index_pos + i * 4, Segment::new((*size >> 16) as i16, (*size & 0xFFFF) as u16))?;
    }

    writer.put_segment(Segment::new(Tag::ChannelTrailer.required(), channel_index))?;

    Ok(ChannelSizeTable(sizes))
}

/// Decode a channel header, size index, and all 10 subbands.
pub fn decode_channel(reader: &mut BitstreamReader<'_>) -> CodecResult<(u16, ChannelPlanes)> {
    let header = reader.get_segment()?;
    if Tag::try_from(header.tag)? != Tag::ChannelHeader {
        return Err(CodecError::RequiredParameter);
    }
    let channel_index = header.value;

    let width_seg = reader.get_segment()?;
    if Tag::try_from(width_seg.tag)? != Tag::ImageWidth {
        return Err(CodecError::RequiredParameter);
    }
    let height_seg = reader.get_segment()?;
    if Tag::try_from(height_seg.tag)? != Tag::ImageHeight {
        return Err(CodecError::RequiredParameter);
    }
    let width = width_seg.value as usize / 8;
    let height = height_seg.value as usize / 8;

    let index_header = reader.get_chunk_header()?;
    if ChunkType::try_from(index_header.chunk_type)? != ChunkType::ChannelSizeIndex {
        return Err(CodecError::InvalidMarker);
    }
    let mut sizes = [0u32; MAX_SUBBAND_COUNT];
    for entry in sizes.iter_mut() {
        let segment = reader.get_segment()?;
        *entry = ((segment.tag as u16 as u32) << 16) | segment.value as u32;
    }

    let subbands_start = reader.tell();
    let ll_data = lowpass::decode_lowpass(reader, width * height)?;
    check_subband_size(reader, subbands_start, sizes[0])?;

    let mut highpass = Vec::with_capacity(MAX_SUBBAND_COUNT - 1);
    // Deepest level first: W/8 x H/8, then W/4 x H/4, then W/2 x H/2,
    // matching `wavelet::forward_pyramid`'s output order.
    let level_dims = [(width / 8, height / 8), (width / 4, height / 4), (width / 2, height / 2)];
    for &(w, h) in level_dims.iter() {
        for k in 0..3 {
            let subband_index = highpass.len() + 1;
            let band_start = reader.tell();
            let (number, _prescale, quant) = subband::read_subband_header(reader)?;
            let coeffs = subband::decode_subband(reader, w, h)?;
            check_subband_size(reader, band_start, sizes[subband_index])?;
            let dequantized: Vec<i32> = coeffs
                .iter()
                .map(|&c| crate::vc5::quantizer::dequantize(c, quant))
                .collect();
            let _ = (number, k);
            highpass.push(Plane::from_vec(w, h, dequantized));
        }
    }

    let trailer = reader.get_segment()?;
    if Tag::try_from(trailer.tag)? != Tag::ChannelTrailer {
        return Err(CodecError::ConsistencyIncompleteChannel);
    }

    let ll = Plane::from_vec(width, height, ll_data);
    Ok((channel_index, ChannelPlanes { ll, highpass }))
}

/// Confirm the bytes actually consumed decoding one subband match the
/// channel-size index's recorded entry for it.
fn check_subband_size(reader: &BitstreamReader<'_>, start: usize, expected: u32) -> CodecResult<()> {
    let actual = (reader.tell() - start) as u32;
    if actual != expected {
        return Err(CodecError::ChannelSizeTable);
    }
    Ok(())
}
