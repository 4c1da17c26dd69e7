//! Stream-level decoder: the state machine moves
//! `Start -> Header -> ChannelHeader -> SubbandChunk -> ChannelTrailer ->
//! (next channel | End)`, tracked here via `header_mask`/`decoded_bands`
//! bookkeeping rather than an explicit state enum, since every state's
//! entry condition is just "the next tag-value pair says so".

use crate::constants::{MAX_CHANNEL_COUNT, MAX_SUBBAND_COUNT};
use crate::error::{CodecError, CodecResult};
use crate::vc5::bitstream::BitstreamReader;
use crate::vc5::channel::ChannelPlanes;
use crate::vc5::header::{self, ParsedHeader};
use crate::vc5::lowpass;
use crate::vc5::parameters::{DecoderParameters, DngTileSource};
use crate::vc5::pixel_format;
use crate::vc5::quantizer;
use crate::vc5::subband;
use crate::vc5::tag::{ChunkType, Tag};
use crate::vc5::wavelet::{inverse_pyramid, Plane};

pub struct DecodedImage {
    /// Pitched raw buffer in `params.output_format`/`params.pitch`, see
    /// `pixel_format::pack_rows`.
    pub bytes: Vec<u8>,
    pub width: usize,
    pub height: usize,
}

/// Full lossless (or quantized, per the stream's own quality) decode of
/// an elementary-profile VC-5 bitstream back into a raw Bayer buffer.
pub fn decode(bytes: &[u8], params: &DecoderParameters) -> CodecResult<DecodedImage> {
    let mut reader = BitstreamReader::new(bytes);
    let header = header::read_header(&mut reader)?;
    if header.channel_count as usize != MAX_CHANNEL_COUNT {
        return Err(CodecError::ImageDimensions);
    }

    let mut channel_planes: Vec<Option<ChannelPlanes>> = (0..MAX_CHANNEL_COUNT).map(|_| None).collect();
    let mut decoded_mask = 0u8;

    for _ in 0..header.channel_count {
        let (channel_index, planes) = crate::vc5::channel::decode_channel(&mut reader)?;
        let idx = channel_index as usize;
        if idx >= MAX_CHANNEL_COUNT || decoded_mask & (1 << idx) != 0 {
            return Err(CodecError::ConsistencyIncompleteChannel);
        }
        decoded_mask |= 1 << idx;
        channel_planes[idx] = Some(planes);
    }
    if decoded_mask != (1u8 << MAX_CHANNEL_COUNT) - 1 {
        return Err(CodecError::ConsistencyIncompleteChannel);
    }

    let end = reader.get_segment()?;
    if Tag::try_from(end.tag)? != Tag::EndMarker {
        return Err(CodecError::BitstreamSyntax);
    }

    let mut planes = Vec::with_capacity(MAX_CHANNEL_COUNT);
    for slot in channel_planes {
        let channel = slot.expect("decoded_mask checked completeness above");
        planes.push(inverse_pyramid(&channel.ll, &channel.highpass));
    }
    let pattern = header.pattern;
    let max_value = (1u32 << header.image.bits_per_component) - 1;
    let component_planes = pixel_format::ComponentPlanes {
        pattern,
        planes: [planes[0].clone(), planes[1].clone(), planes[2].clone(), planes[3].clone()],
    };
    let mosaic = pixel_format::remosaic(&component_planes, max_value as u16)?;

    let width = header.image.width as usize;
    let height = header.image.height as usize;
    let pitch = params
        .pitch
        .unwrap_or_else(|| pixel_format::row_byte_width(width, params.output_format));
    let bytes = pixel_format::pack_rows(&mosaic, width, height, pitch, params.output_format)?;

    Ok(DecodedImage { bytes, width, height })
}

/// Decode the single tile a DNG collaborator holds.
pub fn decode_from_source(source: &dyn DngTileSource, params: &DecoderParameters) -> CodecResult<DecodedImage> {
    if source.tile_count() != 1 {
        return Err(CodecError::ImageDimensions);
    }
    let (_, _, payload) = source.read_tile(0)?;
    decode(&payload, params)
}

/// Per-channel partial reconstruction at a reduced resolution: decodes
/// only the highpass levels needed to reach `levels_needed`, using the
/// channel-size index to jump straight past everything else.
fn decode_channel_partial(reader: &mut BitstreamReader<'_>, levels_needed: usize) -> CodecResult<(u16, Plane)> {
    let channel_header = reader.get_segment()?;
    if Tag::try_from(channel_header.tag)? != Tag::ChannelHeader {
        return Err(CodecError::RequiredParameter);
    }
    let channel_index = channel_header.value;
    let width_seg = reader.get_segment()?;
    let height_seg = reader.get_segment()?;
    if Tag::try_from(width_seg.tag)? != Tag::ImageWidth || Tag::try_from(height_seg.tag)? != Tag::ImageHeight {
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

    let base = reader.tell();
    let ll_data = lowpass::decode_lowpass(reader, width * height)?;
    let mut current = Plane::from_vec(width, height, ll_data);

    let level_dims = [(width * 2, height * 2), (width * 4, height * 4), (width * 8, height * 8)];
    let mut offset = base + sizes[0] as usize;
    for (level_idx, &(full_w, full_h)) in level_dims.iter().enumerate() {
        let (w, h) = (full_w / 2, full_h / 2);
        if level_idx >= levels_needed {
            break;
        }
        let mut bands = Vec::with_capacity(3);
        for k in 0..3 {
            let subband_index = 1 + level_idx * 3 + k;
            reader.seek(offset)?;
            let (_, _prescale, quant) = subband::read_subband_header(reader)?;
            let coeffs = subband::decode_subband(reader, w, h)?;
            let dequant: Vec<i32> = coeffs.iter().map(|&c| quantizer::dequantize(c, quant)).collect();
            bands.push(Plane::from_vec(w, h, dequant));
            offset += sizes[subband_index] as usize;
        }
        let level_result = crate::vc5::wavelet::LevelResult {
            ll: current,
            lh: bands[0].clone(),
            hl: bands[1].clone(),
            hh: bands[2].clone(),
        };
        current = crate::vc5::wavelet::inverse_2d(&level_result);
    }

    let trailer_pos = base + sizes.iter().sum::<u32>() as usize;
    reader.seek(trailer_pos)?;
    let trailer = reader.get_segment()?;
    if Tag::try_from(trailer.tag)? != Tag::ChannelTrailer {
        return Err(CodecError::ConsistencyIncompleteChannel);
    }

    Ok((channel_index, current))
}

pub struct RgbThumbnail {
    pub width: usize,
    pub height: usize,
    /// Interleaved 8-bit R, G, B triples, row-major.
    pub rgb: Vec<u8>,
}

/// Fast RGB preview decode: stops at `params.rgb_resolution`'s pyramid
/// depth per channel instead of reconstructing full resolution.
pub fn decode_rgb_thumbnail(bytes: &[u8], params: &DecoderParameters) -> CodecResult<RgbThumbnail> {
    let mut reader = BitstreamReader::new(bytes);
    let header: ParsedHeader = header::read_header(&mut reader)?;
    let levels_needed = params.rgb_resolution.levels_needed();

    let mut channels: Vec<Option<Plane>> = (0..MAX_CHANNEL_COUNT).map(|_| None).collect();
    let mut decoded_mask = 0u8;
    for _ in 0..header.channel_count {
        let (channel_index, plane) = decode_channel_partial(&mut reader, levels_needed)?;
        let idx = channel_index as usize;
        if idx >= MAX_CHANNEL_COUNT {
            return Err(CodecError::ConsistencyIncompleteChannel);
        }
        decoded_mask |= 1 << idx;
        channels[idx] = Some(plane);
    }
    if decoded_mask != (1u8 << MAX_CHANNEL_COUNT) - 1 {
        return Err(CodecError::ConsistencyIncompleteChannel);
    }

    let planes: Vec<Plane> = channels.into_iter().map(|c| c.unwrap()).collect();
    crate::vc5::thumbnail::combine_rgb(&planes, header.pattern, header.image.bits_per_component, &params.rgb_gain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc5::encoder::encode;
    use crate::vc5::parameters::{EncoderParameters, RgbResolution};
    use crate::vc5::pixel_format::{self, PixelFormat};
    use crate::vc5::quality::Quality;

    fn sample_mosaic(width: usize, height: usize) -> Vec<u16> {
        (0..width * height).map(|i| ((i * 131 + 29) % 4096) as u16).collect()
    }

    fn sample_stream(width: usize, height: usize) -> Vec<u8> {
        let mosaic = sample_mosaic(width, height);
        let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw12).unwrap();
        let params = EncoderParameters {
            input_format: PixelFormat::Raw12,
            quality: Quality::Fs1,
            ..Default::default()
        };
        encode(&raw, width, height, &params).unwrap()
    }

    #[test]
    fn thumbnail_at_each_resolution_decodes_without_error() {
        let bytes = sample_stream(64, 64);
        for resolution in [
            RgbResolution::Sixteenth,
            RgbResolution::Eighth,
            RgbResolution::Quarter,
            RgbResolution::Full,
        ] {
            let params = DecoderParameters {
                rgb_resolution: resolution,
                ..Default::default()
            };
            let thumb = decode_rgb_thumbnail(&bytes, &params).unwrap();
            assert_eq!(thumb.rgb.len(), thumb.width * thumb.height * 3);
        }
    }

    #[test]
    fn thumbnail_resolution_scales_with_pyramid_depth() {
        let bytes = sample_stream(64, 64);
        let sixteenth = decode_rgb_thumbnail(
            &bytes,
            &DecoderParameters {
                rgb_resolution: RgbResolution::Sixteenth,
                ..Default::default()
            },
        )
        .unwrap();
        let full = decode_rgb_thumbnail(
            &bytes,
            &DecoderParameters {
                rgb_resolution: RgbResolution::Full,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(full.width > sixteenth.width);
        assert!(full.height > sixteenth.height);
    }

    #[test]
    fn truncated_stream_is_rejected_not_panicked() {
        let bytes = sample_stream(16, 16);
        let truncated = &bytes[..bytes.len() / 2];
        assert!(decode(truncated, &DecoderParameters::default()).is_err());
    }
}
