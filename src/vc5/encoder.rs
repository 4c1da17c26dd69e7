//! Stream-level encoder: de-mosaic, wavelet-transform, and entropy-code a
//! full Bayer mosaic into a complete VC-5 elementary-profile bitstream.

use crate::constants::MAX_CHANNEL_COUNT;
use crate::error::CodecResult;
use crate::vc5::bitstream::BitstreamWriter;
use crate::vc5::channel::{self, ChannelPlanes};
use crate::vc5::header::{self, ImageHeader};
use crate::vc5::parameters::{DngTileSink, EncoderParameters};
use crate::vc5::pixel_format::{self, ComponentPlanes};
use crate::vc5::wavelet::forward_pyramid;

/// Encode a raw pitched Bayer buffer (`params.input_format`/`params.pitch`,
/// see `pixel_format::unpack_rows`) into a complete VC-5 bitstream.
pub fn encode(raw: &[u8], width: usize, height: usize, params: &EncoderParameters) -> CodecResult<Vec<u8>> {
    let pitch = params.pitch.unwrap_or_else(|| pixel_format::row_byte_width(width, params.input_format));
    let mosaic = pixel_format::unpack_rows(raw, width, height, pitch, params.input_format)?;
    let component_planes = pixel_format::demosaic(&mosaic, width, height, params.pattern)?;
    let quant = params.quality.quantization_vector();

    let mut writer = BitstreamWriter::new();
    header::write_start_marker(&mut writer)?;
    header::write_image_header(
        &mut writer,
        ImageHeader {
            width: width as u16,
            height: height as u16,
            bits_per_component: params.input_format.bits_per_component(),
        },
        params.input_format,
        params.pattern,
    )?;

    for (index, plane) in component_planes.planes.iter().enumerate() {
        let (ll, highpass) = forward_pyramid(plane);
        let planes = ChannelPlanes { ll, highpass };
        channel::encode_channel(&mut writer, index as u16, &planes, &quant)?;
    }

    header::write_end_marker(&mut writer)?;
    Ok(writer.into_bytes())
}

/// Convenience wrapper bundling the component planes alongside the
/// pattern, for callers that want to inspect them before encoding (e.g.
/// the thumbnail preview path, which re-derives planes from the decoder
/// instead).
pub fn demosaic_for_encode(raw: &[u8], width: usize, height: usize, params: &EncoderParameters) -> CodecResult<ComponentPlanes> {
    let pitch = params.pitch.unwrap_or_else(|| pixel_format::row_byte_width(width, params.input_format));
    let mosaic = pixel_format::unpack_rows(raw, width, height, pitch, params.input_format)?;
    pixel_format::demosaic(&mosaic, width, height, params.pattern)
}

/// Encode and hand the single resulting tile to a DNG collaborator
/// instead of returning the byte buffer directly.
pub fn encode_to_sink(
    raw: &[u8],
    width: usize,
    height: usize,
    params: &EncoderParameters,
    sink: &mut dyn DngTileSink,
) -> CodecResult<()> {
    let payload = encode(raw, width, height, params)?;
    sink.write_tile(0, 0, &payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vc5::decoder::decode;
    use crate::vc5::parameters::{DecoderParameters, InMemoryTileStore};
    use crate::vc5::pixel_format::{self, BayerPattern, PixelFormat};
    use crate::vc5::quality::Quality;

    fn sample_mosaic(width: usize, height: usize) -> Vec<u16> {
        (0..width * height).map(|i| ((i * 191 + 13) % 4096) as u16).collect()
    }

    fn sample_raw(width: usize, height: usize, format: PixelFormat) -> Vec<u8> {
        pixel_format::pack_samples(&sample_mosaic(width, height), format).unwrap()
    }

    #[test]
    fn encode_produces_segment_aligned_stream() {
        let width = 64;
        let height = 64;
        let raw = sample_raw(width, height, PixelFormat::Raw12);
        let params = EncoderParameters {
            pattern: BayerPattern::Rggb,
            input_format: PixelFormat::Raw12,
            quality: Quality::Fs2,
            ..Default::default()
        };
        let bytes = encode(&raw, width, height, &params).unwrap();
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn lossless_quality_roundtrips_exactly() {
        let width = 32;
        let height = 32;
        let mosaic = sample_mosaic(width, height);
        let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw12).unwrap();
        let params = EncoderParameters {
            pattern: BayerPattern::Rggb,
            input_format: PixelFormat::Raw12,
            quality: Quality::Fs2,
            ..Default::default()
        };
        let bytes = encode(&raw, width, height, &params).unwrap();
        let decoder_params = DecoderParameters {
            output_format: PixelFormat::Raw12,
            ..Default::default()
        };
        let decoded = decode(&bytes, &decoder_params).unwrap();
        let decoded_mosaic = pixel_format::unpack_samples(&decoded.bytes, width * height, PixelFormat::Raw12).unwrap();
        assert_eq!(decoded_mosaic, mosaic);
        assert_eq!(decoded.width, width);
        assert_eq!(decoded.height, height);
    }

    #[test]
    fn encode_to_sink_and_decode_from_source_roundtrip() {
        let width = 16;
        let height = 16;
        let mosaic = sample_mosaic(width, height);
        let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw16).unwrap();
        let params = EncoderParameters {
            input_format: PixelFormat::Raw16,
            quality: Quality::Fs2,
            ..Default::default()
        };
        let mut store = InMemoryTileStore::new();
        encode_to_sink(&raw, width, height, &params, &mut store).unwrap();
        assert_eq!(store.tile_count(), 1);

        let decoder_params = DecoderParameters {
            output_format: PixelFormat::Raw16,
            ..Default::default()
        };
        let decoded = crate::vc5::decoder::decode_from_source(&store, &decoder_params).unwrap();
        let decoded_mosaic = pixel_format::unpack_samples(&decoded.bytes, width * height, PixelFormat::Raw16).unwrap();
        assert_eq!(decoded_mosaic, mosaic);
    }
}
