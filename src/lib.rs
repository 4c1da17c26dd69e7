/*!
# gpr-vc5

A pure Rust implementation of the VC-5 wavelet codec as used by GPR
(GoPro RAW): de-mosaic a Bayer sensor image into four component planes,
run a 3-level 2/6 lifting wavelet transform over each, entropy-code the
quantized coefficients, and frame the result as a tag-value bitstream.
The inverse path reconstructs the mosaic exactly at lossless quality, or
decodes a fast low-resolution RGB preview without touching the deeper
highpass subbands at all.

Container format (DNG), metadata, and JPEG preview generation are out of
scope for this crate; callers own the wrapping file format and hand this
crate a pitched raw byte buffer plus dimensions and pixel format, either
directly or through the [`vc5::parameters::DngTileSink`] /
[`vc5::parameters::DngTileSource`] collaborator traits.

## Modules
- [`vc5::bitstream`]: tag-value segments, chunk framing, bit-level I/O.
- [`vc5::codebook`]: the codeset-17 run/magnitude/band-end prefix code.
- [`vc5::wavelet`]: the 2/6 lifting transform, 1-D and 2-D.
- [`vc5::quantizer`] / [`vc5::quality`]: scalar quantization and presets.
- [`vc5::subband`] / [`vc5::lowpass`]: per-subband entropy coding.
- [`vc5::channel`] / [`vc5::header`]: per-channel and stream framing.
- [`vc5::pixel_format`]: Bayer pack/unpack and de-mosaic/re-mosaic.
- [`vc5::encoder`] / [`vc5::decoder`]: the full stream pipelines.
- [`vc5::thumbnail`]: fast RGB preview combination.
*/

pub mod constants;
pub mod error;
pub mod vc5;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use error::{CodecError, CodecResult};
pub use vc5::decoder::{decode, decode_from_source, decode_rgb_thumbnail, DecodedImage, RgbThumbnail};
pub use vc5::encoder::{encode, encode_to_sink};
pub use vc5::parameters::{DecoderParameters, DngTileSink, DngTileSource, EncoderParameters, InMemoryTileStore};
pub use vc5::pixel_format::{BayerPattern, PixelFormat};
pub use vc5::quality::Quality;

#[cfg(test)]
mod tests {
    use super::*;
    use vc5::pixel_format;

    #[test]
    fn encode_decode_roundtrips_at_full_speed2() {
        let width = 32;
        let height = 32;
        let mosaic: Vec<u16> = (0..width * height).map(|i| ((i * 71 + 5) % 4096) as u16).collect();
        let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw12).unwrap();
        let params = EncoderParameters {
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
    }

    #[test]
    fn encode_to_sink_decode_from_source_roundtrips_through_a_dng_collaborator() {
        let width = 16;
        let height = 16;
        let mosaic: Vec<u16> = (0..width * height).map(|i| ((i * 53 + 1) % 4096) as u16).collect();
        let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw16).unwrap();
        let params = EncoderParameters {
            input_format: PixelFormat::Raw16,
            quality: Quality::Fs2,
            ..Default::default()
        };
        let mut store = InMemoryTileStore::new();
        encode_to_sink(&raw, width, height, &params, &mut store).unwrap();

        let decoder_params = DecoderParameters {
            output_format: PixelFormat::Raw16,
            ..Default::default()
        };
        let decoded = decode_from_source(&store, &decoder_params).unwrap();
        let decoded_mosaic = pixel_format::unpack_samples(&decoded.bytes, width * height, PixelFormat::Raw16).unwrap();
        assert_eq!(decoded_mosaic, mosaic);
    }
}
