//! Integration tests for the full VC-5 encode/decode pipeline, exercised
//! only through the crate's public API.

use gpr_vc5::vc5::pixel_format;
use gpr_vc5::{decode, decode_rgb_thumbnail, encode, BayerPattern, DecoderParameters, EncoderParameters, PixelFormat, Quality};

fn sample_mosaic(width: usize, height: usize, seed: usize) -> Vec<u16> {
    (0..width * height).map(|i| (((i + seed) * 97 + 11) % 4096) as u16).collect()
}

fn sample_raw(width: usize, height: usize, seed: usize, format: PixelFormat) -> Vec<u8> {
    pixel_format::pack_samples(&sample_mosaic(width, height, seed), format).unwrap()
}

#[test]
fn full_roundtrip_at_every_quality_preset() {
    let width = 48;
    let height = 32;
    let mosaic = sample_mosaic(width, height, 7);
    let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw12).unwrap();

    for quality in [
        Quality::Low,
        Quality::Medium,
        Quality::High,
        Quality::Fs1Fast,
        Quality::Fs1,
        Quality::Fs2,
    ] {
        let params = EncoderParameters {
            pattern: BayerPattern::Rggb,
            input_format: PixelFormat::Raw12,
            quality,
            ..Default::default()
        };
        let encoded = encode(&raw, width, height, &params).expect("encode should succeed");
        let decoder_params = DecoderParameters {
            output_format: PixelFormat::Raw12,
            ..Default::default()
        };
        let decoded = decode(&encoded, &decoder_params).expect("decode should succeed");
        assert_eq!(decoded.width, width);
        assert_eq!(decoded.height, height);
        if matches!(quality, Quality::Fs2) {
            let decoded_mosaic = pixel_format::unpack_samples(&decoded.bytes, width * height, PixelFormat::Raw12).unwrap();
            assert_eq!(decoded_mosaic, mosaic, "Fs2 must reconstruct exactly");
        }
    }
}

#[test]
fn gbrg_pattern_roundtrips_losslessly() {
    let width = 40;
    let height = 24;
    let mosaic = sample_mosaic(width, height, 3);
    let raw = pixel_format::pack_samples(&mosaic, PixelFormat::Raw14).unwrap();
    let params = EncoderParameters {
        pattern: BayerPattern::Gbrg,
        input_format: PixelFormat::Raw14,
        quality: Quality::Fs2,
        ..Default::default()
    };
    let encoded = encode(&raw, width, height, &params).unwrap();
    let decoder_params = DecoderParameters {
        output_format: PixelFormat::Raw14,
        ..Default::default()
    };
    let decoded = decode(&encoded, &decoder_params).unwrap();
    let decoded_mosaic = pixel_format::unpack_samples(&decoded.bytes, width * height, PixelFormat::Raw14).unwrap();
    assert_eq!(decoded_mosaic, mosaic);
}

#[test]
fn truncated_and_corrupt_streams_error_instead_of_panicking() {
    let width = 24;
    let height = 24;
    let raw = sample_raw(width, height, 1, PixelFormat::Raw14);
    let params = EncoderParameters {
        quality: Quality::Fs1,
        ..Default::default()
    };
    let encoded = encode(&raw, width, height, &params).unwrap();

    assert!(decode(&encoded[..encoded.len() / 3], &DecoderParameters::default()).is_err());
    assert!(decode(&[], &DecoderParameters::default()).is_err());

    let mut flipped = encoded.clone();
    let mid = flipped.len() / 2;
    flipped[mid] ^= 0xFF;
    // A single flipped byte inside the entropy-coded body must not panic,
    // whether or not it still happens to parse as a valid (if wrong) stream.
    let _ = decode(&flipped, &DecoderParameters::default());
}

#[test]
fn rgb_thumbnail_dimensions_grow_with_resolution() {
    let width = 64;
    let height = 64;
    let raw = sample_raw(width, height, 5, PixelFormat::Raw14);
    let params = EncoderParameters {
        quality: Quality::Fs1,
        ..Default::default()
    };
    let encoded = encode(&raw, width, height, &params).unwrap();

    use gpr_vc5::vc5::parameters::RgbResolution;
    let mut previous_area = 0usize;
    for resolution in [
        RgbResolution::Sixteenth,
        RgbResolution::Eighth,
        RgbResolution::Quarter,
        RgbResolution::Full,
    ] {
        let decoder_params = DecoderParameters {
            rgb_resolution: resolution,
            ..Default::default()
        };
        let thumb = decode_rgb_thumbnail(&encoded, &decoder_params).unwrap();
        assert_eq!(thumb.rgb.len(), thumb.width * thumb.height * 3);
        let area = thumb.width * thumb.height;
        assert!(area >= previous_area, "resolution must not shrink as it increases");
        previous_area = area;
    }
}

#[test]
fn thumbnail_white_balance_gain_brightens_output() {
    use gpr_vc5::vc5::parameters::{RgbGain, RgbResolution};

    let width = 32;
    let height = 32;
    let raw = sample_raw(width, height, 9, PixelFormat::Raw14);
    let params = EncoderParameters {
        quality: Quality::Fs1,
        ..Default::default()
    };
    let encoded = encode(&raw, width, height, &params).unwrap();

    let unity = DecoderParameters {
        rgb_resolution: RgbResolution::Quarter,
        ..Default::default()
    };
    let boosted = DecoderParameters {
        rgb_resolution: RgbResolution::Quarter,
        rgb_gain: RgbGain {
            red: 512,
            green: 512,
            blue: 512,
        },
        ..Default::default()
    };

    let unity_thumb = decode_rgb_thumbnail(&encoded, &unity).unwrap();
    let boosted_thumb = decode_rgb_thumbnail(&encoded, &boosted).unwrap();

    let unity_sum: u64 = unity_thumb.rgb.iter().map(|&b| b as u64).sum();
    let boosted_sum: u64 = boosted_thumb.rgb.iter().map(|&b| b as u64).sum();
    assert!(boosted_sum >= unity_sum, "doubling gain should not darken the preview");
}
