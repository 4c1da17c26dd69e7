//! Fast RGB combination from (possibly partially decoded) component
//! planes: white-balance gain, green averaging, and an 8-bit output
//! clamp.

use crate::error::CodecResult;
use crate::vc5::decoder::RgbThumbnail;
use crate::vc5::parameters::RgbGain;
use crate::vc5::pixel_format::{BayerPattern, ChannelRole};
use crate::vc5::wavelet::Plane;

/// Combine four same-sized component planes into an interleaved 8-bit
/// RGB buffer, applying `gain` (in 1/256ths) and clamping to 8-bit range.
pub fn combine_rgb(planes: &[Plane], pattern: BayerPattern, bits_per_component: u8, gain: &RgbGain) -> CodecResult<RgbThumbnail> {
    let width = planes[0].width;
    let height = planes[0].height;
    let roles = pattern.channel_roles();
    let max_input = (1i64 << bits_per_component) - 1;

    let mut red_plane = None;
    let mut blue_plane = None;
    let mut green_planes = Vec::with_capacity(2);
    for (plane, role) in planes.iter().zip(roles.iter()) {
        match role {
            ChannelRole::Red => red_plane = Some(plane),
            ChannelRole::Blue => blue_plane = Some(plane),
            ChannelRole::Green => green_planes.push(plane),
        }
    }
    let red_plane = red_plane.expect("RGGB/GBRG patterns always carry one red plane");
    let blue_plane = blue_plane.expect("RGGB/GBRG patterns always carry one blue plane");

    let mut rgb = Vec::with_capacity(width * height * 3);
    for i in 0..width * height {
        let r = apply_gain(red_plane.data[i] as i64, max_input, gain.red);
        let g0 = green_planes[0].data[i] as i64;
        let g1 = green_planes[1].data[i] as i64;
        let g = apply_gain((g0 + g1) / 2, max_input, gain.green);
        let b = apply_gain(blue_plane.data[i] as i64, max_input, gain.blue);
        rgb.push(r);
        rgb.push(g);
        rgb.push(b);
    }

    Ok(RgbThumbnail { width, height, rgb })
}

fn apply_gain(value: i64, max_input: i64, gain_256ths: u16) -> u8 {
    let gained = value.max(0) * gain_256ths as i64 / 256;
    let scaled = if max_input > 0 { gained * 255 / max_input } else { gained };
    scaled.clamp(0, 255) as u8
}
