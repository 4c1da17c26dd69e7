//! Bayer pixel format handling: unpacking raw mosaic samples into four
//! component planes (encoder side) and re-interleaving them back into a
//! mosaic (decoder side), plus the packed 12-bit wire format.
//!
//! The 12-bit packed unpack/repack grounds on `wytros`'s `decode_chunk` /
//! `encode_chunk` bit-shuffling (two 12-bit samples packed into three
//! bytes), generalized here to the GPR pattern layouts.

use crate::error::{CodecError, CodecResult};
use crate::vc5::wavelet::Plane;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BayerPattern {
    Rggb,
    Gbrg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelRole {
    Red,
    Green,
    Blue,
}

impl BayerPattern {
    /// Role of each of the four component planes, in `demosaic`'s
    /// `[c0, c1, c2, c3]` (top-left, top-right, bottom-left, bottom-right) order.
    pub fn channel_roles(self) -> [ChannelRole; 4] {
        match self {
            BayerPattern::Rggb => [ChannelRole::Red, ChannelRole::Green, ChannelRole::Green, ChannelRole::Blue],
            BayerPattern::Gbrg => [ChannelRole::Green, ChannelRole::Blue, ChannelRole::Red, ChannelRole::Green],
        }
    }

    pub fn wire_code(self) -> u16 {
        match self {
            BayerPattern::Rggb => 0,
            BayerPattern::Gbrg => 1,
        }
    }

    pub fn from_wire_code(code: u16) -> CodecResult<Self> {
        match code {
            0 => Ok(BayerPattern::Rggb),
            1 => Ok(BayerPattern::Gbrg),
            _ => Err(CodecError::PatternDimensions),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Raw12,
    Raw12Packed,
    Raw14,
    Raw16,
}

impl PixelFormat {
    pub fn bits_per_component(self) -> u8 {
        match self {
            PixelFormat::Raw12 | PixelFormat::Raw12Packed => 12,
            PixelFormat::Raw14 => 14,
            PixelFormat::Raw16 => 16,
        }
    }
}

/// Four component planes in RGGB/GBRG channel order (R, G1, G2, B for
/// RGGB; G1, R, B, G2 for GBRG), one quarter the mosaic's resolution.
pub struct ComponentPlanes {
    pub pattern: BayerPattern,
    pub planes: [Plane; 4],
}

/// Split a row-major mosaic buffer into four component planes.
pub fn demosaic(mosaic: &[u16], width: usize, height: usize, pattern: BayerPattern) -> CodecResult<ComponentPlanes> {
    if width % 2 != 0 || height % 2 != 0 {
        return Err(CodecError::ImageDimensions);
    }
    if mosaic.len() != width * height {
        return Err(CodecError::ImageDimensions);
    }
    let half_w = width / 2;
    let half_h = height / 2;
    let mut planes = [
        Plane::new(half_w, half_h),
        Plane::new(half_w, half_h),
        Plane::new(half_w, half_h),
        Plane::new(half_w, half_h),
    ];
    for y in 0..half_h {
        for x in 0..half_w {
            let tl = mosaic[(2 * y) * width + 2 * x] as i32;
            let tr = mosaic[(2 * y) * width + 2 * x + 1] as i32;
            let bl = mosaic[(2 * y + 1) * width + 2 * x] as i32;
            let br = mosaic[(2 * y + 1) * width + 2 * x + 1] as i32;
            // Channel order follows the pattern's top-left-to-bottom-right
            // scan: index 0/3 are the non-green samples, 1/2 the greens.
            let (c0, c1, c2, c3) = (tl, tr, bl, br);
            planes[0].data[y * half_w + x] = c0;
            planes[1].data[y * half_w + x] = c1;
            planes[2].data[y * half_w + x] = c2;
            planes[3].data[y * half_w + x] = c3;
        }
    }
    Ok(ComponentPlanes { pattern, planes })
}

/// Reassemble four component planes into a row-major mosaic buffer.
pub fn remosaic(planes: &ComponentPlanes, max_value: u16) -> CodecResult<Vec<u16>> {
    let half_w = planes.planes[0].width;
    let half_h = planes.planes[0].height;
    let width = half_w * 2;
    let height = half_h * 2;
    let mut mosaic = vec![0u16; width * height];
    for y in 0..half_h {
        for x in 0..half_w {
            let c0 = planes.planes[0].data[y * half_w + x];
            let c1 = planes.planes[1].data[y * half_w + x];
            let c2 = planes.planes[2].data[y * half_w + x];
            let c3 = planes.planes[3].data[y * half_w + x];
            mosaic[(2 * y) * width + 2 * x] = clamp_u16(c0, max_value);
            mosaic[(2 * y) * width + 2 * x + 1] = clamp_u16(c1, max_value);
            mosaic[(2 * y + 1) * width + 2 * x] = clamp_u16(c2, max_value);
            mosaic[(2 * y + 1) * width + 2 * x + 1] = clamp_u16(c3, max_value);
        }
    }
    Ok(mosaic)
}

fn clamp_u16(value: i32, max_value: u16) -> u16 {
    value.clamp(0, max_value as i32) as u16
}

/// Unpack a buffer of samples in `format` into plain `u16` samples.
pub fn unpack_samples(bytes: &[u8], count: usize, format: PixelFormat) -> CodecResult<Vec<u16>> {
    match format {
        PixelFormat::Raw12Packed => unpack_12p(bytes, count),
        PixelFormat::Raw12 | PixelFormat::Raw14 | PixelFormat::Raw16 => {
            if bytes.len() < count * 2 {
                return Err(CodecError::PixelFormat);
            }
            Ok((0..count)
                .map(|i| u16::from_le_bytes([bytes[2 * i], bytes[2 * i + 1]]))
                .collect())
        }
    }
}

/// Pack plain `u16` samples into `format`'s wire representation.
pub fn pack_samples(samples: &[u16], format: PixelFormat) -> CodecResult<Vec<u8>> {
    match format {
        PixelFormat::Raw12Packed => pack_12p(samples),
        PixelFormat::Raw12 | PixelFormat::Raw14 | PixelFormat::Raw16 => {
            let mut out = Vec::with_capacity(samples.len() * 2);
            for &s in samples {
                out.extend_from_slice(&s.to_le_bytes());
            }
            Ok(out)
        }
    }
}

/// Byte width of one row of `width` samples in `format`'s wire
/// representation, before any pitch padding.
pub fn row_byte_width(width: usize, format: PixelFormat) -> usize {
    match format {
        PixelFormat::Raw12Packed => width / 2 * 3,
        PixelFormat::Raw12 | PixelFormat::Raw14 | PixelFormat::Raw16 => width * 2,
    }
}

/// Unpack a pitched raw byte buffer — `height` rows of `pitch` bytes
/// each, only the first `row_byte_width(width, format)` of which hold
/// real samples — into a row-major `u16` mosaic.
pub fn unpack_rows(bytes: &[u8], width: usize, height: usize, pitch: usize, format: PixelFormat) -> CodecResult<Vec<u16>> {
    let row_bytes = row_byte_width(width, format);
    if pitch < row_bytes || bytes.len() < pitch * height {
        return Err(CodecError::PixelFormat);
    }
    let mut mosaic = Vec::with_capacity(width * height);
    for y in 0..height {
        let start = y * pitch;
        mosaic.extend(unpack_samples(&bytes[start..start + row_bytes], width, format)?);
    }
    Ok(mosaic)
}

/// Pack a row-major `u16` mosaic into a pitched raw byte buffer, padding
/// each row with zero bytes out to `pitch`.
pub fn pack_rows(samples: &[u16], width: usize, height: usize, pitch: usize, format: PixelFormat) -> CodecResult<Vec<u8>> {
    let row_bytes = row_byte_width(width, format);
    if pitch < row_bytes {
        return Err(CodecError::PixelFormat);
    }
    if samples.len() != width * height {
        return Err(CodecError::ImageDimensions);
    }
    let mut out = vec![0u8; pitch * height];
    for y in 0..height {
        let row = pack_samples(&samples[y * width..(y + 1) * width], format)?;
        out[y * pitch..y * pitch + row_bytes].copy_from_slice(&row);
    }
    Ok(out)
}

/// Two 12-bit samples packed into three bytes:
/// `pix0 = byte0 | ((byte1 & 0x0F) << 8)`,
/// `pix1 = (byte2 << 4) | ((byte1 & 0xF0) >> 4)`.
fn unpack_12p(bytes: &[u8], count: usize) -> CodecResult<Vec<u16>> {
    if count % 2 != 0 {
        return Err(CodecError::PixelFormat);
    }
    let needed = count / 2 * 3;
    if bytes.len() < needed {
        return Err(CodecError::PixelFormat);
    }
    let mut out = Vec::with_capacity(count);
    for pair in 0..count / 2 {
        let b0 = bytes[pair * 3] as u16;
        let b1 = bytes[pair * 3 + 1] as u16;
        let b2 = bytes[pair * 3 + 2] as u16;
        let pix0 = b0 | ((b1 & 0x0F) << 8);
        let pix1 = (b2 << 4) | ((b1 & 0xF0) >> 4);
        out.push(pix0);
        out.push(pix1);
    }
    Ok(out)
}

fn pack_12p(samples: &[u16]) -> CodecResult<Vec<u8>> {
    if samples.len() % 2 != 0 {
        return Err(CodecError::PixelFormat);
    }
    let mut out = Vec::with_capacity(samples.len() / 2 * 3);
    for pair in samples.chunks_exact(2) {
        let (pix0, pix1) = (pair[0] & 0x0FFF, pair[1] & 0x0FFF);
        let byte0 = (pix0 & 0xFF) as u8;
        let byte1 = (((pix0 >> 8) & 0x0F) | ((pix1 & 0x0F) << 4)) as u8;
        let byte2 = ((pix1 >> 4) & 0xFF) as u8;
        out.push(byte0);
        out.push(byte1);
        out.push(byte2);
    }
    Ok(out)
}
