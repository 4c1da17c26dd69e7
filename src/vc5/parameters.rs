//! Encode/decode parameter structs, grounded on `gopro/gpr`'s
//! `vc5_decoder/parameters.h` `DECODER_PARAMETERS`: the same fields,
//! minus the DNG/metadata/XMP concerns this crate leaves to its caller.

use crate::constants::part;
use crate::error::{CodecError, CodecResult};
use crate::vc5::pixel_format::{BayerPattern, PixelFormat};
use crate::vc5::quality::Quality;

/// Bitmask of enabled VC-5 standard parts, see [`crate::constants::part`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnabledParts(pub u32);

impl EnabledParts {
    pub fn elementary_profile() -> Self {
        Self(1 << part::ELEMENTARY)
    }

    pub fn contains(self, part_bit: u32) -> bool {
        self.0 & (1 << part_bit) != 0
    }

    pub fn with(mut self, part_bit: u32) -> Self {
        self.0 |= 1 << part_bit;
        self
    }
}

/// Resolution of the fast RGB thumbnail decode path, a fraction of the
/// full mosaic's linear dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RgbResolution {
    Sixteenth,
    Eighth,
    Quarter,
    Full,
}

impl RgbResolution {
    /// Number of wavelet levels that must be decoded to reach this
    /// resolution: `Full` needs all three, `Sixteenth` needs none (the
    /// deepest LL band alone is already at that scale).
    pub fn levels_needed(self) -> usize {
        match self {
            RgbResolution::Sixteenth => 0,
            RgbResolution::Eighth => 1,
            RgbResolution::Quarter => 2,
            RgbResolution::Full => 3,
        }
    }
}

/// Per-channel white-balance gain applied when combining component
/// planes into an RGB thumbnail, in R/G/B order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbGain {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Default for RgbGain {
    fn default() -> Self {
        // Unity gain, expressed in 1/256ths to keep the multiply integer.
        Self {
            red: 256,
            green: 256,
            blue: 256,
        }
    }
}

/// Caller-supplied buffer allocation, mirroring `gpr_allocator`'s
/// alloc/free pair so embedders can route codec memory through their own
/// pool instead of the global allocator.
pub trait BufferAllocator {
    fn alloc(&self, size: usize) -> Vec<u8>;
    fn free(&self, buffer: Vec<u8>) {
        drop(buffer);
    }
}

/// Default allocator backed by the global allocator.
pub struct DefaultAllocator;

impl BufferAllocator for DefaultAllocator {
    fn alloc(&self, size: usize) -> Vec<u8> {
        vec![0u8; size]
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EncoderParameters {
    pub enabled_parts: EnabledParts,
    pub pattern: BayerPattern,
    pub input_format: PixelFormat,
    /// Row stride of the input raw buffer, in bytes. `None` means the rows
    /// are tightly packed (`pixel_format::row_byte_width(width, input_format)`).
    pub pitch: Option<usize>,
    pub quality: Quality,
    pub verbose: bool,
}

impl Default for EncoderParameters {
    fn default() -> Self {
        Self {
            enabled_parts: EnabledParts::elementary_profile(),
            pattern: BayerPattern::Rggb,
            input_format: PixelFormat::Raw14,
            pitch: None,
            quality: Quality::Fs1,
            verbose: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DecoderParameters {
    pub enabled_parts: EnabledParts,
    /// Pixel format the decoded raw buffer is packed into.
    pub output_format: PixelFormat,
    /// Row stride of the output raw buffer, in bytes. `None` means the
    /// rows are tightly packed (`pixel_format::row_byte_width(width, output_format)`).
    pub pitch: Option<usize>,
    pub rgb_resolution: RgbResolution,
    pub rgb_gain: RgbGain,
    pub verbose: bool,
}

impl Default for DecoderParameters {
    fn default() -> Self {
        Self {
            enabled_parts: EnabledParts::elementary_profile(),
            output_format: PixelFormat::Raw16,
            pitch: None,
            rgb_resolution: RgbResolution::Full,
            rgb_gain: RgbGain::default(),
            verbose: false,
        }
    }
}

/// Collaborator interface a DNG container writer implements to receive
/// an encoded VC-5 payload without this crate depending on the DNG file
/// format itself (source: `gpr_image_writer.h`'s `compressed_buffer`/
/// `tile_byte_count` pair). `row`/`col` are the tile's position within
/// the full image, in tile units; this crate always encodes a single
/// full-frame tile at `(0, 0)`.
pub trait DngTileSink {
    fn write_tile(&mut self, row: u32, col: u32, payload: &[u8]) -> CodecResult<()>;
}

/// Collaborator interface a DNG container reader implements to hand
/// encoded VC-5 payloads back for decoding (source: `gpr_read_image.h`'s
/// per-tile decode callback).
pub trait DngTileSource {
    /// Number of tiles available, in row-major order.
    fn tile_count(&self) -> usize;
    /// Fetch one tile's `(row, col, payload)` by index.
    fn read_tile(&self, index: usize) -> CodecResult<(u32, u32, Vec<u8>)>;
}

/// Trivial in-memory `DngTileSink`/`DngTileSource`, useful for tests and
/// for callers with no DNG container of their own to wire up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTileStore {
    tiles: Vec<(u32, u32, Vec<u8>)>,
}

impl InMemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DngTileSink for InMemoryTileStore {
    fn write_tile(&mut self, row: u32, col: u32, payload: &[u8]) -> CodecResult<()> {
        self.tiles.push((row, col, payload.to_vec()));
        Ok(())
    }
}

impl DngTileSource for InMemoryTileStore {
    fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    fn read_tile(&self, index: usize) -> CodecResult<(u32, u32, Vec<u8>)> {
        self.tiles.get(index).cloned().ok_or(CodecError::NotFound)
    }
}
