//! Fixed parameters of the VC-5 elementary profile, ported from
//! `gopro/gpr`'s `vc5_common/config.h` and `vc5_common/types.h`.

/// Maximum number of color channels (one per Bayer component plane).
pub const MAX_CHANNEL_COUNT: usize = 4;

/// Maximum number of wavelet pyramid levels per channel.
pub const MAX_WAVELET_COUNT: usize = 3;

/// Maximum number of bands (LL, LH, HL, HH) in a single wavelet level.
pub const MAX_BAND_COUNT: usize = 4;

/// Total subbands per channel: one deepest LL plus three highpass triples.
pub const MAX_SUBBAND_COUNT: usize = 10;

/// Number of prescale values encoded into the bitstream (one per level, padded).
pub const MAX_PRESCALE_COUNT: usize = 8;

/// Number of rows of intermediate horizontal-transform results kept live
/// while the vertical pass runs (`ROW_BUFFER_COUNT` in the source).
pub const ROW_BUFFER_COUNT: usize = 6;

/// Internal precision of the component values after unpacking.
pub const DEFAULT_INTERNAL_PRECISION: u8 = 12;

/// Bayer pattern is always 2x2 in the elementary profile.
pub const PATTERN_WIDTH: u16 = 2;
pub const PATTERN_HEIGHT: u16 = 2;

/// Components per mosaic sample (single-channel Bayer pixels).
pub const COMPONENTS_PER_SAMPLE: u16 = 1;

/// Bits-per-component values the format supports.
pub const VALID_BITS_PER_COMPONENT: [u8; 3] = [12, 14, 16];

/// Size in bytes of one bitstream segment (tag + value, big-endian).
pub const SEGMENT_SIZE: usize = 4;

/// Parts of the VC-5 standard, as bit positions into [`EnabledParts`].
///
/// [`EnabledParts`]: crate::vc5::parameters::EnabledParts
pub mod part {
    pub const ELEMENTARY: u32 = 1;
    pub const CONFORMANCE: u32 = 2;
    pub const IMAGE_FORMATS: u32 = 3;
    pub const COLOR_SAMPLING: u32 = 4;
    pub const LAYERS: u32 = 5;
    pub const SECTIONS: u32 = 6;
    pub const METADATA: u32 = 7;
}
