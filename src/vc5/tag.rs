//! Wire tag constants for the VC-5 tag-value bitstream.
//!
//! Required tags are positive `i16` values; every tag also has an *optional*
//! form obtained by bitwise-complementing it (`!tag`), per spec: a decoder
//! that does not recognize an optional tag's complement is free to skip it
//! (it arrives framed as a [`Chunk`](super::bitstream::ChunkHeader) when it
//! carries a payload). Chunk type identifiers are a disjoint 7-bit space
//! carried in the high byte of a chunk word, not the segment tag space.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i16)]
pub enum Tag {
    /// First segment in every stream; `value` is unused (always 0).
    StartMarker = 1,
    /// Last segment in every stream; `value` is unused (always 0).
    EndMarker = 2,

    ImageWidth = 10,
    ImageHeight = 11,
    ChannelCount = 12,
    SubbandCount = 13,
    ImageFormat = 14,
    PatternWidth = 15,
    PatternHeight = 16,
    ComponentsPerSample = 17,
    MaxBitsPerComponent = 18,
    PatternType = 19,

    ChannelHeader = 30,
    ChannelTrailer = 31,

    SubbandPrescale = 40,
    SubbandQuantization = 41,
    SubbandNumber = 42,
    SubbandBandEnd = 43,
}

impl Tag {
    pub const fn required(self) -> i16 {
        self as i16
    }

    pub const fn optional(self) -> i16 {
        !(self as i16)
    }
}

/// True if `tag` is the required (positive) form of a tag-value pair.
pub fn is_required_tag(tag: i16) -> bool {
    tag > 0
}

impl TryFrom<i16> for Tag {
    type Error = crate::error::CodecError;

    fn try_from(raw: i16) -> Result<Self, Self::Error> {
        // A tag observed on the wire may be either the required or optional
        // (complemented) form; normalize before matching.
        let required = if is_required_tag(raw) { raw } else { !raw };
        match required {
            1 => Ok(Tag::StartMarker),
            2 => Ok(Tag::EndMarker),
            10 => Ok(Tag::ImageWidth),
            11 => Ok(Tag::ImageHeight),
            12 => Ok(Tag::ChannelCount),
            13 => Ok(Tag::SubbandCount),
            14 => Ok(Tag::ImageFormat),
            15 => Ok(Tag::PatternWidth),
            16 => Ok(Tag::PatternHeight),
            17 => Ok(Tag::ComponentsPerSample),
            18 => Ok(Tag::MaxBitsPerComponent),
            19 => Ok(Tag::PatternType),
            30 => Ok(Tag::ChannelHeader),
            31 => Ok(Tag::ChannelTrailer),
            40 => Ok(Tag::SubbandPrescale),
            41 => Ok(Tag::SubbandQuantization),
            42 => Ok(Tag::SubbandNumber),
            43 => Ok(Tag::SubbandBandEnd),
            _ => Err(crate::error::CodecError::InvalidTag),
        }
    }
}

/// Chunk type identifiers, carried in the top 7 bits of a chunk word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkType {
    ChannelSizeIndex = 1,
    SubbandPayload = 2,
}

impl TryFrom<u8> for ChunkType {
    type Error = crate::error::CodecError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            1 => Ok(ChunkType::ChannelSizeIndex),
            2 => Ok(ChunkType::SubbandPayload),
            _ => Err(crate::error::CodecError::InvalidMarker),
        }
    }
}
