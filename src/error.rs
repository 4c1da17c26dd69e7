//! Stable error taxonomy for the VC-5 codec core.
//!
//! Numbered the way `gopro/gpr`'s `vc5_common/error.h` numbers `CODEC_ERROR`:
//! each variant keeps the same relative ordering as the C enum so the
//! integer value of `CodecError as i32` is stable across releases.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecError {
    #[error("unexpected internal condition")]
    Unexpected = 1,
    #[error("memory allocation failed")]
    OutOfMemory = 2,
    #[error("function not implemented")]
    Unimplemented = 3,
    #[error("null pointer or missing argument")]
    NullPtr = 4,
    #[error("error in the sequence of tag-value pairs")]
    BitstreamSyntax = 5,
    #[error("wrong or unknown image dimensions")]
    ImageDimensions = 6,
    #[error("found a tag that should not be present")]
    InvalidTag = 7,
    #[error("wavelet band index is out of range")]
    InvalidBand = 8,
    #[error("error decoding a wavelet subband")]
    DecodingSubband = 9,
    #[error("did not find a value codeword")]
    NotFound = 10,
    #[error("could not find the band-end marker")]
    BandEndMarker = 11,
    #[error("could not find the start of the highpass band trailer")]
    BandEndTrailer = 12,
    #[error("unsupported pixel format")]
    PixelFormat = 13,
    #[error("bitstream marker was not found in the codebook")]
    InvalidMarker = 14,
    #[error("could not write the channel size table")]
    ChannelSizeTable = 15,
    #[error("pixel or encoded format is not supported")]
    UnsupportedFormat = 16,
    #[error("bitstream does not begin with the start marker")]
    MissingStartMarker = 17,
    #[error("header parameter occurs more than once")]
    DuplicateHeaderParameter = 18,
    #[error("required parameter is missing when needed")]
    RequiredParameter = 19,
    #[error("number of bits per lowpass coefficient out of range")]
    LowpassPrecision = 20,
    #[error("lowpass coefficient value is out of range")]
    LowpassValue = 21,
    #[error("could not determine the characteristics of the input image")]
    ImageType = 22,
    #[error("bad image format (VC-5 Part 3 only)")]
    BadImageFormat = 23,
    #[error("bad pattern dimensions (VC-5 Part 3 only)")]
    PatternDimensions = 24,
    #[error("incorrect enabled parts of the VC-5 standard")]
    EnabledParts = 25,

    // Subband run/value accounting, raised by the same code path as DecodingSubband.
    #[error("subband produced more coefficients than width*height")]
    BandOverfull = 26,
    #[error("subband produced fewer coefficients than width*height")]
    BandUnderfull = 27,
    #[error("codeword did not match any entry in the active codebook")]
    UnknownCode = 28,

    #[error("channel-size index sum does not match the encoded byte range")]
    ConsistencyChannelSize = 29,
    #[error("channel trailer reached with incomplete decoded-bands mask")]
    ConsistencyIncompleteChannel = 30,
}

pub type CodecResult<T> = Result<T, CodecError>;
