//! The top-level image header: the tag-value pairs that open every
//! stream, between the start marker and the first channel.

use crate::constants::{COMPONENTS_PER_SAMPLE, MAX_CHANNEL_COUNT, MAX_SUBBAND_COUNT, PATTERN_HEIGHT, PATTERN_WIDTH};
use crate::error::{CodecError, CodecResult};
use crate::vc5::bitstream::{BitstreamReader, BitstreamWriter, Segment};
use crate::vc5::pixel_format::{BayerPattern, PixelFormat};
use crate::vc5::tag::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u16,
    pub height: u16,
    pub bits_per_component: u8,
}

fn format_code(format: PixelFormat) -> u16 {
    match format {
        PixelFormat::Raw12 => 0,
        PixelFormat::Raw12Packed => 1,
        PixelFormat::Raw14 => 2,
        PixelFormat::Raw16 => 3,
    }
}

fn format_from_code(code: u16) -> CodecResult<PixelFormat> {
    match code {
        0 => Ok(PixelFormat::Raw12),
        1 => Ok(PixelFormat::Raw12Packed),
        2 => Ok(PixelFormat::Raw14),
        3 => Ok(PixelFormat::Raw16),
        _ => Err(CodecError::UnsupportedFormat),
    }
}

pub fn write_start_marker(writer: &mut BitstreamWriter) -> CodecResult<()> {
    writer.put_segment(Segment::new(Tag::StartMarker.required(), 0))
}

pub fn write_end_marker(writer: &mut BitstreamWriter) -> CodecResult<()> {
    writer.put_segment(Segment::new(Tag::EndMarker.required(), 0))
}

pub fn write_image_header(writer: &mut BitstreamWriter, header: ImageHeader, format: PixelFormat, pattern: BayerPattern) -> CodecResult<()> {
    writer.put_segment(Segment::new(Tag::ImageWidth.required(), header.width))?;
    writer.put_segment(Segment::new(Tag::ImageHeight.required(), header.height))?;
    writer.put_segment(Segment::new(Tag::ChannelCount.required(), MAX_CHANNEL_COUNT as u16))?;
    writer.put_segment(Segment::new(Tag::SubbandCount.required(), MAX_SUBBAND_COUNT as u16))?;
    writer.put_segment(Segment::new(Tag::ImageFormat.required(), format_code(format)))?;
    writer.put_segment(Segment::new(Tag::PatternWidth.required(), PATTERN_WIDTH))?;
    writer.put_segment(Segment::new(Tag::PatternHeight.required(), PATTERN_HEIGHT))?;
    writer.put_segment(Segment::new(Tag::PatternType.required(), pattern.wire_code()))?;
    writer.put_segment(Segment::new(Tag::ComponentsPerSample.required(), COMPONENTS_PER_SAMPLE))?;
    writer.put_segment(Segment::new(Tag::MaxBitsPerComponent.required(), header.bits_per_component as u16))?;
    Ok(())
}

pub struct ParsedHeader {
    pub image: ImageHeader,
    pub format: PixelFormat,
    pub pattern: BayerPattern,
    pub channel_count: u16,
    pub subband_count: u16,
}

/// Reads the start marker and every header tag-value pair up to (but not
/// including) the first channel header, rejecting duplicate or missing
/// required parameters.
pub fn read_header(reader: &mut BitstreamReader<'_>) -> CodecResult<ParsedHeader> {
    let start = reader.get_segment()?;
    match Tag::try_from(start.tag) {
        Ok(Tag::StartMarker) => {}
        _ => return Err(CodecError::MissingStartMarker),
    }

    let mut width = None;
    let mut height = None;
    let mut channel_count = None;
    let mut subband_count = None;
    let mut format = None;
    let mut bits_per_component = None;
    let mut pattern_checked = false;
    let mut pattern_type = None;

    loop {
        let mark = reader.tell();
        let segment = reader.get_segment()?;
        let tag = match Tag::try_from(segment.tag) {
            Ok(tag) => tag,
            Err(_) if segment.tag < 0 => continue, // unrecognized optional tag: skip
            Err(e) => return Err(e),
        };
        match tag {
            Tag::ImageWidth => set_once(&mut width, segment.value)?,
            Tag::ImageHeight => set_once(&mut height, segment.value)?,
            Tag::ChannelCount => set_once(&mut channel_count, segment.value)?,
            Tag::SubbandCount => set_once(&mut subband_count, segment.value)?,
            Tag::ImageFormat => set_once(&mut format, segment.value)?,
            Tag::PatternWidth => {
                if segment.value != PATTERN_WIDTH {
                    return Err(CodecError::PatternDimensions);
                }
                pattern_checked = true;
            }
            Tag::PatternHeight => {
                if segment.value != PATTERN_HEIGHT {
                    return Err(CodecError::PatternDimensions);
                }
            }
            Tag::PatternType => set_once(&mut pattern_type, segment.value)?,
            Tag::ComponentsPerSample => {}
            Tag::MaxBitsPerComponent => set_once(&mut bits_per_component, segment.value)?,
            Tag::ChannelHeader => {
                // First channel: rewind and stop reading the image header.
                reader.seek(mark)?;
                break;
            }
            _ => return Err(CodecError::InvalidTag),
        }
    }

    let _ = pattern_checked;
    let width = width.ok_or(CodecError::RequiredParameter)?;
    let height = height.ok_or(CodecError::RequiredParameter)?;
    let channel_count = channel_count.ok_or(CodecError::RequiredParameter)?;
    let subband_count = subband_count.ok_or(CodecError::RequiredParameter)?;
    let format_code_value = format.ok_or(CodecError::RequiredParameter)?;
    let bits_per_component = bits_per_component.ok_or(CodecError::RequiredParameter)?;
    let pattern_type = pattern_type.ok_or(CodecError::RequiredParameter)?;

    if width == 0 || height == 0 || width % 2 != 0 || height % 2 != 0 {
        return Err(CodecError::ImageDimensions);
    }

    Ok(ParsedHeader {
        image: ImageHeader {
            width,
            height,
            bits_per_component: bits_per_component as u8,
        },
        format: format_from_code(format_code_value)?,
        pattern: BayerPattern::from_wire_code(pattern_type)?,
        channel_count,
        subband_count,
    })
}

fn set_once<T>(slot: &mut Option<T>, value: T) -> CodecResult<()> {
    if slot.is_some() {
        return Err(CodecError::DuplicateHeaderParameter);
    }
    *slot = Some(value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> ImageHeader {
        ImageHeader {
            width: 640,
            height: 480,
            bits_per_component: 14,
        }
    }

    #[test]
    fn header_roundtrips() {
        let mut writer = BitstreamWriter::new();
        write_start_marker(&mut writer).unwrap();
        write_image_header(&mut writer, sample_header(), PixelFormat::Raw14, crate::vc5::pixel_format::BayerPattern::Gbrg).unwrap();
        let bytes = writer.into_bytes();

        let mut reader = BitstreamReader::new(&bytes);
        let parsed = read_header(&mut reader).unwrap();
        assert_eq!(parsed.image, sample_header());
        assert_eq!(parsed.format, PixelFormat::Raw14);
        assert_eq!(parsed.pattern, crate::vc5::pixel_format::BayerPattern::Gbrg);
        assert_eq!(parsed.channel_count, MAX_CHANNEL_COUNT as u16);
        assert_eq!(parsed.subband_count, MAX_SUBBAND_COUNT as u16);
    }

    #[test]
    fn missing_start_marker_is_rejected() {
        let mut writer = BitstreamWriter::new();
        writer.put_segment(Segment::new(Tag::ImageWidth.required(), 640)).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(read_header(&mut reader), Err(CodecError::MissingStartMarker));
    }

    #[test]
    fn unrecognized_first_tag_is_missing_start_marker_not_invalid_tag() {
        // {0xDEADBEEF, 0x00000000}: 0xDEAD as i16 is not any known `Tag`
        // discriminant, so this must still surface as `MissingStartMarker`,
        // not `InvalidTag`.
        let bytes: [u8; 8] = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x00, 0x00, 0x00];
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(read_header(&mut reader), Err(CodecError::MissingStartMarker));
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let mut writer = BitstreamWriter::new();
        write_start_marker(&mut writer).unwrap();
        writer.put_segment(Segment::new(Tag::ImageWidth.required(), 640)).unwrap();
        writer.put_segment(Segment::new(Tag::ImageWidth.required(), 640)).unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(read_header(&mut reader), Err(CodecError::DuplicateHeaderParameter));
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        let mut writer = BitstreamWriter::new();
        write_start_marker(&mut writer).unwrap();
        write_image_header(
            &mut writer,
            ImageHeader {
                width: 641,
                height: 480,
                bits_per_component: 14,
            },
            PixelFormat::Raw14,
            crate::vc5::pixel_format::BayerPattern::Rggb,
        )
        .unwrap();
        let bytes = writer.into_bytes();
        let mut reader = BitstreamReader::new(&bytes);
        assert_eq!(read_header(&mut reader), Err(CodecError::ImageDimensions));
    }
}
