//! C Foreign Function Interface for gpr-vc5.
//!
//! Provides C-compatible functions with opaque handles, mirroring the
//! shape of `jpegexp-rs`'s own `ffi.rs`: a handle wraps a boxed Rust
//! struct, ownership crosses the boundary via `Box::into_raw`/`from_raw`,
//! and every fallible entry point returns a plain C error code instead
//! of panicking across the FFI boundary.

use std::os::raw::{c_int, c_uchar};
use std::ptr;

use crate::vc5::decoder::{self, DecodedImage};
use crate::vc5::encoder;
use crate::vc5::parameters::{DecoderParameters, EncoderParameters};
use crate::vc5::pixel_format::{self, BayerPattern, PixelFormat};
use crate::vc5::quality::Quality;
use crate::CodecError;

/// Opaque handle to a decoded mosaic buffer, owned by the caller until
/// freed with [`gpr_vc5_decoded_image_free`].
#[repr(C)]
pub struct GprDecodedImage {
    _private: [u8; 0],
}

#[repr(C)]
pub struct GprImageInfo {
    pub width: u32,
    pub height: u32,
}

#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GprFfiError {
    Ok = 0,
    NullPointer = 1,
    InvalidData = 2,
    UnsupportedFormat = 3,
    InternalError = 4,
}

impl From<CodecError> for GprFfiError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::PixelFormat | CodecError::UnsupportedFormat | CodecError::BadImageFormat => {
                GprFfiError::UnsupportedFormat
            }
            CodecError::NullPtr => GprFfiError::NullPointer,
            CodecError::BitstreamSyntax
            | CodecError::ImageDimensions
            | CodecError::InvalidTag
            | CodecError::InvalidBand
            | CodecError::DecodingSubband
            | CodecError::NotFound
            | CodecError::BandEndMarker
            | CodecError::BandEndTrailer
            | CodecError::InvalidMarker
            | CodecError::MissingStartMarker
            | CodecError::DuplicateHeaderParameter
            | CodecError::RequiredParameter
            | CodecError::LowpassPrecision
            | CodecError::LowpassValue
            | CodecError::PatternDimensions
            | CodecError::BandOverfull
            | CodecError::BandUnderfull
            | CodecError::UnknownCode
            | CodecError::ConsistencyChannelSize
            | CodecError::ConsistencyIncompleteChannel => GprFfiError::InvalidData,
            _ => GprFfiError::InternalError,
        }
    }
}

struct DecodedImageHandle {
    image: DecodedImage,
}

/// Encode a row-major 16-bit Bayer mosaic into a VC-5 bitstream.
///
/// On success, `*out_ptr`/`*out_len` are set to a heap buffer the caller
/// must release with [`gpr_vc5_buffer_free`]. Returns a nonzero
/// [`GprFfiError`] on failure, leaving the output pointers untouched.
///
/// # Safety
/// `mosaic` must point to `width * height` valid `u16` values. `out_ptr`
/// and `out_len` must point to valid, writable locations.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_encode(
    mosaic: *const u16,
    width: u32,
    height: u32,
    quality: c_int,
    out_ptr: *mut *mut c_uchar,
    out_len: *mut usize,
) -> c_int {
    if mosaic.is_null() || out_ptr.is_null() || out_len.is_null() {
        return GprFfiError::NullPointer as c_int;
    }
    let count = width as usize * height as usize;
    let samples = unsafe { std::slice::from_raw_parts(mosaic, count) };
    let raw = match pixel_format::pack_samples(samples, PixelFormat::Raw16) {
        Ok(raw) => raw,
        Err(e) => return GprFfiError::from(e) as c_int,
    };

    let quality = match quality {
        0 => Quality::Low,
        1 => Quality::Medium,
        2 => Quality::High,
        3 => Quality::Fs1Fast,
        4 => Quality::Fs1,
        _ => Quality::Fs2,
    };
    let params = EncoderParameters {
        pattern: BayerPattern::Rggb,
        input_format: PixelFormat::Raw16,
        quality,
        ..Default::default()
    };

    match encoder::encode(&raw, width as usize, height as usize, &params) {
        Ok(mut bytes) => {
            bytes.shrink_to_fit();
            unsafe {
                *out_len = bytes.len();
                *out_ptr = bytes.as_mut_ptr();
            }
            std::mem::forget(bytes);
            GprFfiError::Ok as c_int
        }
        Err(e) => GprFfiError::from(e) as c_int,
    }
}

/// Decode a VC-5 bitstream into a mosaic buffer, returning an opaque
/// handle. Use [`gpr_vc5_decoded_image_info`] and
/// [`gpr_vc5_decoded_image_data`] to read the result, then free it with
/// [`gpr_vc5_decoded_image_free`].
///
/// # Safety
/// `data` must point to `len` valid bytes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_decode(data: *const c_uchar, len: usize) -> *mut GprDecodedImage {
    if data.is_null() || len == 0 {
        return ptr::null_mut();
    }
    let bytes = unsafe { std::slice::from_raw_parts(data, len) };
    let params = DecoderParameters {
        output_format: PixelFormat::Raw16,
        ..Default::default()
    };
    match decoder::decode(bytes, &params) {
        Ok(image) => Box::into_raw(Box::new(DecodedImageHandle { image })) as *mut GprDecodedImage,
        Err(_) => ptr::null_mut(),
    }
}

/// # Safety
/// `handle` must be a pointer returned by [`gpr_vc5_decode`] and not yet
/// freed.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_decoded_image_info(handle: *const GprDecodedImage, info: *mut GprImageInfo) -> c_int {
    if handle.is_null() || info.is_null() {
        return GprFfiError::NullPointer as c_int;
    }
    let handle = unsafe { &*(handle as *const DecodedImageHandle) };
    unsafe {
        (*info).width = handle.image.width as u32;
        (*info).height = handle.image.height as u32;
    }
    GprFfiError::Ok as c_int
}

/// # Safety
/// `handle` must be a pointer returned by [`gpr_vc5_decode`] and not yet
/// freed; `out` must point to at least `width * height` writable `u16`s.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_decoded_image_data(handle: *const GprDecodedImage, out: *mut u16, out_len: usize) -> c_int {
    if handle.is_null() || out.is_null() {
        return GprFfiError::NullPointer as c_int;
    }
    let handle = unsafe { &*(handle as *const DecodedImageHandle) };
    let count = handle.image.width * handle.image.height;
    if out_len < count {
        return GprFfiError::InvalidData as c_int;
    }
    let samples = match pixel_format::unpack_samples(&handle.image.bytes, count, PixelFormat::Raw16) {
        Ok(samples) => samples,
        Err(e) => return GprFfiError::from(e) as c_int,
    };
    unsafe {
        std::ptr::copy_nonoverlapping(samples.as_ptr(), out, samples.len());
    }
    GprFfiError::Ok as c_int
}

/// # Safety
/// `handle` must be a pointer previously returned by [`gpr_vc5_decode`],
/// and must not be used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_decoded_image_free(handle: *mut GprDecodedImage) {
    if !handle.is_null() {
        drop(unsafe { Box::from_raw(handle as *mut DecodedImageHandle) });
    }
}

/// # Safety
/// `ptr`/`len` must be a buffer previously returned by
/// [`gpr_vc5_encode`], and must not be used again after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn gpr_vc5_buffer_free(ptr: *mut c_uchar, len: usize) {
    if !ptr.is_null() {
        drop(unsafe { Vec::from_raw_parts(ptr, len, len) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip_through_ffi() {
        let width = 16u32;
        let height = 16u32;
        let mosaic: Vec<u16> = (0..width as usize * height as usize)
            .map(|i| ((i * 41 + 3) % 4096) as u16)
            .collect();

        let mut out_ptr: *mut c_uchar = ptr::null_mut();
        let mut out_len: usize = 0;
        let rc = unsafe { gpr_vc5_encode(mosaic.as_ptr(), width, height, 5, &mut out_ptr, &mut out_len) };
        assert_eq!(rc, GprFfiError::Ok as c_int);
        assert!(!out_ptr.is_null());

        let handle = unsafe { gpr_vc5_decode(out_ptr, out_len) };
        assert!(!handle.is_null());

        let mut info = GprImageInfo { width: 0, height: 0 };
        assert_eq!(
            unsafe { gpr_vc5_decoded_image_info(handle, &mut info) },
            GprFfiError::Ok as c_int
        );
        assert_eq!(info.width, width);
        assert_eq!(info.height, height);

        let mut decoded = vec![0u16; width as usize * height as usize];
        assert_eq!(
            unsafe { gpr_vc5_decoded_image_data(handle, decoded.as_mut_ptr(), decoded.len()) },
            GprFfiError::Ok as c_int
        );
        assert_eq!(decoded, mosaic);

        unsafe {
            gpr_vc5_decoded_image_free(handle);
            gpr_vc5_buffer_free(out_ptr, out_len);
        }
    }
}
