//! Scanline-based image conversion.
//!
//! PNG decoding feeds a pull-style reader, the JPEG/WebP/PNG encoders
//! sit behind push-style writers, and [`convert_image`] pumps one into
//! the other. Selection helpers pick the smallest rendition, with a
//! size handicap against lossy winners.

mod codecs;
mod convert;
mod scanline;

pub use codecs::{
    JpegCompressionOptions, JpegScanlineWriter, PngScanlineReader, PngScanlineWriter,
    WebpScanlineWriter,
};
pub use convert::{
    ConvertedFormat, convert_png_to_jpeg, convert_png_to_webp, optimize_png,
    optimize_png_or_convert_to_jpeg, smallest_of_png_jpeg_webp,
};
pub use scanline::{PixelFormat, ScanlineReader, ScanlineWriter, convert_image};
