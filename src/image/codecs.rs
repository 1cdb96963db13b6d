//! Scanline readers and writers over the PNG, JPEG, and WebP codecs.

use anyhow::{Context, Result, bail, ensure};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat};
use serde::{Deserialize, Serialize};

use super::scanline::{PixelFormat, ScanlineReader, ScanlineWriter};

/// Options for JPEG encoding. Callers typically embed this in their
/// own configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JpegCompressionOptions {
    /// Encoder quality, 1-100.
    pub quality: u8,
}

impl Default for JpegCompressionOptions {
    fn default() -> Self {
        Self { quality: 85 }
    }
}

// =============================================================================
// PNG reader
// =============================================================================

/// Scanline reader over a decoded PNG.
///
/// Fully opaque images expose `Rgb8` rows, anything with transparency
/// exposes `Rgba8`. The decoder already expands low-bit-depth channels
/// to 8 bits.
pub struct PngScanlineReader {
    rows: Vec<u8>,
    width: u32,
    height: u32,
    format: PixelFormat,
    next_row: usize,
}

impl PngScanlineReader {
    pub fn new(png: &[u8]) -> Result<Self> {
        let decoded =
            image::load_from_memory_with_format(png, ImageFormat::Png).context("decoding PNG")?;
        let (width, height) = (decoded.width(), decoded.height());
        let rgba = decoded.into_rgba8();
        let opaque = rgba.pixels().all(|pixel| pixel[3] == u8::MAX);
        let (format, rows) = if opaque {
            let rgb = image::DynamicImage::ImageRgba8(rgba).into_rgb8();
            (PixelFormat::Rgb8, rgb.into_raw())
        } else {
            (PixelFormat::Rgba8, rgba.into_raw())
        };
        Ok(Self {
            rows,
            width,
            height,
            format,
            next_row: 0,
        })
    }

    fn stride(&self) -> usize {
        self.width as usize * self.format.bytes_per_pixel()
    }
}

impl ScanlineReader for PngScanlineReader {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    fn has_more_scanlines(&self) -> bool {
        self.next_row < self.height as usize
    }

    fn read_next_scanline(&mut self) -> Result<&[u8]> {
        ensure!(self.has_more_scanlines(), "image is exhausted");
        let stride = self.stride();
        let begin = self.next_row * stride;
        self.next_row += 1;
        Ok(&self.rows[begin..begin + stride])
    }
}

// =============================================================================
// Writers
// =============================================================================

/// Row buffer shared by the encoding writers.
struct RowBuffer {
    width: u32,
    height: u32,
    format: PixelFormat,
    rows: Vec<u8>,
    closed: bool,
}

impl RowBuffer {
    fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        ensure!(width > 0 && height > 0, "image has no pixels");
        Ok(Self {
            width,
            height,
            format,
            rows: Vec::new(),
            closed: false,
        })
    }

    fn push_row(&mut self, row: &[u8]) -> Result<()> {
        ensure!(!self.closed, "writer is closed");
        let stride = self.width as usize * self.format.bytes_per_pixel();
        ensure!(
            row.len() == stride,
            "scanline is {} bytes, expected {stride}",
            row.len()
        );
        ensure!(
            self.rows.len() < stride * self.height as usize,
            "too many scanlines"
        );
        self.rows.extend_from_slice(row);
        Ok(())
    }

    /// Close the buffer and hand out the pixel data; fails unless
    /// every row arrived.
    fn take_complete(&mut self) -> Result<Vec<u8>> {
        ensure!(!self.closed, "writer is closed");
        self.closed = true;
        let expected = self.width as usize * self.format.bytes_per_pixel() * self.height as usize;
        ensure!(
            self.rows.len() == expected,
            "finalized with {} of {} pixel bytes",
            self.rows.len(),
            expected
        );
        Ok(std::mem::take(&mut self.rows))
    }

    fn abort(&mut self) {
        self.closed = true;
        self.rows = Vec::new();
    }

    fn color_type(&self) -> ExtendedColorType {
        match self.format {
            PixelFormat::Gray8 => ExtendedColorType::L8,
            PixelFormat::Rgb8 => ExtendedColorType::Rgb8,
            PixelFormat::Rgba8 => ExtendedColorType::Rgba8,
        }
    }
}

/// Scanline writer that encodes a JPEG on finalize.
pub struct JpegScanlineWriter {
    buffer: RowBuffer,
    quality: u8,
}

impl JpegScanlineWriter {
    /// JPEG carries no alpha channel; `Rgba8` input is refused.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        options: &JpegCompressionOptions,
    ) -> Result<Self> {
        if format == PixelFormat::Rgba8 {
            bail!("JPEG output cannot carry an alpha channel");
        }
        Ok(Self {
            buffer: RowBuffer::new(width, height, format)?,
            quality: options.quality,
        })
    }
}

impl ScanlineWriter for JpegScanlineWriter {
    fn write_next_scanline(&mut self, row: &[u8]) -> Result<()> {
        self.buffer.push_row(row)
    }

    fn finalize_write(&mut self) -> Result<Vec<u8>> {
        let pixels = self.buffer.take_complete()?;
        let mut out = Vec::new();
        let encoder = JpegEncoder::new_with_quality(&mut out, self.quality);
        encoder
            .write_image(
                &pixels,
                self.buffer.width,
                self.buffer.height,
                self.buffer.color_type(),
            )
            .context("encoding JPEG")?;
        Ok(out)
    }

    fn abort_write(&mut self) {
        self.buffer.abort();
    }
}

/// Scanline writer that re-encodes a PNG with the strongest
/// compression settings on finalize.
pub struct PngScanlineWriter {
    buffer: RowBuffer,
}

impl PngScanlineWriter {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        Ok(Self {
            buffer: RowBuffer::new(width, height, format)?,
        })
    }
}

impl ScanlineWriter for PngScanlineWriter {
    fn write_next_scanline(&mut self, row: &[u8]) -> Result<()> {
        self.buffer.push_row(row)
    }

    fn finalize_write(&mut self) -> Result<Vec<u8>> {
        let pixels = self.buffer.take_complete()?;
        let mut out = Vec::new();
        let encoder =
            PngEncoder::new_with_quality(&mut out, CompressionType::Best, FilterType::Adaptive);
        encoder
            .write_image(
                &pixels,
                self.buffer.width,
                self.buffer.height,
                self.buffer.color_type(),
            )
            .context("encoding PNG")?;
        Ok(out)
    }

    fn abort_write(&mut self) {
        self.buffer.abort();
    }
}

/// Scanline writer that encodes a lossless WebP on finalize.
pub struct WebpScanlineWriter {
    buffer: RowBuffer,
}

impl WebpScanlineWriter {
    pub fn new(width: u32, height: u32, format: PixelFormat) -> Result<Self> {
        if format == PixelFormat::Gray8 {
            bail!("lossless WebP supports RGB and RGBA input only");
        }
        Ok(Self {
            buffer: RowBuffer::new(width, height, format)?,
        })
    }
}

impl ScanlineWriter for WebpScanlineWriter {
    fn write_next_scanline(&mut self, row: &[u8]) -> Result<()> {
        self.buffer.push_row(row)
    }

    fn finalize_write(&mut self) -> Result<Vec<u8>> {
        let pixels = self.buffer.take_complete()?;
        let mut out = Vec::new();
        let encoder = WebPEncoder::new_lossless(&mut out);
        encoder
            .encode(
                &pixels,
                self.buffer.width,
                self.buffer.height,
                self.buffer.color_type(),
            )
            .context("encoding WebP")?;
        Ok(out)
    }

    fn abort_write(&mut self) {
        self.buffer.abort();
    }
}
