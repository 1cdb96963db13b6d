//! Image conversion entry points and smallest-output selection.

use anyhow::Result;
use serde::Serialize;

use crate::debug;

use super::codecs::{
    JpegCompressionOptions, JpegScanlineWriter, PngScanlineReader, PngScanlineWriter,
    WebpScanlineWriter,
};
use super::scanline::{ScanlineReader, convert_image};

/// A lossy candidate must shrink to at most this fraction of the best
/// lossless candidate to win a selection; the quality loss has to buy
/// real savings.
const MIN_LOSSY_SAVINGS_RATIO: f64 = 0.8;

/// Output format chosen by the selection helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertedFormat {
    /// No rendition beat the input; keep the original bytes.
    Original,
    Png,
    Jpeg,
    Webp,
}

/// Re-encode a PNG with the strongest compression settings.
pub fn optimize_png(png: &[u8]) -> Result<Vec<u8>> {
    let mut reader = PngScanlineReader::new(png)?;
    let mut writer =
        PngScanlineWriter::new(reader.width(), reader.height(), reader.pixel_format())?;
    convert_image(&mut reader, &mut writer)
}

/// Convert a PNG to JPEG. Fails for images with transparency.
pub fn convert_png_to_jpeg(png: &[u8], options: &JpegCompressionOptions) -> Result<Vec<u8>> {
    let mut reader = PngScanlineReader::new(png)?;
    let mut writer = JpegScanlineWriter::new(
        reader.width(),
        reader.height(),
        reader.pixel_format(),
        options,
    )?;
    convert_image(&mut reader, &mut writer)
}

/// Convert a PNG to lossless WebP.
pub fn convert_png_to_webp(png: &[u8]) -> Result<Vec<u8>> {
    let mut reader = PngScanlineReader::new(png)?;
    let mut writer =
        WebpScanlineWriter::new(reader.width(), reader.height(), reader.pixel_format())?;
    convert_image(&mut reader, &mut writer)
}

/// Optimize the PNG and, when the JPEG rendition is at least 20%
/// smaller, return that instead.
pub fn optimize_png_or_convert_to_jpeg(
    png: &[u8],
    options: &JpegCompressionOptions,
) -> Result<(Vec<u8>, ConvertedFormat)> {
    let jpeg = convert_png_to_jpeg(png, options);
    let optimized = optimize_png(png);
    match (optimized, jpeg) {
        (Ok(png_out), Ok(jpeg_out)) => {
            if (jpeg_out.len() as f64) <= png_out.len() as f64 * MIN_LOSSY_SAVINGS_RATIO {
                Ok((jpeg_out, ConvertedFormat::Jpeg))
            } else {
                Ok((png_out, ConvertedFormat::Png))
            }
        }
        (Ok(png_out), Err(err)) => {
            debug!("image"; "JPEG conversion failed: {err:#}");
            Ok((png_out, ConvertedFormat::Png))
        }
        (Err(err), Ok(jpeg_out)) => {
            debug!("image"; "PNG optimization failed: {err:#}");
            Ok((jpeg_out, ConvertedFormat::Jpeg))
        }
        (Err(png_err), Err(_)) => Err(png_err),
    }
}

/// Pick the smallest rendition among the original bytes, the optimized
/// PNG, lossless WebP, and - only when options are provided - JPEG.
///
/// The lossless candidates compete on size alone; the lossy JPEG must
/// additionally clear [`MIN_LOSSY_SAVINGS_RATIO`] against the best of
/// them.
pub fn smallest_of_png_jpeg_webp(
    png: &[u8],
    jpeg_options: Option<&JpegCompressionOptions>,
) -> (ConvertedFormat, Vec<u8>) {
    let mut best = (ConvertedFormat::Original, png.to_vec());

    match convert_png_to_webp(png) {
        Ok(webp) => select_smaller(&mut best, ConvertedFormat::Webp, webp, 1.0),
        Err(err) => debug!("image"; "WebP conversion failed: {err:#}"),
    }
    match optimize_png(png) {
        Ok(optimized) => select_smaller(&mut best, ConvertedFormat::Png, optimized, 1.0),
        Err(err) => debug!("image"; "PNG optimization failed: {err:#}"),
    }
    if let Some(options) = jpeg_options {
        match convert_png_to_jpeg(png, options) {
            Ok(jpeg) => select_smaller(
                &mut best,
                ConvertedFormat::Jpeg,
                jpeg,
                MIN_LOSSY_SAVINGS_RATIO,
            ),
            Err(err) => debug!("image"; "JPEG conversion failed: {err:#}"),
        }
    }
    best
}

/// Replace `best` with the candidate when the candidate is smaller
/// than `threshold` times the current best size.
fn select_smaller(
    best: &mut (ConvertedFormat, Vec<u8>),
    format: ConvertedFormat,
    candidate: Vec<u8>,
    threshold: f64,
) {
    if candidate.is_empty() {
        return;
    }
    if (candidate.len() as f64) < best.1.len() as f64 * threshold {
        *best = (format, candidate);
    }
}
