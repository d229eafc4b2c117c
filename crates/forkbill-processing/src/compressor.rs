//! Receipt compression pipeline.
//!
//! Decode, correct orientation, downscale within the envelope's dimension
//! caps, then encode JPEG while walking the quality down until the output
//! fits the envelope's byte budget (best effort: at the quality floor the
//! result is returned even if still over budget).

use anyhow::{Context, Result};
use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use std::io::Cursor;

use crate::envelope::CompressionEnvelope;
use crate::orientation;

/// Lowest quality the budget walk will try, on the 0-100 JPEG scale.
const QUALITY_FLOOR: u8 = 30;

/// Quality decrement per budget-walk iteration.
const QUALITY_STEP: u8 = 10;

/// Receipt image compressor.
pub struct ReceiptCompressor;

impl ReceiptCompressor {
    /// Compress raw image bytes according to the envelope.
    ///
    /// Output is always JPEG; re-encoding from raw pixels also drops any
    /// EXIF the original carried.
    pub fn compress(data: &[u8], envelope: &CompressionEnvelope) -> Result<Bytes> {
        let cursor = Cursor::new(data);
        let img = image::ImageReader::new(cursor)
            .with_guessed_format()
            .context("Failed to probe image format")?
            .decode()
            .context("Failed to decode receipt image")?;

        let img = orientation::apply_orientation(img, data);
        let img = Self::fit_within(img, envelope.max_width, envelope.max_height);

        Self::encode_within_budget(&img, envelope)
    }

    /// Async wrapper: image decode/encode is CPU-bound, so it runs off the
    /// async pool.
    pub async fn compress_async(data: Bytes, envelope: CompressionEnvelope) -> Result<Bytes> {
        tokio::task::spawn_blocking(move || Self::compress(&data, &envelope))
            .await
            .context("Compression task panicked")?
    }

    /// Downscale so neither dimension exceeds the caps, preserving aspect
    /// ratio. Images already within the caps are left untouched (never
    /// upscale).
    fn fit_within(img: DynamicImage, max_width: u32, max_height: u32) -> DynamicImage {
        let (width, height) = img.dimensions();
        if width <= max_width && height <= max_height {
            return img;
        }

        let scale = (max_width as f32 / width as f32).min(max_height as f32 / height as f32);
        let new_width = ((width as f32 * scale).round() as u32).max(1);
        let new_height = ((height as f32 * scale).round() as u32).max(1);

        let filter = Self::select_filter(width, height, new_width, new_height);
        tracing::debug!(
            from_width = width,
            from_height = height,
            to_width = new_width,
            to_height = new_height,
            "Downscaling receipt"
        );
        img.resize_exact(new_width, new_height, filter)
    }

    /// Filter choice follows the downscale ratio: heavy reductions tolerate
    /// cheaper filters.
    fn select_filter(
        orig_width: u32,
        orig_height: u32,
        new_width: u32,
        new_height: u32,
    ) -> image::imageops::FilterType {
        let width_ratio = orig_width as f32 / new_width as f32;
        let height_ratio = orig_height as f32 / new_height as f32;
        let max_ratio = width_ratio.max(height_ratio);

        if max_ratio > 2.0 {
            image::imageops::FilterType::Triangle
        } else if max_ratio > 1.5 {
            image::imageops::FilterType::CatmullRom
        } else {
            image::imageops::FilterType::Lanczos3
        }
    }

    /// Encode at the envelope quality, stepping quality down until the
    /// output fits the byte budget or the floor is reached.
    fn encode_within_budget(img: &DynamicImage, envelope: &CompressionEnvelope) -> Result<Bytes> {
        let budget = envelope.max_size_kb as usize * 1024;
        let mut quality = Self::starting_quality(envelope.quality);

        loop {
            let encoded = Self::encode_jpeg(img, quality)?;

            if encoded.len() <= budget {
                tracing::debug!(
                    quality = quality,
                    bytes = encoded.len(),
                    "Receipt fits byte budget"
                );
                return Ok(Bytes::from(encoded));
            }

            if quality <= QUALITY_FLOOR {
                tracing::warn!(
                    quality = quality,
                    bytes = encoded.len(),
                    budget = budget,
                    "Receipt still over byte budget at quality floor"
                );
                return Ok(Bytes::from(encoded));
            }

            quality = quality.saturating_sub(QUALITY_STEP).max(QUALITY_FLOOR);
        }
    }

    /// Map the envelope's 0-1 quality onto the 0-100 JPEG scale, clamped
    /// to the walkable range.
    fn starting_quality(quality: f32) -> u8 {
        ((quality * 100.0).round() as i32).clamp(QUALITY_FLOOR as i32, 100) as u8
    }

    fn encode_jpeg(img: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        let rgb_img = img.to_rgb8();
        let (width, height) = rgb_img.dimensions();

        let mut comp = mozjpeg::Compress::new(mozjpeg::ColorSpace::JCS_RGB);
        comp.set_size(width as usize, height as usize);
        comp.set_quality(quality as f32);
        comp.set_progressive_mode();
        comp.set_optimize_coding(true);

        let mut comp = comp.start_compress(Vec::new())?;
        comp.write_scanlines(&rgb_img)?;
        let jpeg_data = comp.finish()?;

        Ok(jpeg_data)
    }
}
