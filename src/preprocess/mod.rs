//! Image preprocessing before OCR.
//!
//! Pages go through color denoising, grayscale conversion, adaptive Gaussian
//! thresholding and skew correction, and are written out as PNG.

mod skew;

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use imageproc::filter::{gaussian_blur_f32, median_filter};

use crate::error::Result;

pub use skew::{
    estimate_rotation, line_angles, representative_angle, rotate_expanded, rotation_for,
    HoughAccumulator,
};

/// Preprocessing configuration.
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    /// Median filter radius for color denoising (0 disables)
    pub denoise_radius: u32,

    /// Neighbourhood size of the adaptive threshold (odd)
    pub threshold_block_size: u32,

    /// Constant subtracted from the weighted neighbourhood mean
    pub threshold_offset: i32,

    /// Gaussian smoothing applied before edge detection
    pub canny_sigma: f32,

    /// Number of Hough peaks considered for skew estimation
    pub num_peaks: usize,

    /// Whether skew correction runs at all
    pub deskew: bool,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            denoise_radius: 1,
            threshold_block_size: 11,
            threshold_offset: 2,
            canny_sigma: 3.0,
            num_peaks: 20,
            deskew: true,
        }
    }
}

impl PreprocessOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable skew correction.
    pub fn with_deskew(mut self, deskew: bool) -> Self {
        self.deskew = deskew;
        self
    }

    /// Set the median filter radius.
    pub fn with_denoise_radius(mut self, radius: u32) -> Self {
        self.denoise_radius = radius;
        self
    }
}

/// Runs the preprocessing steps on page images.
#[derive(Debug, Clone, Default)]
pub struct ImagePreprocessor {
    options: PreprocessOptions,
}

impl ImagePreprocessor {
    pub fn new(options: PreprocessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PreprocessOptions {
        &self.options
    }

    /// Denoise, binarize and deskew a page.
    pub fn process(&self, image: &DynamicImage) -> GrayImage {
        let rgb = image.to_rgb8();
        let denoised = if self.options.denoise_radius > 0 {
            median_filter(&rgb, self.options.denoise_radius, self.options.denoise_radius)
        } else {
            rgb
        };

        let gray = DynamicImage::ImageRgb8(denoised).into_luma8();
        let binary = adaptive_gaussian_threshold(
            &gray,
            self.options.threshold_block_size,
            self.options.threshold_offset,
        );

        if !self.options.deskew {
            return binary;
        }

        let rotation =
            estimate_rotation(&binary, self.options.canny_sigma, self.options.num_peaks);
        rotate_expanded(&binary, rotation)
    }

    /// Process a page and write it to `output` as PNG.
    pub fn process_to_file(&self, image: &DynamicImage, output: &Path) -> Result<()> {
        let processed = self.process(image);
        processed.save_with_format(output, ImageFormat::Png)?;
        Ok(())
    }
}

/// Encode a grayscale image as PNG bytes.
pub fn encode_png(image: &GrayImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Binarize against a Gaussian-weighted local mean.
///
/// A pixel turns white when it is brighter than the weighted mean of its
/// `block_size` neighbourhood minus `offset`, black otherwise.
pub fn adaptive_gaussian_threshold(image: &GrayImage, block_size: u32, offset: i32) -> GrayImage {
    let block_size = block_size.max(3) | 1;
    let sigma = 0.3 * ((block_size - 1) as f32 * 0.5 - 1.0) + 0.8;
    let local_mean = gaussian_blur_f32(image, sigma);

    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let value = image.get_pixel(x, y)[0] as i32;
        let mean = local_mean.get_pixel(x, y)[0] as i32;
        if value > mean - offset {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}
