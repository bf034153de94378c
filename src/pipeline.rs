// THEORY:
// The `pipeline` module is the top-level API of the library. It wraps the pure
// core modules with the image-handling steps a caller actually faces:
//
// - `ScalpValidator`: decoded upload -> fixed-size canvas resample -> sample ->
//   aggregate -> validity gate. Resampling onto one canvas size makes every upload
//   contribute the same number of samples, whatever its resolution.
// - `SkinAnalyzer`: camera frame + face bounding box -> crop -> sample ->
//   aggregate -> cosmetic scorer.
// - `validate_paths`: many files gated concurrently, decoding on the blocking pool,
//   results returned in input order.

use crate::config::{CosmeticConfig, GateConfig};
use crate::core_modules::aggregator::aggregate_pixels;
use crate::core_modules::cosmetic_scorer::{self, SkinMetrics};
use crate::core_modules::sampler::PixelSampler;
use crate::core_modules::validity_gate::{self, GateResult};
use crate::error::{Result, VisionError};
use futures::stream::{self, StreamExt};
use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A face rectangle in frame pixel coordinates. The origin may lie outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// The whole of a `width` x `height` frame.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// The part of this box inside the frame as `(x, y, width, height)`, or `None`
    /// when they do not overlap.
    pub fn clip(&self, frame_width: u32, frame_height: u32) -> Option<(u32, u32, u32, u32)> {
        let left = i64::from(self.x).max(0);
        let top = i64::from(self.y).max(0);
        let right = (i64::from(self.x) + i64::from(self.width)).min(i64::from(frame_width));
        let bottom = (i64::from(self.y) + i64::from(self.height)).min(i64::from(frame_height));
        if right <= left || bottom <= top {
            return None;
        }
        Some((left as u32, top as u32, (right - left) as u32, (bottom - top) as u32))
    }

    fn empty_region(&self, frame_width: u32, frame_height: u32) -> VisionError {
        VisionError::EmptyRegion {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            frame_width,
            frame_height,
        }
    }
}

/// Stretches an image onto a `width` x `height` RGBA canvas.
pub fn resample_to_canvas(image: &DynamicImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(&image.to_rgba8(), width, height, FilterType::Triangle)
}

/// Gates uploads for hair/scalp content.
#[derive(Debug, Clone)]
pub struct ScalpValidator {
    config: GateConfig,
}

impl ScalpValidator {
    pub fn new(config: GateConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Gates a raw RGBA buffer of exactly `width` x `height` pixels, as given.
    pub fn validate_buffer(&self, buffer: &[u8], width: u32, height: u32) -> Result<GateResult> {
        let sampler = PixelSampler::for_dimensions(buffer, width, height, self.config.sample_stride)?;
        let stats = aggregate_pixels(sampler.samples());
        Ok(validity_gate::evaluate(&stats))
    }

    /// Resamples onto the configured canvas, then gates.
    pub fn validate_image(&self, image: &DynamicImage) -> Result<GateResult> {
        let canvas = resample_to_canvas(image, self.config.canvas_width, self.config.canvas_height);
        let result = self.validate_buffer(canvas.as_raw(), canvas.width(), canvas.height())?;
        match result.rejection {
            None => debug!(
                confidence = result.confidence,
                hair_coverage = result.hair_coverage,
                "upload accepted"
            ),
            Some(reason) => warn!(
                ?reason,
                confidence = result.confidence,
                brightness = result.details.average_brightness,
                "upload rejected"
            ),
        }
        Ok(result)
    }

    pub fn validate_path(&self, path: &Path) -> Result<GateResult> {
        let image = image::open(path)?;
        debug!(path = %path.display(), width = image.width(), height = image.height(), "decoded upload");
        self.validate_image(&image)
    }
}

/// Decodes and gates every path concurrently, one blocking task per file with at
/// most `num_cpus` in flight. Results keep the input order.
pub async fn validate_paths<I, P>(paths: I, config: GateConfig) -> Result<Vec<(PathBuf, Result<GateResult>)>>
where
    I: IntoIterator<Item = P>,
    P: Into<PathBuf>,
{
    let validator = ScalpValidator::new(config)?;
    let results: Vec<(PathBuf, Result<GateResult>)> = stream::iter(paths.into_iter().map(Into::into))
        .map(|path: PathBuf| {
            let validator = validator.clone();
            async move {
                let task_path = path.clone();
                let result = tokio::task::spawn_blocking(move || validator.validate_path(&task_path))
                    .await
                    .unwrap_or_else(|join_error| Err(VisionError::from(join_error)));
                (path, result)
            }
        })
        .buffered(num_cpus::get())
        .collect()
        .await;

    let accepted = results.iter().filter(|(_, result)| matches!(result, Ok(gate) if gate.is_valid)).count();
    info!(total = results.len(), accepted, "batch validation complete");
    Ok(results)
}

/// Scores skin-condition metrics over a face region.
#[derive(Debug, Clone)]
pub struct SkinAnalyzer {
    config: CosmeticConfig,
}

impl SkinAnalyzer {
    pub fn new(config: CosmeticConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn analyze_buffer(&self, buffer: &[u8]) -> Result<SkinMetrics> {
        cosmetic_scorer::score_buffer(buffer, self.config.sample_stride)
    }

    /// Crops `region` out of `frame` (clipped to the frame) and scores it.
    pub fn analyze_region(&self, frame: &RgbaImage, region: &BoundingBox) -> Result<SkinMetrics> {
        let (x, y, width, height) = region
            .clip(frame.width(), frame.height())
            .ok_or_else(|| region.empty_region(frame.width(), frame.height()))?;
        let crop = imageops::crop_imm(frame, x, y, width, height).to_image();
        let metrics = self.analyze_buffer(crop.as_raw())?;
        debug!(
            hydration = metrics.hydration,
            smoothness = metrics.smoothness,
            redness = metrics.redness,
            oiliness = metrics.oiliness,
            "skin region scored"
        );
        Ok(metrics)
    }

    pub fn analyze_image(&self, frame: &RgbaImage) -> Result<SkinMetrics> {
        self.analyze_region(frame, &BoundingBox::full(frame.width(), frame.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::validity_gate::RejectionReason;
    use image::Rgba;

    #[test]
    fn clip_inside_frame() {
        let bbox = BoundingBox::new(10, 20, 30, 40);
        assert_eq!(bbox.clip(100, 100), Some((10, 20, 30, 40)));
    }

    #[test]
    fn clip_partially_outside() {
        let bbox = BoundingBox::new(-10, 90, 30, 40);
        assert_eq!(bbox.clip(100, 100), Some((0, 90, 20, 10)));
    }

    #[test]
    fn clip_disjoint() {
        assert_eq!(BoundingBox::new(100, 0, 10, 10).clip(100, 100), None);
        assert_eq!(BoundingBox::new(-10, 0, 10, 10).clip(100, 100), None);
        assert_eq!(BoundingBox::new(0, 0, 0, 10).clip(100, 100), None);
    }

    #[test]
    fn canvas_resample_is_fixed_size() {
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(640, 480, Rgba([0, 0, 0, 255])));
        let canvas = resample_to_canvas(&image, 224, 224);
        assert_eq!(canvas.dimensions(), (224, 224));
    }

    #[test]
    fn black_upload_is_too_dark() {
        let validator = ScalpValidator::new(GateConfig::default()).expect("default config");
        let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(800, 600, Rgba([0, 0, 0, 255])));
        let result = validator.validate_image(&image).expect("valid image");
        assert!(!result.is_valid);
        assert_eq!(result.rejection, Some(RejectionReason::TooDark));
        assert_eq!(result.details.total_pixels, 224 * 224 / 8);
    }

    #[test]
    fn buffer_must_match_dimensions() {
        let validator = ScalpValidator::new(GateConfig::default()).expect("default config");
        let result = validator.validate_buffer(&[0u8; 16], 3, 3);
        assert!(matches!(result, Err(VisionError::BufferLength { expected: 36, actual: 16 })));
    }

    #[test]
    fn zero_stride_config_is_rejected() {
        let config = GateConfig {
            sample_stride: 0,
            ..GateConfig::default()
        };
        assert!(matches!(ScalpValidator::new(config), Err(VisionError::InvalidStride)));
        assert!(SkinAnalyzer::new(CosmeticConfig { sample_stride: 0 }).is_err());
    }

    #[test]
    fn region_crop_only_sees_the_face() {
        let mut frame = RgbaImage::from_pixel(100, 100, Rgba([20, 20, 200, 255]));
        for y in 40..60 {
            for x in 40..60 {
                frame.put_pixel(x, y, Rgba([210, 70, 60, 255]));
            }
        }
        let analyzer = SkinAnalyzer::new(CosmeticConfig::default()).expect("default config");
        let face = analyzer.analyze_region(&frame, &BoundingBox::new(40, 40, 20, 20)).expect("overlaps");
        assert_eq!(face.avg_color.r, 210);
        assert_eq!(face.inflammation_ratio, 1.0);

        let whole = analyzer.analyze_image(&frame).expect("full frame");
        assert!(whole.avg_color.b > face.avg_color.b);
    }

    #[test]
    fn region_outside_frame_is_an_error() {
        let frame = RgbaImage::new(50, 50);
        let analyzer = SkinAnalyzer::new(CosmeticConfig::default()).expect("default config");
        let result = analyzer.analyze_region(&frame, &BoundingBox::new(60, 60, 10, 10));
        assert!(matches!(result, Err(VisionError::EmptyRegion { .. })));
    }
}
