// THEORY:
// The aggregator makes exactly one pass over the sampled pixels of an image and
// reduces them to `AggregateStats`: how many samples fell into each class, and the
// mean of each single-pixel heuristic. Both composite scorers (the upload gate and the
// cosmetic scorer) read from the same stats, so one pass serves either use.
//
// Key principles:
// 1.  **Single pass, owned state**: the running sums live in a private `Accumulator`
//     that exists only for the duration of one call. Nothing survives between images.
// 2.  **Scan-order texture**: local roughness is approximated without a 2-D kernel.
//     From the third sample onward, the brightness step from the previous sample plus
//     the step before it is added to the texture sum.
// 3.  **Zero-safe normalization**: every ratio is count / samples, forced into [0, 1];
//     with zero samples every field is zero.

use crate::core_modules::calibration::cosmetic;
use crate::core_modules::pixel::pixel::{Brightness, Pixel};
use crate::core_modules::pixel_classifier::classify;
use crate::core_modules::sampler::PixelSampler;
use crate::error::Result;
use serde::Serialize;

/// Raw class counts. Each is bounded by `AggregateStats::total_pixels`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct PixelCounts {
    pub skin_tone: usize,
    pub hair_like: usize,
    /// Low hydration index at mid luminance.
    pub dry: usize,
    /// Bright and nearly achromatic (specular shine).
    pub shiny: usize,
    /// Small local scan-order variation.
    pub smooth: usize,
    /// Dark and nearly achromatic.
    pub pore: usize,
    /// Red strongly dominating green and blue.
    pub inflamed: usize,
    /// Red exceeding both other channels by a fixed margin.
    pub reddened: usize,
}

/// Mean channel values over the samples.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AverageColor {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

/// Everything the scorers need to know about one image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AggregateStats {
    pub total_pixels: usize,
    pub counts: PixelCounts,

    pub skin_tone_ratio: f64,
    pub hair_like_ratio: f64,
    pub dry_ratio: f64,
    pub shiny_ratio: f64,
    pub smooth_ratio: f64,
    pub pore_ratio: f64,
    pub inflammation_ratio: f64,
    pub redness_ratio: f64,

    /// Mean of (r+g+b)/3.
    pub average_brightness: f64,
    /// Mean Rec. 601 luminance.
    pub average_luminance: f64,
    /// Mean HSV saturation.
    pub average_saturation: f64,
    /// Mean per-pixel color variance.
    pub color_variance: f64,
    /// Mean scan-order local variation (summed over samples past the second).
    pub texture_score: f64,
    /// Mean of the local variation that exceeded the contrast threshold.
    pub contrast_score: f64,
    pub average_color: AverageColor,
}

#[derive(Debug, Default)]
struct Accumulator {
    total: usize,
    counts: PixelCounts,
    brightness_sum: f64,
    luminance_sum: f64,
    saturation_sum: f64,
    color_variance_sum: f64,
    texture_sum: f64,
    contrast_sum: f64,
    red_sum: u64,
    green_sum: u64,
    blue_sum: u64,
    /// Brightness of the previous sample in scan order.
    previous: Option<Brightness>,
    /// Brightness of the sample before `previous`.
    before_previous: Option<Brightness>,
}

impl Accumulator {
    fn push(&mut self, pixel: &Pixel) {
        self.total += 1;
        self.red_sum += pixel.red as u64;
        self.green_sum += pixel.green as u64;
        self.blue_sum += pixel.blue as u64;

        let brightness = pixel.brightness();
        let luminance = pixel.luminance();
        let saturation = pixel.saturation_hsv();
        self.brightness_sum += brightness;
        self.luminance_sum += luminance;
        self.saturation_sum += saturation;
        self.color_variance_sum += pixel.color_variance();

        let class = classify(pixel);
        if class.is_skin_tone {
            self.counts.skin_tone += 1;
        }
        if class.is_hair_like {
            self.counts.hair_like += 1;
        }

        if pixel.red_dominance() > cosmetic::INFLAMED_MIN_RED_DOMINANCE && pixel.red > cosmetic::INFLAMED_MIN_RED {
            self.counts.inflamed += 1;
        }

        let red = pixel.red as i16;
        if red > pixel.green as i16 + cosmetic::REDDENED_CHANNEL_MARGIN
            && red > pixel.blue as i16 + cosmetic::REDDENED_CHANNEL_MARGIN
            && pixel.red > cosmetic::REDDENED_MIN_RED
        {
            self.counts.reddened += 1;
        }

        let hydration_index = saturation * (pixel.green as f64 / (pixel.red as f64 + 1.0)) * (luminance / 255.0);
        if hydration_index < cosmetic::DRY_MAX_HYDRATION_INDEX
            && luminance > cosmetic::DRY_MIN_LUMINANCE
            && luminance < cosmetic::DRY_MAX_LUMINANCE
        {
            self.counts.dry += 1;
        }

        if luminance > cosmetic::SHINY_MIN_LUMINANCE && saturation < cosmetic::SHINY_MAX_SATURATION {
            self.counts.shiny += 1;
        }

        if luminance < cosmetic::PORE_MAX_LUMINANCE && saturation < cosmetic::PORE_MAX_SATURATION {
            self.counts.pore += 1;
        }

        if let (Some(previous), Some(before_previous)) = (self.previous, self.before_previous) {
            let local_variance = (brightness - previous).abs() + (previous - before_previous).abs();
            self.texture_sum += local_variance;
            if local_variance < cosmetic::SMOOTH_MAX_LOCAL_VARIANCE {
                self.counts.smooth += 1;
            }
            if local_variance > cosmetic::CONTRAST_MIN_LOCAL_VARIANCE {
                self.contrast_sum += local_variance;
            }
        }
        self.before_previous = self.previous;
        self.previous = Some(brightness);
    }

    fn finish(self) -> AggregateStats {
        if self.total == 0 {
            return AggregateStats::default();
        }
        let total = self.total as f64;
        let ratio = |count: usize| (count as f64 / total).clamp(0.0, 1.0);

        AggregateStats {
            total_pixels: self.total,
            counts: self.counts,
            skin_tone_ratio: ratio(self.counts.skin_tone),
            hair_like_ratio: ratio(self.counts.hair_like),
            dry_ratio: ratio(self.counts.dry),
            shiny_ratio: ratio(self.counts.shiny),
            smooth_ratio: ratio(self.counts.smooth),
            pore_ratio: ratio(self.counts.pore),
            inflammation_ratio: ratio(self.counts.inflamed),
            redness_ratio: ratio(self.counts.reddened),
            average_brightness: self.brightness_sum / total,
            average_luminance: self.luminance_sum / total,
            average_saturation: self.saturation_sum / total,
            color_variance: self.color_variance_sum / total,
            texture_score: self.texture_sum / total,
            contrast_score: self.contrast_sum / total,
            average_color: AverageColor {
                red: self.red_sum as f64 / total,
                green: self.green_sum as f64 / total,
                blue: self.blue_sum as f64 / total,
            },
        }
    }
}

/// Reduces already-extracted pixels, in scan order.
pub fn aggregate_pixels<I>(pixels: I) -> AggregateStats
where
    I: IntoIterator<Item = Pixel>,
{
    let mut accumulator = Accumulator::default();
    for pixel in pixels {
        accumulator.push(&pixel);
    }
    accumulator.finish()
}

/// Samples an RGBA buffer at `stride` and reduces it.
pub fn aggregate(buffer: &[u8], stride: usize) -> Result<AggregateStats> {
    let sampler = PixelSampler::new(buffer, stride)?;
    Ok(aggregate_pixels(sampler.samples()))
}
