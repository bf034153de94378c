// THEORY:
// The cosmetic scorer turns one frame's `AggregateStats` into four display percentages.
// Each metric is a fixed-weight blend of a few aggregate terms; the weights live in
// `calibration::score`. Every metric is clamped into [0, 100] after its blend and then
// rounded, so no input, however extreme, can leave the display range.
//
// The scorer holds no state. Averaging across frames belongs to `session_history`.

use crate::core_modules::aggregator::{AggregateStats, aggregate};
use crate::core_modules::calibration::score;
use crate::error::Result;
use serde::Serialize;

/// Mean color of the sampled region, each channel rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RoundedColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// One frame's cosmetic reading.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SkinMetrics {
    pub hydration: u8,
    pub smoothness: u8,
    pub redness: u8,
    pub oiliness: u8,
    pub avg_color: RoundedColor,
    /// Mean Rec. 601 luminance, rounded.
    pub brightness: u8,
    pub shine_ratio: f64,
    pub saturation: f64,
    pub texture_score: f64,
    pub inflammation_ratio: f64,
    pub dry_ratio: f64,
}

fn to_percent(value: f64) -> u8 {
    value.clamp(0.0, 100.0).round() as u8
}

fn channel(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

pub fn hydration(stats: &AggregateStats) -> f64 {
    let color = stats.average_color;
    let green_over_red = if color.red > 0.0 { color.green / color.red } else { 0.0 };
    let moisture = stats.average_saturation * green_over_red * (1.0 - stats.dry_ratio);
    let base = (moisture * score::HYDRATION_MOISTURE_GAIN).min(100.0);
    (base - stats.dry_ratio * score::HYDRATION_DRY_PENALTY + score::HYDRATION_BASELINE).clamp(0.0, 100.0)
}

pub fn smoothness(stats: &AggregateStats) -> f64 {
    let [texture_weight, pore_weight, smooth_weight] = score::SMOOTHNESS_WEIGHTS;
    let texture_quality = (100.0 - stats.texture_score * score::SMOOTHNESS_TEXTURE_GAIN).max(0.0);
    let pore_quality = (100.0 - stats.pore_ratio * score::SMOOTHNESS_PORE_GAIN).max(0.0);
    let smooth_bonus = stats.smooth_ratio * score::SMOOTHNESS_SMOOTH_GAIN;
    (texture_weight * texture_quality + pore_weight * pore_quality + smooth_weight * smooth_bonus).clamp(0.0, 100.0)
}

pub fn redness(stats: &AggregateStats) -> f64 {
    let [inflammation_weight, traditional_weight, balance_weight] = score::REDNESS_WEIGHTS;
    let color = stats.average_color;
    let inflammation = (stats.inflammation_ratio * score::REDNESS_INFLAMMATION_GAIN).min(100.0);
    let traditional = (stats.redness_ratio * score::REDNESS_TRADITIONAL_GAIN).min(100.0);
    let balance = ((color.red - color.green - color.blue / 2.0) * score::REDNESS_BALANCE_GAIN).max(0.0);
    (inflammation_weight * inflammation + traditional_weight * traditional + balance_weight * balance)
        .clamp(0.0, 100.0)
}

/// Shine, overall brightness, desaturation and local contrast.
/// Brightness here is mean luminance, not the channel mean the gate uses.
pub fn oiliness(stats: &AggregateStats) -> f64 {
    let [shine_weight, brightness_weight, saturation_weight, contrast_weight] = score::OILINESS_WEIGHTS;
    let shine = (stats.shiny_ratio * score::OILINESS_SHINE_GAIN).min(100.0);
    let brightness =
        ((stats.average_luminance - score::OILINESS_BRIGHTNESS_PIVOT) * score::OILINESS_BRIGHTNESS_GAIN).max(0.0);
    let saturation =
        ((score::OILINESS_SATURATION_PIVOT - stats.average_saturation) * score::OILINESS_SATURATION_GAIN).max(0.0);
    let contrast = (stats.contrast_score * score::OILINESS_CONTRAST_GAIN).min(score::OILINESS_CONTRAST_CAP);
    (shine_weight * shine + brightness_weight * brightness + saturation_weight * saturation + contrast_weight * contrast)
        .clamp(0.0, 100.0)
}

pub fn score(stats: &AggregateStats) -> SkinMetrics {
    let color = stats.average_color;
    SkinMetrics {
        hydration: to_percent(hydration(stats)),
        smoothness: to_percent(smoothness(stats)),
        redness: to_percent(redness(stats)),
        oiliness: to_percent(oiliness(stats)),
        avg_color: RoundedColor {
            r: channel(color.red),
            g: channel(color.green),
            b: channel(color.blue),
        },
        brightness: channel(stats.average_luminance),
        shine_ratio: stats.shiny_ratio,
        saturation: stats.average_saturation,
        texture_score: stats.texture_score,
        inflammation_ratio: stats.inflammation_ratio,
        dry_ratio: stats.dry_ratio,
    }
}

/// Samples and scores a raw RGBA buffer.
pub fn score_buffer(buffer: &[u8], stride: usize) -> Result<SkinMetrics> {
    Ok(score(&aggregate(buffer, stride)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::aggregator::AverageColor;

    #[test]
    fn empty_stats_score() {
        let metrics = score(&AggregateStats::default());
        // Only the hydration baseline and the pore and texture qualities survive.
        assert_eq!(metrics.hydration, 20);
        assert_eq!(metrics.smoothness, 80);
        assert_eq!(metrics.redness, 0);
        // 0.2 * (0.35 * 180)
        assert_eq!(metrics.oiliness, 13);
        assert_eq!(metrics.avg_color, RoundedColor::default());
    }

    #[test]
    fn hydration_with_zero_red() {
        let stats = AggregateStats {
            average_saturation: 1.0,
            average_color: AverageColor { red: 0.0, green: 200.0, blue: 0.0 },
            ..AggregateStats::default()
        };
        assert_eq!(hydration(&stats), 20.0);
    }

    #[test]
    fn dryness_lowers_hydration() {
        let moist = AggregateStats {
            average_saturation: 0.4,
            average_color: AverageColor { red: 180.0, green: 140.0, blue: 120.0 },
            ..AggregateStats::default()
        };
        let dry = AggregateStats { dry_ratio: 0.8, ..moist };
        assert!(hydration(&dry) < hydration(&moist));
        assert_eq!(hydration(&AggregateStats { dry_ratio: 1.0, ..moist }), 0.0);
    }

    #[test]
    fn saturated_inputs_stay_in_range() {
        let extreme = AggregateStats {
            total_pixels: 1,
            shiny_ratio: 1.0,
            inflammation_ratio: 1.0,
            redness_ratio: 1.0,
            smooth_ratio: 1.0,
            average_luminance: 255.0,
            contrast_score: 510.0,
            texture_score: 510.0,
            average_color: AverageColor { red: 255.0, green: 0.0, blue: 0.0 },
            ..AggregateStats::default()
        };
        let metrics = score(&extreme);
        assert_eq!(metrics.redness, 100);
        assert!(metrics.oiliness <= 100);
        assert!(metrics.smoothness <= 100);
        assert_eq!(metrics.brightness, 255);
    }

    #[test]
    fn red_patch_scores_red() {
        let buffer: Vec<u8> = std::iter::repeat([210u8, 70, 60, 255]).take(512).flatten().collect();
        let metrics = score_buffer(&buffer, 8).expect("aligned");
        assert!(metrics.redness > 60, "redness {}", metrics.redness);
        assert_eq!(metrics.inflammation_ratio, 1.0);
        assert_eq!(metrics.avg_color, RoundedColor { r: 210, g: 70, b: 60 });
    }

    #[test]
    fn flat_patch_is_smooth() {
        let buffer: Vec<u8> = std::iter::repeat([190u8, 150, 120, 255]).take(2048).flatten().collect();
        let metrics = score_buffer(&buffer, 8).expect("aligned");
        assert!(metrics.smoothness >= 80);
        assert_eq!(metrics.texture_score, 0.0);
    }
}
