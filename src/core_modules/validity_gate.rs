// THEORY:
// The validity gate decides whether an uploaded photo plausibly shows hair and scalp,
// and if not, tells the user the single most useful thing to fix. It is a pure function
// of `AggregateStats`: the same stats always produce the same `GateResult`.
//
// Acceptance needs all four of: enough skin-toned samples, enough hair-like samples,
// brightness strictly inside the usable band, and enough color variance to show
// detail. When an image fails, the first matching reason is reported, exposure
// problems first since a black or blown-out frame cannot be judged for skin or hair.

use crate::core_modules::aggregator::{AggregateStats, aggregate};
use crate::core_modules::calibration::gate;
use crate::error::Result;
use serde::Serialize;
use std::fmt;

const VALID_MESSAGE: &str = "Valid hair/scalp image detected with good quality.";

/// Why an upload was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RejectionReason {
    TooDark,
    Overexposed,
    NoSkinDetected,
    InsufficientHairCoverage,
    InsufficientQuality,
}

impl RejectionReason {
    /// The message shown to the person who uploaded the image.
    pub fn message(&self) -> &'static str {
        match self {
            RejectionReason::TooDark => "Image too dark. Please ensure good lighting conditions.",
            RejectionReason::Overexposed => "Image overexposed. Please reduce lighting or avoid flash.",
            RejectionReason::NoSkinDetected => "No skin/scalp detected in image. Please ensure scalp is visible.",
            RejectionReason::InsufficientHairCoverage => {
                "Insufficient hair/scalp coverage. Please capture more of the scalp area."
            }
            RejectionReason::InsufficientQuality => {
                "Image quality insufficient for analysis. Please try a clearer photo."
            }
        }
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Coarse label for the confidence score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ImageQuality {
    Good,
    Fair,
    Poor,
}

impl ImageQuality {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > 0.7 {
            ImageQuality::Good
        } else if confidence > 0.4 {
            ImageQuality::Fair
        } else {
            ImageQuality::Poor
        }
    }
}

impl fmt::Display for ImageQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ImageQuality::Good => "Good",
            ImageQuality::Fair => "Fair",
            ImageQuality::Poor => "Poor",
        };
        f.write_str(label)
    }
}

/// Outcome of gating one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GateResult {
    pub is_valid: bool,
    /// In [0, 1].
    pub confidence: f64,
    /// Percentage in [10, 95].
    pub hair_coverage: u8,
    /// `None` exactly when `is_valid`.
    pub rejection: Option<RejectionReason>,
    pub reason: &'static str,
    pub details: AggregateStats,
}

impl GateResult {
    pub fn quality(&self) -> ImageQuality {
        ImageQuality::from_confidence(self.confidence)
    }
}

pub fn is_valid(stats: &AggregateStats) -> bool {
    stats.skin_tone_ratio > gate::MIN_SKIN_TONE_RATIO
        && stats.hair_like_ratio > gate::MIN_HAIR_LIKE_RATIO
        && stats.average_brightness > gate::MIN_BRIGHTNESS
        && stats.average_brightness < gate::MAX_BRIGHTNESS
        && stats.color_variance > gate::MIN_COLOR_VARIANCE
}

/// 25 points in the ideal band, 15 in the acceptable band, else nothing.
pub fn lighting_score(brightness: f64) -> f64 {
    let (ideal_low, ideal_high) = gate::IDEAL_LIGHTING;
    let (ok_low, ok_high) = gate::ACCEPTABLE_LIGHTING;
    if (ideal_low..=ideal_high).contains(&brightness) {
        gate::IDEAL_LIGHTING_POINTS
    } else if (ok_low..=ok_high).contains(&brightness) {
        gate::ACCEPTABLE_LIGHTING_POINTS
    } else {
        0.0
    }
}

pub fn variance_score(color_variance: f64) -> f64 {
    if color_variance > gate::RICH_VARIANCE {
        gate::RICH_VARIANCE_POINTS
    } else if color_variance > gate::SOME_VARIANCE {
        gate::SOME_VARIANCE_POINTS
    } else {
        0.0
    }
}

/// Weighted sum of skin presence, hair presence, lighting and detail, scaled to [0, 1].
pub fn confidence_score(stats: &AggregateStats) -> f64 {
    let skin_points = (stats.skin_tone_ratio * gate::SKIN_POINTS_PER_RATIO).min(gate::SKIN_POINTS_CAP);
    let hair_points = (stats.hair_like_ratio * gate::HAIR_POINTS_PER_RATIO).min(gate::HAIR_POINTS_CAP);
    let points = skin_points
        + hair_points
        + lighting_score(stats.average_brightness)
        + variance_score(stats.color_variance);
    (points / 100.0).clamp(0.0, 1.0)
}

/// Combined skin and hair share as a whole percentage, floored, kept in [10, 95].
pub fn hair_coverage(stats: &AggregateStats) -> u8 {
    let coverage = ((stats.skin_tone_ratio + stats.hair_like_ratio) * 100.0).clamp(gate::MIN_COVERAGE, gate::MAX_COVERAGE);
    coverage.floor() as u8
}

/// First failing condition, or `None` when the image passes.
pub fn rejection_reason(stats: &AggregateStats) -> Option<RejectionReason> {
    if is_valid(stats) {
        return None;
    }
    let reason = if stats.average_brightness <= gate::MIN_BRIGHTNESS {
        RejectionReason::TooDark
    } else if stats.average_brightness >= gate::MAX_BRIGHTNESS {
        RejectionReason::Overexposed
    } else if stats.skin_tone_ratio < gate::MIN_SKIN_TONE_RATIO {
        RejectionReason::NoSkinDetected
    } else if stats.hair_like_ratio < gate::MIN_HAIR_LIKE_RATIO {
        RejectionReason::InsufficientHairCoverage
    } else {
        RejectionReason::InsufficientQuality
    };
    Some(reason)
}

pub fn evaluate(stats: &AggregateStats) -> GateResult {
    let rejection = rejection_reason(stats);
    GateResult {
        is_valid: rejection.is_none(),
        confidence: confidence_score(stats),
        hair_coverage: hair_coverage(stats),
        rejection,
        reason: rejection.map_or(VALID_MESSAGE, |reason| reason.message()),
        details: *stats,
    }
}

/// Samples and gates a raw RGBA buffer.
pub fn evaluate_buffer(buffer: &[u8], stride: usize) -> Result<GateResult> {
    Ok(evaluate(&aggregate(buffer, stride)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::pixel::pixel::Pixel;

    fn stats(skin: f64, hair: f64, brightness: f64, variance: f64) -> AggregateStats {
        AggregateStats {
            total_pixels: 100,
            skin_tone_ratio: skin,
            hair_like_ratio: hair,
            average_brightness: brightness,
            color_variance: variance,
            ..AggregateStats::default()
        }
    }

    fn uniform(pixel: Pixel, count: usize) -> Vec<u8> {
        std::iter::repeat(<[u8; 4]>::from(pixel)).take(count).flatten().collect()
    }

    #[test]
    fn passing_image() {
        let result = evaluate(&stats(0.4, 0.3, 120.0, 900.0));
        assert!(result.is_valid);
        assert_eq!(result.rejection, None);
        assert_eq!(result.reason, VALID_MESSAGE);
        // 30 + 25 + 25 + 20
        assert!((result.confidence - 1.0).abs() < 1e-12);
        assert_eq!(result.hair_coverage, 70);
        assert_eq!(result.quality(), ImageQuality::Good);
    }

    #[test]
    fn all_black_canvas_is_too_dark() {
        let result = evaluate_buffer(&uniform(Pixel::rgb(0, 0, 0), 224 * 224), 8).expect("aligned");
        assert!(!result.is_valid);
        assert_eq!(result.details.skin_tone_ratio, 0.0);
        assert_eq!(result.details.hair_like_ratio, 1.0);
        assert_eq!(result.rejection, Some(RejectionReason::TooDark));
        assert_eq!(result.reason, RejectionReason::TooDark.message());
    }

    #[test]
    fn uniform_skin_lacks_hair() {
        let result = evaluate_buffer(&uniform(Pixel::rgb(190, 150, 120), 224 * 224), 8).expect("aligned");
        assert!(!result.is_valid);
        assert_eq!(result.details.skin_tone_ratio, 1.0);
        assert_eq!(result.details.hair_like_ratio, 0.0);
        // Per-pixel chroma spread, not spatial variance: a flat skin tone still scores.
        assert!((result.details.color_variance - 7400.0 / 3.0).abs() < 1e-6);
        assert_eq!(result.rejection, Some(RejectionReason::InsufficientHairCoverage));
        assert_eq!(result.hair_coverage, 95);
    }

    #[test]
    fn reasons_in_order() {
        assert_eq!(rejection_reason(&stats(0.0, 0.0, 30.0, 0.0)), Some(RejectionReason::TooDark));
        assert_eq!(rejection_reason(&stats(0.0, 0.0, 220.0, 0.0)), Some(RejectionReason::Overexposed));
        assert_eq!(rejection_reason(&stats(0.1, 0.0, 100.0, 0.0)), Some(RejectionReason::NoSkinDetected));
        assert_eq!(
            rejection_reason(&stats(0.5, 0.05, 100.0, 900.0)),
            Some(RejectionReason::InsufficientHairCoverage)
        );
        assert_eq!(
            rejection_reason(&stats(0.5, 0.5, 100.0, 100.0)),
            Some(RejectionReason::InsufficientQuality)
        );
        // Exactly on the skin threshold fails acceptance but is not "no skin".
        assert_eq!(
            rejection_reason(&stats(0.15, 0.5, 100.0, 900.0)),
            Some(RejectionReason::InsufficientQuality)
        );
    }

    #[test]
    fn lighting_bands() {
        assert_eq!(lighting_score(50.0), 25.0);
        assert_eq!(lighting_score(200.0), 25.0);
        assert_eq!(lighting_score(30.0), 15.0);
        assert_eq!(lighting_score(220.0), 15.0);
        assert_eq!(lighting_score(29.9), 0.0);
        assert_eq!(lighting_score(221.0), 0.0);
    }

    #[test]
    fn variance_bands() {
        assert_eq!(variance_score(500.0), 10.0);
        assert_eq!(variance_score(500.1), 20.0);
        assert_eq!(variance_score(200.0), 0.0);
    }

    #[test]
    fn coverage_is_bounded() {
        assert_eq!(hair_coverage(&stats(0.0, 0.0, 0.0, 0.0)), 10);
        assert_eq!(hair_coverage(&stats(1.0, 1.0, 0.0, 0.0)), 95);
        assert_eq!(hair_coverage(&stats(0.259, 0.0, 0.0, 0.0)), 25);
    }

    #[test]
    fn quality_labels() {
        assert_eq!(ImageQuality::from_confidence(0.71), ImageQuality::Good);
        assert_eq!(ImageQuality::from_confidence(0.7), ImageQuality::Fair);
        assert_eq!(ImageQuality::from_confidence(0.4), ImageQuality::Poor);
    }
}
