// THEORY:
// Every number the classifier compares against lives here, and only here. The values
// were tuned by eye against real uploads and webcam frames; no model produced them, so
// they are preserved verbatim as calibration data rather than re-derived.
//
// The tables are grouped by consumer:
// - `SKIN_TONE_BANDS` and `hair`: the per-pixel classifier
// - `cosmetic`: the per-pixel flags accumulated for the live skin scorer
// - `gate`: the upload acceptance thresholds and confidence weights
// - `score`: the weights of the four cosmetic composite formulas

use crate::core_modules::pixel::pixel::{Channel, Pixel};
use serde::Serialize;

/// The tone family a skin band approximates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SkinTone {
    Light,
    Medium,
    Dark,
    Olive,
}

/// An inclusive rectangular box in RGB space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkinToneBand {
    pub tone: SkinTone,
    pub red_min: Channel,
    pub red_max: Channel,
    pub green_min: Channel,
    pub green_max: Channel,
    pub blue_min: Channel,
    pub blue_max: Channel,
}

impl SkinToneBand {
    pub fn contains(&self, pixel: &Pixel) -> bool {
        (self.red_min..=self.red_max).contains(&pixel.red)
            && (self.green_min..=self.green_max).contains(&pixel.green)
            && (self.blue_min..=self.blue_max).contains(&pixel.blue)
    }
}

pub const SKIN_TONE_BANDS: [SkinToneBand; 4] = [
    SkinToneBand {
        tone: SkinTone::Light,
        red_min: 180,
        red_max: 255,
        green_min: 140,
        green_max: 220,
        blue_min: 120,
        blue_max: 200,
    },
    SkinToneBand {
        tone: SkinTone::Medium,
        red_min: 120,
        red_max: 200,
        green_min: 90,
        green_max: 160,
        blue_min: 70,
        blue_max: 140,
    },
    SkinToneBand {
        tone: SkinTone::Dark,
        red_min: 60,
        red_max: 140,
        green_min: 40,
        green_max: 100,
        blue_min: 20,
        blue_max: 80,
    },
    SkinToneBand {
        tone: SkinTone::Olive,
        red_min: 140,
        red_max: 200,
        green_min: 120,
        green_max: 180,
        blue_min: 80,
        blue_max: 140,
    },
];

/// Hair-likeness rule thresholds. Brightness here is the plain channel mean.
pub mod hair {
    pub const DARK_MAX_BRIGHTNESS: f64 = 60.0;
    pub const DARK_MAX_SPREAD: u8 = 30;

    pub const BROWN_MAX_RED: u8 = 150;
    pub const BROWN_MAX_BRIGHTNESS: f64 = 100.0;

    pub const BLONDE_MIN_RED: u8 = 150;
    pub const BLONDE_MIN_GREEN: u8 = 130;
    pub const BLONDE_MAX_BLUE: u8 = 120;
    pub const BLONDE_MIN_BRIGHTNESS: f64 = 80.0;
    pub const BLONDE_MAX_BRIGHTNESS: f64 = 180.0;

    pub const GRAY_MAX_CHANNEL_GAP: i16 = 20;
    pub const GRAY_MIN_BRIGHTNESS: f64 = 120.0;
}

/// Per-pixel flags for the cosmetic scorer. Luminance is Rec. 601.
pub mod cosmetic {
    pub const INFLAMED_MIN_RED_DOMINANCE: f64 = 1.3;
    pub const INFLAMED_MIN_RED: u8 = 120;

    pub const REDDENED_CHANNEL_MARGIN: i16 = 20;
    pub const REDDENED_MIN_RED: u8 = 100;

    pub const DRY_MAX_HYDRATION_INDEX: f64 = 0.15;
    pub const DRY_MIN_LUMINANCE: f64 = 80.0;
    pub const DRY_MAX_LUMINANCE: f64 = 200.0;

    pub const SHINY_MIN_LUMINANCE: f64 = 190.0;
    pub const SHINY_MAX_SATURATION: f64 = 0.25;

    pub const PORE_MAX_LUMINANCE: f64 = 80.0;
    pub const PORE_MAX_SATURATION: f64 = 0.3;

    /// Local scan-order variation below this marks a smooth sample.
    pub const SMOOTH_MAX_LOCAL_VARIANCE: f64 = 15.0;
    /// Local scan-order variation above this contributes to contrast.
    pub const CONTRAST_MIN_LOCAL_VARIANCE: f64 = 25.0;
}

/// Upload acceptance thresholds and confidence weights.
pub mod gate {
    pub const MIN_SKIN_TONE_RATIO: f64 = 0.15;
    pub const MIN_HAIR_LIKE_RATIO: f64 = 0.10;
    pub const MIN_BRIGHTNESS: f64 = 30.0;
    pub const MAX_BRIGHTNESS: f64 = 220.0;
    pub const MIN_COLOR_VARIANCE: f64 = 500.0;

    pub const SKIN_POINTS_PER_RATIO: f64 = 200.0;
    pub const SKIN_POINTS_CAP: f64 = 30.0;
    pub const HAIR_POINTS_PER_RATIO: f64 = 250.0;
    pub const HAIR_POINTS_CAP: f64 = 25.0;

    pub const IDEAL_LIGHTING: (f64, f64) = (50.0, 200.0);
    pub const IDEAL_LIGHTING_POINTS: f64 = 25.0;
    pub const ACCEPTABLE_LIGHTING: (f64, f64) = (30.0, 220.0);
    pub const ACCEPTABLE_LIGHTING_POINTS: f64 = 15.0;

    pub const RICH_VARIANCE: f64 = 500.0;
    pub const RICH_VARIANCE_POINTS: f64 = 20.0;
    pub const SOME_VARIANCE: f64 = 200.0;
    pub const SOME_VARIANCE_POINTS: f64 = 10.0;

    pub const MIN_COVERAGE: f64 = 10.0;
    pub const MAX_COVERAGE: f64 = 95.0;
}

/// Composite formula weights for the four cosmetic metrics.
pub mod score {
    pub const HYDRATION_MOISTURE_GAIN: f64 = 150.0;
    pub const HYDRATION_DRY_PENALTY: f64 = 80.0;
    pub const HYDRATION_BASELINE: f64 = 20.0;

    pub const SMOOTHNESS_TEXTURE_GAIN: f64 = 2.0;
    pub const SMOOTHNESS_PORE_GAIN: f64 = 300.0;
    pub const SMOOTHNESS_SMOOTH_GAIN: f64 = 40.0;
    pub const SMOOTHNESS_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

    pub const REDNESS_INFLAMMATION_GAIN: f64 = 500.0;
    pub const REDNESS_TRADITIONAL_GAIN: f64 = 300.0;
    pub const REDNESS_BALANCE_GAIN: f64 = 0.8;
    pub const REDNESS_WEIGHTS: [f64; 3] = [0.4, 0.4, 0.2];

    pub const OILINESS_SHINE_GAIN: f64 = 600.0;
    pub const OILINESS_BRIGHTNESS_PIVOT: f64 = 130.0;
    pub const OILINESS_BRIGHTNESS_GAIN: f64 = 1.5;
    pub const OILINESS_SATURATION_PIVOT: f64 = 0.35;
    pub const OILINESS_SATURATION_GAIN: f64 = 180.0;
    pub const OILINESS_CONTRAST_GAIN: f64 = 0.6;
    pub const OILINESS_CONTRAST_CAP: f64 = 40.0;
    pub const OILINESS_WEIGHTS: [f64; 4] = [0.4, 0.3, 0.2, 0.1];
}
