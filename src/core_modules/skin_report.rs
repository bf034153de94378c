// THEORY:
// The session report is the end-of-session summary: mean metrics, a skin-type label,
// an overall health score, and the concerns worth acting on. It is derived entirely
// from a `SessionHistory`; an empty history yields a fixed wellness report so a
// session that never saw a face still produces something to show.

use crate::core_modules::cosmetic_scorer::SkinMetrics;
use crate::core_modules::mood::Emotion;
use crate::core_modules::session_history::{MeanMetrics, SessionHistory};
use serde::Serialize;
use std::fmt;

const WELLNESS_METRICS: MeanMetrics = MeanMetrics {
    hydration: 65,
    smoothness: 70,
    redness: 25,
    oiliness: 45,
};
const WELLNESS_HEALTH_SCORE: f64 = 75.0;
/// Oiliness furthest from this reads as less healthy in either direction.
const BALANCED_OILINESS: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkinType {
    GeneralWellness,
    Oily,
    Dry,
    Combination,
    Sensitive,
    Normal,
}

impl SkinType {
    /// First match wins.
    pub fn classify(metrics: &MeanMetrics) -> Self {
        let MeanMetrics { hydration, redness, oiliness, .. } = *metrics;
        if oiliness > 60 && hydration > 50 {
            SkinType::Oily
        } else if hydration < 40 && oiliness < 30 {
            SkinType::Dry
        } else if oiliness > 50 && hydration < 50 {
            SkinType::Combination
        } else if redness > 40 {
            SkinType::Sensitive
        } else {
            SkinType::Normal
        }
    }
}

impl fmt::Display for SkinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkinType::GeneralWellness => "General Wellness",
            SkinType::Oily => "Oily",
            SkinType::Dry => "Dry",
            SkinType::Combination => "Combination",
            SkinType::Sensitive => "Sensitive",
            SkinType::Normal => "Normal",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HealthStatus {
    Excellent,
    Good,
    Fair,
    NeedsAttention,
}

impl HealthStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            HealthStatus::Excellent
        } else if score >= 60.0 {
            HealthStatus::Good
        } else if score >= 40.0 {
            HealthStatus::Fair
        } else {
            HealthStatus::NeedsAttention
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HealthStatus::Excellent => "Excellent",
            HealthStatus::Good => "Good",
            HealthStatus::Fair => "Fair",
            HealthStatus::NeedsAttention => "Needs Attention",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallHealth {
    pub score: f64,
    pub status: HealthStatus,
}

impl OverallHealth {
    pub fn from_metrics(metrics: &MeanMetrics) -> Self {
        let hydration = metrics.hydration as f64;
        let smoothness = metrics.smoothness as f64;
        let redness = metrics.redness as f64;
        let oiliness = metrics.oiliness as f64;
        let score = (hydration + smoothness + (100.0 - redness) + (100.0 - (oiliness - BALANCED_OILINESS).abs())) / 4.0;
        OverallHealth {
            score,
            status: HealthStatus::from_score(score),
        }
    }
}

/// A condition the session averages point to, with the actives usually suggested for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkinConcern {
    Dehydrated,
    Irritation,
    ExcessOil,
    RoughTexture,
}

impl SkinConcern {
    pub fn for_metrics(metrics: &MeanMetrics) -> Vec<SkinConcern> {
        let mut concerns = Vec::new();
        if metrics.hydration < 40 {
            concerns.push(SkinConcern::Dehydrated);
        }
        if metrics.redness > 40 {
            concerns.push(SkinConcern::Irritation);
        }
        if metrics.oiliness > 60 {
            concerns.push(SkinConcern::ExcessOil);
        }
        if metrics.smoothness < 50 {
            concerns.push(SkinConcern::RoughTexture);
        }
        concerns
    }

    pub fn label(&self) -> &'static str {
        match self {
            SkinConcern::Dehydrated => "Dehydrated Skin",
            SkinConcern::Irritation => "Skin Irritation/Redness",
            SkinConcern::ExcessOil => "Excess Oil Production",
            SkinConcern::RoughTexture => "Rough Skin Texture",
        }
    }

    pub fn ingredients(&self) -> &'static [&'static str] {
        match self {
            SkinConcern::Dehydrated => &["Hyaluronic Acid", "Ceramides", "Glycerin"],
            SkinConcern::Irritation => &["Niacinamide", "Centella Asiatica", "Aloe Vera", "Green Tea Extract"],
            SkinConcern::ExcessOil => &["Salicylic Acid", "Niacinamide", "Clay Masks", "Retinol"],
            SkinConcern::RoughTexture => &["AHA (Glycolic/Lactic Acid)", "Retinol", "Vitamin C"],
        }
    }
}

/// Live per-reading hints shown next to the meters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkinAdvisory {
    HydrationNeeded,
    RednessDetected,
    OilySkin,
    TextureImprovement,
}

impl SkinAdvisory {
    pub fn for_reading(metrics: &SkinMetrics) -> Vec<SkinAdvisory> {
        let mut advisories = Vec::new();
        if metrics.hydration < 40 {
            advisories.push(SkinAdvisory::HydrationNeeded);
        }
        if metrics.redness > 30 {
            advisories.push(SkinAdvisory::RednessDetected);
        }
        if metrics.oiliness > 60 {
            advisories.push(SkinAdvisory::OilySkin);
        }
        if metrics.smoothness < 50 {
            advisories.push(SkinAdvisory::TextureImprovement);
        }
        advisories
    }
}

impl fmt::Display for SkinAdvisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SkinAdvisory::HydrationNeeded => "Hydration Needed",
            SkinAdvisory::RednessDetected => "Redness Detected",
            SkinAdvisory::OilySkin => "Oily Skin Detected",
            SkinAdvisory::TextureImprovement => "Texture Improvement",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    /// Number of skin readings the means were taken over; zero for a wellness report.
    pub readings: usize,
    pub metrics: MeanMetrics,
    pub mood: Emotion,
    pub skin_type: SkinType,
    pub overall_health: OverallHealth,
    pub concerns: Vec<SkinConcern>,
}

impl SessionReport {
    pub fn from_history(history: &SessionHistory) -> Self {
        match history.mean_metrics() {
            Some(metrics) => SessionReport {
                readings: history.skin_readings().len(),
                metrics,
                mood: history.dominant_mood(),
                skin_type: SkinType::classify(&metrics),
                overall_health: OverallHealth::from_metrics(&metrics),
                concerns: SkinConcern::for_metrics(&metrics),
            },
            None => Self::wellness(),
        }
    }

    /// Placeholder report for a session that recorded no skin readings.
    pub fn wellness() -> Self {
        SessionReport {
            readings: 0,
            metrics: WELLNESS_METRICS,
            mood: Emotion::Neutral,
            skin_type: SkinType::GeneralWellness,
            overall_health: OverallHealth {
                score: WELLNESS_HEALTH_SCORE,
                status: HealthStatus::Good,
            },
            concerns: Vec::new(),
        }
    }

    pub fn is_wellness(&self) -> bool {
        self.readings == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mean(hydration: u8, smoothness: u8, redness: u8, oiliness: u8) -> MeanMetrics {
        MeanMetrics {
            hydration,
            smoothness,
            redness,
            oiliness,
        }
    }

    #[test]
    fn skin_type_first_match() {
        assert_eq!(SkinType::classify(&mean(60, 70, 50, 70)), SkinType::Oily);
        assert_eq!(SkinType::classify(&mean(30, 70, 50, 20)), SkinType::Dry);
        assert_eq!(SkinType::classify(&mean(45, 70, 10, 55)), SkinType::Combination);
        assert_eq!(SkinType::classify(&mean(60, 70, 45, 40)), SkinType::Sensitive);
        assert_eq!(SkinType::classify(&mean(60, 70, 20, 40)), SkinType::Normal);
    }

    #[test]
    fn health_score_formula() {
        // (80 + 80 + 90 + 100) / 4
        let health = OverallHealth::from_metrics(&mean(80, 80, 10, 40));
        assert_eq!(health.score, 87.5);
        assert_eq!(health.status, HealthStatus::Excellent);

        let health = OverallHealth::from_metrics(&mean(0, 0, 100, 100));
        assert_eq!(health.score, 10.0);
        assert_eq!(health.status, HealthStatus::NeedsAttention);
        assert_eq!(HealthStatus::from_score(60.0), HealthStatus::Good);
        assert_eq!(HealthStatus::from_score(40.0), HealthStatus::Fair);
    }

    #[test]
    fn concerns_all_that_apply() {
        let concerns = SkinConcern::for_metrics(&mean(30, 40, 50, 70));
        assert_eq!(
            concerns,
            vec![
                SkinConcern::Dehydrated,
                SkinConcern::Irritation,
                SkinConcern::ExcessOil,
                SkinConcern::RoughTexture
            ]
        );
        assert!(SkinConcern::for_metrics(&mean(60, 70, 20, 40)).is_empty());
        assert!(SkinConcern::Irritation.ingredients().contains(&"Niacinamide"));
    }

    #[test]
    fn advisories_use_live_thresholds() {
        let metrics = SkinMetrics {
            hydration: 50,
            smoothness: 60,
            redness: 31,
            oiliness: 60,
            ..SkinMetrics::default()
        };
        assert_eq!(SkinAdvisory::for_reading(&metrics), vec![SkinAdvisory::RednessDetected]);
    }

    #[test]
    fn empty_history_is_wellness() {
        let report = SessionReport::from_history(&SessionHistory::new(25, 30));
        assert!(report.is_wellness());
        assert_eq!(report.metrics, WELLNESS_METRICS);
        assert_eq!(report.skin_type, SkinType::GeneralWellness);
        assert_eq!(report.overall_health.score, 75.0);
        assert_eq!(report.overall_health.status, HealthStatus::Good);
        assert_eq!(report.mood, Emotion::Neutral);
    }

    #[test]
    fn report_from_readings() {
        let mut history = SessionHistory::new(25, 30);
        history.record_skin(SkinMetrics {
            hydration: 30,
            smoothness: 80,
            redness: 20,
            oiliness: 20,
            ..SkinMetrics::default()
        });
        let report = SessionReport::from_history(&history);
        assert_eq!(report.readings, 1);
        assert_eq!(report.skin_type, SkinType::Dry);
        assert_eq!(report.concerns, vec![SkinConcern::Dehydrated]);
        assert_eq!(report.skin_type.to_string(), "Dry");
    }
}
