// Text and JSON presentation of library results. Nothing here feeds back into the analysis.

use derma_vision::core_modules::cosmetic_scorer::SkinMetrics;
use derma_vision::core_modules::skin_report::SessionReport;
use derma_vision::core_modules::validity_gate::GateResult;
use derma_vision::live_session::FrameReading;
use serde_json::{Value, json};
use std::fmt::Write;
use std::path::Path;

const BAR_WIDTH: usize = 20;

fn bar(percent: u8) -> String {
    let filled = (percent as usize * BAR_WIDTH).div_ceil(100).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

pub fn gate_report(path: &Path, result: &GateResult) -> String {
    let verdict = if result.is_valid { "VALID" } else { "REJECTED" };
    let details = &result.details;
    let mut out = String::new();
    let _ = writeln!(out, "{} -- {verdict}", path.display());
    let _ = writeln!(out, "  {}", result.reason);
    let _ = writeln!(
        out,
        "  confidence {:.0}% ({}), coverage {}%",
        result.confidence * 100.0,
        result.quality(),
        result.hair_coverage
    );
    let _ = write!(
        out,
        "  skin {:.1}%  hair {:.1}%  brightness {:.0}  texture detail {:.0}",
        details.skin_tone_ratio * 100.0,
        details.hair_like_ratio * 100.0,
        details.average_brightness,
        details.color_variance
    );
    out
}

pub fn gate_json(path: &Path, result: &GateResult) -> Value {
    json!({
        "path": path.display().to_string(),
        "isValid": result.is_valid,
        "confidence": result.confidence,
        "hairCoverage": result.hair_coverage,
        "reason": result.reason,
        "details": result.details,
    })
}

pub fn metrics_report(metrics: &SkinMetrics) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("hydration", metrics.hydration),
        ("smoothness", metrics.smoothness),
        ("redness", metrics.redness),
        ("oiliness", metrics.oiliness),
    ] {
        let _ = writeln!(out, "{label:>10} {} {value:>3}%", bar(value));
    }
    let color = metrics.avg_color;
    let _ = write!(
        out,
        "{:>10} rgb({}, {}, {})  brightness {}",
        "color", color.r, color.g, color.b, metrics.brightness
    );
    out
}

pub fn reading_line(reading: &FrameReading) -> String {
    let metrics = &reading.metrics;
    let mut line = format!(
        "frame {:>4}: hyd {:>3} smooth {:>3} red {:>3} oil {:>3}",
        reading.frame_id, metrics.hydration, metrics.smoothness, metrics.redness, metrics.oiliness
    );
    if let Some(mood) = &reading.mood {
        let _ = write!(line, "  mood {} ({})", mood.emotion, mood.confidence);
    }
    for advisory in &reading.advisories {
        let _ = write!(line, "  [{advisory}]");
    }
    line
}

pub fn session_report(report: &SessionReport) -> String {
    let mut out = String::new();
    let heading = if report.is_wellness() {
        "Wellness report (no skin readings recorded)".to_string()
    } else {
        format!("Session report over {} readings", report.readings)
    };
    let _ = writeln!(out, "{heading}");
    let _ = writeln!(out, "  skin type: {}", report.skin_type);
    let _ = writeln!(
        out,
        "  overall health: {:.0}/100 ({})",
        report.overall_health.score, report.overall_health.status
    );
    let _ = writeln!(out, "  mood: {}", report.mood);
    let metrics = report.metrics;
    let _ = write!(
        out,
        "  hydration {}%  smoothness {}%  redness {}%  oiliness {}%",
        metrics.hydration, metrics.smoothness, metrics.redness, metrics.oiliness
    );
    for concern in &report.concerns {
        let _ = write!(out, "\n  concern: {} -> {}", concern.label(), concern.ingredients().join(", "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(bar(100), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(bar(50).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn wellness_report_heading() {
        let text = session_report(&SessionReport::wellness());
        assert!(text.starts_with("Wellness report"));
        assert!(text.contains("General Wellness"));
        assert!(text.contains("75/100 (Good)"));
    }
}
