// THEORY:
// A live session keeps the most recent readings for display averaging only. Each
// window is a `VecDeque` that drops its oldest entry once it reaches capacity. The
// scorers never see this state; it exists purely for the session summary.

use crate::core_modules::cosmetic_scorer::SkinMetrics;
use crate::core_modules::mood::{Emotion, MoodReading, dominant_mood};
use serde::Serialize;
use std::collections::VecDeque;

/// Fixed-capacity FIFO of the latest readings.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingWindow<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_front();
        }
        self.items.push_back(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}

/// Rounded means of the four cosmetic metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MeanMetrics {
    pub hydration: u8,
    pub smoothness: u8,
    pub redness: u8,
    pub oiliness: u8,
}

#[derive(Debug, Clone)]
pub struct SessionHistory {
    skin: RollingWindow<SkinMetrics>,
    mood: RollingWindow<MoodReading>,
}

impl SessionHistory {
    pub fn new(metric_window: usize, mood_window: usize) -> Self {
        Self {
            skin: RollingWindow::new(metric_window),
            mood: RollingWindow::new(mood_window),
        }
    }

    pub fn record_skin(&mut self, metrics: SkinMetrics) {
        self.skin.push(metrics);
    }

    pub fn record_mood(&mut self, reading: MoodReading) {
        self.mood.push(reading);
    }

    pub fn skin_readings(&self) -> &RollingWindow<SkinMetrics> {
        &self.skin
    }

    pub fn mood_readings(&self) -> &RollingWindow<MoodReading> {
        &self.mood
    }

    /// `None` until at least one skin reading has been recorded.
    pub fn mean_metrics(&self) -> Option<MeanMetrics> {
        if self.skin.is_empty() {
            return None;
        }
        let count = self.skin.len() as f64;
        let mean = |field: fn(&SkinMetrics) -> u8| {
            let total: f64 = self.skin.iter().map(|metrics| field(metrics) as f64).sum();
            (total / count).round() as u8
        };
        Some(MeanMetrics {
            hydration: mean(|metrics| metrics.hydration),
            smoothness: mean(|metrics| metrics.smoothness),
            redness: mean(|metrics| metrics.redness),
            oiliness: mean(|metrics| metrics.oiliness),
        })
    }

    pub fn dominant_mood(&self) -> Emotion {
        dominant_mood(self.mood.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::mood::ExpressionScores;

    fn metrics(hydration: u8, smoothness: u8, redness: u8, oiliness: u8) -> SkinMetrics {
        SkinMetrics {
            hydration,
            smoothness,
            redness,
            oiliness,
            ..SkinMetrics::default()
        }
    }

    #[test]
    fn window_evicts_oldest() {
        let mut window = RollingWindow::new(3);
        for value in 1..=5 {
            window.push(value);
        }
        assert_eq!(window.len(), 3);
        assert_eq!(window.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(window.latest(), Some(&5));
    }

    #[test]
    fn zero_capacity_window_stays_empty() {
        let mut window = RollingWindow::new(0);
        window.push(1);
        assert!(window.is_empty());
    }

    #[test]
    fn means_are_rounded() {
        let mut history = SessionHistory::new(25, 30);
        assert_eq!(history.mean_metrics(), None);
        history.record_skin(metrics(40, 70, 10, 50));
        history.record_skin(metrics(41, 70, 11, 50));
        let mean = history.mean_metrics().expect("two readings");
        // 40.5 rounds away from zero
        assert_eq!(mean.hydration, 41);
        assert_eq!(mean.smoothness, 70);
        assert_eq!(mean.redness, 11);
    }

    #[test]
    fn skin_window_holds_last_twenty_five() {
        let mut history = SessionHistory::new(25, 30);
        for _ in 0..25 {
            history.record_skin(metrics(0, 0, 0, 0));
        }
        for _ in 0..25 {
            history.record_skin(metrics(100, 100, 100, 100));
        }
        assert_eq!(history.skin_readings().len(), 25);
        assert_eq!(history.mean_metrics().map(|mean| mean.hydration), Some(100));
    }

    #[test]
    fn mood_follows_window() {
        let mut history = SessionHistory::new(25, 2);
        let happy = MoodReading::from_scores(ExpressionScores { happy: 0.9, ..ExpressionScores::default() });
        let sad = MoodReading::from_scores(ExpressionScores { sad: 0.9, ..ExpressionScores::default() });
        history.record_mood(happy);
        history.record_mood(sad);
        history.record_mood(sad);
        assert_eq!(history.dominant_mood(), Emotion::Sad);
    }
}
