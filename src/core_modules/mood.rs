// THEORY:
// Facial-expression scores come from an external model; this module only interprets
// them. Each frame gets a dominant emotion and a coarse confidence label. Over a
// session, the dominant mood is the emotion that most often won with a meaningful
// score.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Scores below this do not count toward the session's dominant mood.
pub const MOOD_MIN_SCORE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    #[default]
    Neutral,
    Happy,
    Sad,
    Angry,
    Fearful,
    Disgusted,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 7] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Fearful,
        Emotion::Disgusted,
        Emotion::Surprised,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Fearful => "fearful",
            Emotion::Disgusted => "disgusted",
            Emotion::Surprised => "surprised",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Raw per-emotion probabilities from the expression model.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionScores {
    pub neutral: f64,
    pub happy: f64,
    pub sad: f64,
    pub angry: f64,
    pub fearful: f64,
    pub disgusted: f64,
    pub surprised: f64,
}

impl ExpressionScores {
    pub fn get(&self, emotion: Emotion) -> f64 {
        match emotion {
            Emotion::Neutral => self.neutral,
            Emotion::Happy => self.happy,
            Emotion::Sad => self.sad,
            Emotion::Angry => self.angry,
            Emotion::Fearful => self.fearful,
            Emotion::Disgusted => self.disgusted,
            Emotion::Surprised => self.surprised,
        }
    }

    /// Scores paired with their emotions, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(move |emotion| (emotion, self.get(emotion)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score > 0.7 {
            ConfidenceLevel::High
        } else if score > 0.4 {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        f.write_str(label)
    }
}

/// One frame's interpreted expression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MoodReading {
    pub emotion: Emotion,
    pub score: f64,
    pub confidence: ConfidenceLevel,
    pub scores: ExpressionScores,
}

impl MoodReading {
    /// Highest score wins; an earlier emotion keeps a tie. All-zero scores read as neutral.
    pub fn from_scores(scores: ExpressionScores) -> Self {
        let (emotion, score) = scores
            .iter()
            .fold((Emotion::Neutral, 0.0), |best, candidate| if candidate.1 > best.1 { candidate } else { best });
        MoodReading {
            emotion,
            score,
            confidence: ConfidenceLevel::from_score(score),
            scores,
        }
    }
}

/// Most frequent emotion among readings scoring above `MOOD_MIN_SCORE`.
///
/// On a tie in counts the emotion first seen later wins. With no qualifying
/// readings the mood is neutral.
pub fn dominant_mood<'a, I>(readings: I) -> Emotion
where
    I: IntoIterator<Item = &'a MoodReading>,
{
    let mut order: Vec<Emotion> = Vec::new();
    let mut counts: HashMap<Emotion, usize> = HashMap::new();
    for reading in readings.into_iter().filter(|reading| reading.score > MOOD_MIN_SCORE) {
        let count = counts.entry(reading.emotion).or_insert(0);
        if *count == 0 {
            order.push(reading.emotion);
        }
        *count += 1;
    }

    let count_of = |emotion: &Emotion| counts.get(emotion).copied().unwrap_or(0);
    let mut winner: Option<Emotion> = None;
    for emotion in order {
        winner = match winner {
            Some(current) if count_of(&current) > count_of(&emotion) => Some(current),
            _ => Some(emotion),
        };
    }
    winner.unwrap_or_default()
}
