use serde::{Deserialize, Serialize};

/// Expression labels reported by the analysis engine, in canonical order.
///
/// The declaration order is load-bearing: dominant-label ties and summary
/// ties both resolve to the earlier variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
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

    pub fn label(self) -> &'static str {
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

    /// Capitalized label, as used for tabular column headers.
    pub fn title(self) -> &'static str {
        match self {
            Emotion::Neutral => "Neutral",
            Emotion::Happy => "Happy",
            Emotion::Sad => "Sad",
            Emotion::Angry => "Angry",
            Emotion::Fearful => "Fearful",
            Emotion::Disgusted => "Disgusted",
            Emotion::Surprised => "Surprised",
        }
    }

    /// RGBA hex color used by chart and summary collaborators.
    pub fn display_color(self) -> &'static str {
        match self {
            Emotion::Neutral => "#c8c8c8ff",
            Emotion::Happy => "#ffe876ff",
            Emotion::Sad => "#7f9fffff",
            Emotion::Angry => "#ff496eff",
            Emotion::Fearful => "#ff4fffff",
            Emotion::Disgusted => "#35ea35ff",
            Emotion::Surprised => "#ffb356ff",
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Emotion::ALL
            .into_iter()
            .find(|e| e.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown emotion label '{s}'"))
    }
}

/// Per-label confidences for one face.
///
/// Scores are not required to sum to 1; only their relative order matters
/// for the dominant label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ScoreMap", into = "ScoreMap")]
pub struct ExpressionScores {
    scores: [f64; 7],
}

impl ExpressionScores {
    /// Scores in canonical order: neutral, happy, sad, angry, fearful,
    /// disgusted, surprised.
    pub fn new(scores: [f64; 7]) -> Self {
        Self { scores }
    }

    /// All zero except `emotion`.
    pub fn single(emotion: Emotion, score: f64) -> Self {
        Self::default().with(emotion, score)
    }

    pub fn with(mut self, emotion: Emotion, score: f64) -> Self {
        self.scores[emotion.slot()] = score;
        self
    }

    pub fn get(&self, emotion: Emotion) -> f64 {
        self.scores[emotion.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Emotion, f64)> + '_ {
        Emotion::ALL.into_iter().map(|e| (e, self.get(e)))
    }

    /// Argmax label; ties go to the first label in canonical order.
    pub fn dominant(&self) -> Emotion {
        let mut best = Emotion::Neutral;
        let mut best_score = self.get(best);
        for (emotion, score) in self.iter().skip(1) {
            if score > best_score || (best_score.is_nan() && !score.is_nan()) {
                best = emotion;
                best_score = score;
            }
        }
        best
    }

    /// Labels at or above `min_score`, highest first.
    pub fn ranked_above(&self, min_score: f64) -> Vec<(Emotion, f64)> {
        let mut ranked: Vec<(Emotion, f64)> =
            self.iter().filter(|(_, s)| *s >= min_score).collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

#[derive(Clone, Copy, Default, Serialize, Deserialize)]
struct ScoreMap {
    #[serde(default)]
    neutral: f64,
    #[serde(default)]
    happy: f64,
    #[serde(default)]
    sad: f64,
    #[serde(default)]
    angry: f64,
    #[serde(default)]
    fearful: f64,
    #[serde(default)]
    disgusted: f64,
    #[serde(default)]
    surprised: f64,
}

impl From<ScoreMap> for ExpressionScores {
    fn from(m: ScoreMap) -> Self {
        Self::new([
            m.neutral,
            m.happy,
            m.sad,
            m.angry,
            m.fearful,
            m.disgusted,
            m.surprised,
        ])
    }
}

impl From<ExpressionScores> for ScoreMap {
    fn from(s: ExpressionScores) -> Self {
        Self {
            neutral: s.get(Emotion::Neutral),
            happy: s.get(Emotion::Happy),
            sad: s.get(Emotion::Sad),
            angry: s.get(Emotion::Angry),
            fearful: s.get(Emotion::Fearful),
            disgusted: s.get(Emotion::Disgusted),
            surprised: s.get(Emotion::Surprised),
        }
    }
}
