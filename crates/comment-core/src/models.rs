use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One of the four categories a comment is classified into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Sentiment {
    #[serde(rename = "question")]
    Question,
    #[serde(rename = "positive affirmation")]
    PositiveAffirmation,
    #[default]
    #[serde(rename = "neutral affirmation")]
    NeutralAffirmation,
    #[serde(rename = "negative affirmation")]
    NegativeAffirmation,
}

impl Sentiment {
    /// Every category, in report order.
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Question,
        Sentiment::PositiveAffirmation,
        Sentiment::NeutralAffirmation,
        Sentiment::NegativeAffirmation,
    ];

    /// Canonical label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Question => "question",
            Sentiment::PositiveAffirmation => "positive affirmation",
            Sentiment::NeutralAffirmation => "neutral affirmation",
            Sentiment::NegativeAffirmation => "negative affirmation",
        }
    }

    /// Short heading used in the summary section (`Question`, `Positive`, ...).
    pub fn display_name(&self) -> &'static str {
        match self {
            Sentiment::Question => "Question",
            Sentiment::PositiveAffirmation => "Positive",
            Sentiment::NeutralAffirmation => "Neutral",
            Sentiment::NegativeAffirmation => "Negative",
        }
    }

    /// Single-character glyph used in per-theme breakdowns.
    pub fn short_code(&self) -> &'static str {
        match self {
            Sentiment::Question => "Q",
            Sentiment::PositiveAffirmation => "+",
            Sentiment::NeutralAffirmation => "=",
            Sentiment::NegativeAffirmation => "-",
        }
    }

    /// Parse free-form model output into a category.
    ///
    /// Surrounding quotes, backticks and trailing punctuation are ignored and
    /// matching is case-insensitive. When the text is not one of the canonical
    /// labels, the first keyword found (`question`, `negative`, `positive`,
    /// `neutral`) decides. Returns `None` when nothing matches.
    pub fn parse_label(raw: &str) -> Option<Sentiment> {
        let lowered = raw.trim().to_lowercase();
        let cleaned = lowered
            .trim_matches(|c: char| c == '"' || c == '\'' || c == '`' || c == '.' || c.is_whitespace());

        if let Some(exact) = Self::ALL.iter().find(|s| s.label() == cleaned) {
            return Some(*exact);
        }

        if cleaned.contains("question") {
            Some(Sentiment::Question)
        } else if cleaned.contains("negative") {
            Some(Sentiment::NegativeAffirmation)
        } else if cleaned.contains("positive") {
            Some(Sentiment::PositiveAffirmation)
        } else if cleaned.contains("neutral") {
            Some(Sentiment::NeutralAffirmation)
        } else {
            None
        }
    }

    /// Like [`parse_label`](Self::parse_label) but unknown text maps to
    /// [`Sentiment::NeutralAffirmation`].
    pub fn from_label(raw: &str) -> Sentiment {
        Self::parse_label(raw).unwrap_or(Sentiment::NeutralAffirmation)
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Sentiment {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Sentiment::from_label(&raw))
    }
}

/// A single top-level YouTube comment as returned by stage one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Video the comment was posted under.
    pub video_id: String,
    /// YouTube comment-thread identifier.
    #[serde(default)]
    pub comment_id: String,
    /// Display name of the author.
    pub author: String,
    /// Plain-text body.
    pub text: String,
    /// Like count at fetch time.
    #[serde(default)]
    pub likes: u64,
    /// When the comment was first published.
    pub published_at: DateTime<Utc>,
    /// Number of replies in the thread.
    #[serde(default)]
    pub reply_count: u64,
}

/// A [`Comment`] enriched with the translated text and its sentiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub cleaned_text: String,
    #[serde(default)]
    pub sentiment: Sentiment,
}

/// On-disk shape of the processing stage output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessedBatch {
    pub comments: Vec<ProcessedComment>,
}

/// Per-category counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    pub question: u64,
    pub positive: u64,
    pub neutral: u64,
    pub negative: u64,
}

impl SentimentCounts {
    pub fn add(&mut self, sentiment: Sentiment) {
        *self.slot_mut(sentiment) += 1;
    }

    pub fn get(&self, sentiment: Sentiment) -> u64 {
        match sentiment {
            Sentiment::Question => self.question,
            Sentiment::PositiveAffirmation => self.positive,
            Sentiment::NeutralAffirmation => self.neutral,
            Sentiment::NegativeAffirmation => self.negative,
        }
    }

    pub fn total(&self) -> u64 {
        self.question + self.positive + self.neutral + self.negative
    }

    /// Category with the highest count; ties go to the earlier category in
    /// [`Sentiment::ALL`]. `None` when nothing was counted.
    pub fn most_common(&self) -> Option<Sentiment> {
        if self.total() == 0 {
            return None;
        }
        let mut best = Sentiment::ALL[0];
        for s in Sentiment::ALL.iter().skip(1) {
            if self.get(*s) > self.get(best) {
                best = *s;
            }
        }
        Some(best)
    }

    /// Render as `[Q:n, +:n, =:n, -:n]`.
    pub fn glyph_summary(&self) -> String {
        let parts: Vec<String> = Sentiment::ALL
            .iter()
            .map(|s| format!("{}:{}", s.short_code(), self.get(*s)))
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn slot_mut(&mut self, sentiment: Sentiment) -> &mut u64 {
        match sentiment {
            Sentiment::Question => &mut self.question,
            Sentiment::PositiveAffirmation => &mut self.positive,
            Sentiment::NeutralAffirmation => &mut self.neutral,
            Sentiment::NegativeAffirmation => &mut self.negative,
        }
    }
}

impl FromIterator<Sentiment> for SentimentCounts {
    fn from_iter<I: IntoIterator<Item = Sentiment>>(iter: I) -> Self {
        let mut counts = SentimentCounts::default();
        for s in iter {
            counts.add(s);
        }
        counts
    }
}
