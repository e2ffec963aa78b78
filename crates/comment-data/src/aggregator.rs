//! Sentiment, theme and popularity aggregation over processed comments.

use comment_core::formatting::count_percentage;
use comment_core::models::{ProcessedComment, Sentiment, SentimentCounts};
use comment_core::themes::{Theme, THEMES};

// ── SentimentDistribution ─────────────────────────────────────────────────────

/// Sentiment counts plus headline statistics for a batch.
#[derive(Debug, Clone, Default)]
pub struct SentimentDistribution {
    pub total: usize,
    pub counts: SentimentCounts,
    pub average_likes: f64,
}

impl SentimentDistribution {
    /// Share of comments in `sentiment`, as an unrounded percentage.
    pub fn percentage(&self, sentiment: Sentiment) -> f64 {
        count_percentage(self.counts.get(sentiment), self.total)
    }

    pub fn most_common(&self) -> Option<Sentiment> {
        self.counts.most_common()
    }
}

// ── Theme statistics ──────────────────────────────────────────────────────────

/// A comment that matched a theme, as listed in the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeHit {
    pub text: String,
    pub likes: u64,
}

/// Everything counted for one theme.
#[derive(Debug, Clone)]
pub struct ThemeStat {
    pub theme: &'static Theme,
    pub count: u64,
    pub sentiments: SentimentCounts,
    pub hits: Vec<ThemeHit>,
}

impl ThemeStat {
    fn new(theme: &'static Theme) -> Self {
        Self {
            theme,
            count: 0,
            sentiments: SentimentCounts::default(),
            hits: Vec::new(),
        }
    }

    fn add(&mut self, comment: &ProcessedComment) {
        self.count += 1;
        self.sentiments.add(comment.sentiment);
        self.hits.push(ThemeHit {
            text: comment.comment.text.clone(),
            likes: comment.comment.likes,
        });
    }

    /// Hits ordered by likes, most liked first; ties keep input order.
    pub fn hits_by_likes(&self) -> Vec<&ThemeHit> {
        let mut hits: Vec<&ThemeHit> = self.hits.iter().collect();
        hits.sort_by(|a, b| b.likes.cmp(&a.likes));
        hits
    }
}

/// A country-theme hit tagged with the country's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct CountryHit {
    pub country: String,
    pub text: String,
    pub likes: u64,
}

/// Result of scanning a batch against the theme table.
#[derive(Debug, Clone)]
pub struct ThemeAnalysis {
    /// Number of comments scanned.
    pub total: usize,
    /// One entry per theme, in table order.
    pub stats: Vec<ThemeStat>,
}

impl ThemeAnalysis {
    pub fn percentage(&self, stat: &ThemeStat) -> f64 {
        count_percentage(stat.count, self.total)
    }

    pub fn service_stats(&self) -> impl Iterator<Item = &ThemeStat> {
        self.stats.iter().filter(|s| !s.theme.is_country())
    }

    /// Countries with at least one mention, most mentioned first; ties keep
    /// table order.
    pub fn ranked_countries(&self) -> Vec<&ThemeStat> {
        let mut countries: Vec<&ThemeStat> = self
            .stats
            .iter()
            .filter(|s| s.theme.is_country() && s.count > 0)
            .collect();
        countries.sort_by(|a, b| b.count.cmp(&a.count));
        countries
    }

    /// Sum of all country mentions. A comment naming two countries counts twice.
    pub fn total_country_mentions(&self) -> u64 {
        self.stats
            .iter()
            .filter(|s| s.theme.is_country())
            .map(|s| s.count)
            .sum()
    }

    /// Every country hit, most liked first.
    pub fn country_hits_by_likes(&self) -> Vec<CountryHit> {
        let mut hits: Vec<CountryHit> = self
            .ranked_countries()
            .into_iter()
            .flat_map(|stat| {
                let country = stat.theme.display_name();
                stat.hits.iter().map(move |hit| CountryHit {
                    country: country.clone(),
                    text: hit.text.clone(),
                    likes: hit.likes,
                })
            })
            .collect();
        hits.sort_by(|a, b| b.likes.cmp(&a.likes));
        hits
    }

    pub fn get(&self, theme_name: &str) -> Option<&ThemeStat> {
        self.stats.iter().find(|s| s.theme.name == theme_name)
    }
}

// ── Ranking ───────────────────────────────────────────────────────────────────

/// A comment with its 1-based position in the input batch.
#[derive(Debug, Clone, Copy)]
pub struct RankedComment<'a> {
    pub position: usize,
    pub comment: &'a ProcessedComment,
}

// ── CommentAggregator ─────────────────────────────────────────────────────────

/// Stateless helper that computes report statistics.
pub struct CommentAggregator;

impl CommentAggregator {
    /// Count sentiments and average likes.
    pub fn sentiment_distribution(comments: &[ProcessedComment]) -> SentimentDistribution {
        let counts: SentimentCounts = comments.iter().map(|c| c.sentiment).collect();
        let average_likes = if comments.is_empty() {
            0.0
        } else {
            comments.iter().map(|c| c.comment.likes as f64).sum::<f64>() / comments.len() as f64
        };

        SentimentDistribution {
            total: comments.len(),
            counts,
            average_likes,
        }
    }

    /// Scan every comment (original and cleaned text together) against the
    /// theme table.
    pub fn analyze_themes(comments: &[ProcessedComment]) -> ThemeAnalysis {
        let mut stats: Vec<ThemeStat> = THEMES.iter().map(ThemeStat::new).collect();

        for comment in comments {
            let haystack = format!("{} {}", comment.comment.text, comment.cleaned_text);
            for stat in stats.iter_mut() {
                if stat.theme.matches(&haystack) {
                    stat.add(comment);
                }
            }
        }

        ThemeAnalysis {
            total: comments.len(),
            stats,
        }
    }

    /// The `top_n` most liked comments, ties keeping input order.
    pub fn most_liked(comments: &[ProcessedComment], top_n: usize) -> Vec<RankedComment<'_>> {
        let mut ranked = Self::by_likes(comments);
        ranked.truncate(top_n);
        ranked
    }

    /// All comments ordered by likes, most liked first.
    pub fn by_likes(comments: &[ProcessedComment]) -> Vec<RankedComment<'_>> {
        let mut ranked: Vec<RankedComment<'_>> = comments
            .iter()
            .enumerate()
            .map(|(i, comment)| RankedComment {
                position: i + 1,
                comment,
            })
            .collect();
        ranked.sort_by(|a, b| b.comment.comment.likes.cmp(&a.comment.comment.likes));
        ranked
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
