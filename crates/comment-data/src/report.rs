//! Plain-text analysis report.
//!
//! The report has three sections, in order: sentiment summary, theme and
//! country breakdown, and the most liked comments.

use chrono::SecondsFormat;
use comment_core::formatting::{count_percentage, preview};
use comment_core::models::{ProcessedComment, Sentiment};

use crate::aggregator::{
    CommentAggregator, RankedComment, SentimentDistribution, ThemeAnalysis,
};

/// Longest comment preview shown in theme lists.
pub const PREVIEW_CHARS: usize = 200;

const RULE: &str = "====================================";

// ── Public API ────────────────────────────────────────────────────────────────

/// Build the full report, or `None` for an empty batch.
pub fn build_report(comments: &[ProcessedComment], top_n: usize) -> Option<String> {
    if comments.is_empty() {
        return None;
    }

    let distribution = CommentAggregator::sentiment_distribution(comments);
    let themes = CommentAggregator::analyze_themes(comments);
    let top = CommentAggregator::most_liked(comments, top_n);

    Some(
        [
            render_sentiment_summary(&distribution),
            render_themes(&themes),
            render_most_liked(&top, top_n),
        ]
        .join("\n\n"),
    )
}

/// Sentiment counts, percentages, average likes and the dominant category.
pub fn render_sentiment_summary(dist: &SentimentDistribution) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push("=== Sentiment Analysis Summary ===".to_string());
    out.push(format!("Total Comments Analyzed: {}", dist.total));
    out.push(String::new());
    out.push("Sentiment Distribution:".to_string());
    for sentiment in Sentiment::ALL {
        out.push(format!(
            "{}: {} ({:.2}%)",
            sentiment.display_name(),
            dist.counts.get(sentiment),
            dist.percentage(sentiment)
        ));
    }
    out.push(String::new());
    out.push("Additional Statistics:".to_string());
    out.push(format!("Average Likes per Comment: {:.5}", dist.average_likes));
    out.push(format!(
        "Most Common Sentiment: {}",
        dist.most_common().map(|s| s.label()).unwrap_or("n/a")
    ));
    out.push(RULE.to_string());
    out.join("\n")
}

/// Service themes with their comments, then the country breakdown.
pub fn render_themes(analysis: &ThemeAnalysis) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push("=== Themes Analysis Summary ===".to_string());
    out.push(format!("Total Comments Analyzed: {}", analysis.total));
    out.push(String::new());
    out.push("--- Service-Related Themes ---".to_string());

    for stat in analysis.service_stats() {
        let mut line = format!(
            "{}: {} ({:.2}%)",
            stat.theme.display_name(),
            stat.count,
            analysis.percentage(stat)
        );
        if stat.count > 0 {
            line.push(' ');
            line.push_str(&stat.sentiments.glyph_summary());
        }
        out.push(line);
        out.push(format!("Keywords: {}", stat.theme.keywords.join(", ")));

        if stat.count > 0 {
            out.push("Comments:".to_string());
            for hit in stat.hits_by_likes() {
                out.push(format!("- {}", preview(&hit.text, PREVIEW_CHARS)));
            }
            out.push(String::new());
        }
    }

    out.push(String::new());
    out.push("--- Country-Specific Comments ---".to_string());
    for stat in analysis.ranked_countries() {
        out.push(format!(
            "{}: {} ({:.2}%) {}",
            stat.theme.display_name(),
            stat.count,
            analysis.percentage(stat),
            stat.sentiments.glyph_summary()
        ));
    }

    let mentions = analysis.total_country_mentions();
    if mentions > 0 {
        out.push(String::new());
        out.push(format!(
            "Total Country-Related Comments: {} ({:.2}%)",
            mentions,
            count_percentage(mentions, analysis.total)
        ));
        out.push("Comments by Country:".to_string());
        for hit in analysis.country_hits_by_likes() {
            out.push(format!(
                "- [{}] {}",
                hit.country,
                preview(&hit.text, PREVIEW_CHARS)
            ));
        }
    }

    out.push(RULE.to_string());
    out.join("\n")
}

/// Full details of the most liked comments.
pub fn render_most_liked(top: &[RankedComment<'_>], top_n: usize) -> String {
    let mut out = Vec::new();
    out.push(RULE.to_string());
    out.push(format!("=== Top {} Most Liked Comments ===", top_n));

    for (rank, ranked) in top.iter().enumerate() {
        let c = ranked.comment;
        out.push(String::new());
        out.push(format!(
            "--- #{} Most Liked Comment (ID:{}) ---",
            rank + 1,
            ranked.position
        ));
        out.push(format!("Author: {}", c.comment.author));
        out.push(format!("Likes: {}", c.comment.likes));
        out.push(format!(
            "Published at: {}",
            c.comment
                .published_at
                .to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
        out.push(String::new());
        out.push("Original text:".to_string());
        out.push(c.comment.text.clone());
        out.push(String::new());
        out.push("Cleaned/translated text:".to_string());
        out.push(c.cleaned_text.clone());
        out.push(String::new());
        out.push(format!("Sentiment: {}", c.sentiment));
    }

    out.push(RULE.to_string());
    out.join("\n")
}

/// Console listing of every comment by likes: author, likes, cleaned text.
pub fn render_likes_table(comments: &[ProcessedComment]) -> String {
    let ranked = CommentAggregator::by_likes(comments);
    let author_width = ranked
        .iter()
        .map(|r| r.comment.comment.author.chars().count())
        .max()
        .unwrap_or(0)
        .max("author".len());

    let mut out = Vec::with_capacity(ranked.len() + 2);
    out.push("Comments sorted by likes (descending):".to_string());
    out.push(format!("{:<width$}  {:>6}  cleaned_text", "author", "likes", width = author_width));
    for r in ranked {
        out.push(format!(
            "{:<width$}  {:>6}  {}",
            r.comment.comment.author,
            r.comment.comment.likes,
            preview(&r.comment.cleaned_text, 80),
            width = author_width
        ));
    }
    out.join("\n")
}

// ── Tests ─────────────────────────────────────────────────────────────────────
