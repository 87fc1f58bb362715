//! Value types shared across the ingestion pipeline, store, and API.

use serde::{Deserialize, Serialize};

/// One attributed print article, fully normalized.
///
/// A source item with a joint byline produces one of these per credited
/// reporter, identical except for `reporter_name`. Only items with
/// `paper_number >= 1` (printed in the physical paper) are ever represented
/// by this type; online-only items are filtered out during normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedArticle {
    /// Canonical article identifier from the source system.
    pub source_id: String,
    pub title: String,
    /// The original byline string, kept verbatim for audit.
    pub raw_author: String,
    pub reporter_name: String,
    /// Print-edition date, `YYYY-MM-DD`.
    pub publish_date: String,
    /// Filing time as reported by the source; best effort, may be empty.
    pub publish_time: String,
    /// Cleaned body text preview (first 500 chars).
    pub content: String,
    /// Count of non-whitespace characters in the full cleaned body.
    pub char_count: i64,
    pub url: String,
    pub paper_number: i64,
    pub paper_position: String,
    pub paper_paragraph: String,
    pub is_top_placement: bool,
    pub category: String,
}

/// Per-reporter rollup of deduplicated articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterAggregate {
    pub name: String,
    pub articles: Vec<NormalizedArticle>,
    pub total_chars: i64,
    pub article_count: i64,
    pub avg_chars: i64,
}

/// The published `data.json` document shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregateReport {
    /// `YYYY-MM-DD HH:MM` of the run that produced this document.
    pub last_sync: String,
    pub period_start: String,
    pub period_end: String,
    pub total_articles: i64,
    pub total_reporters: i64,
    pub reporters: Vec<ReporterAggregate>,
}
