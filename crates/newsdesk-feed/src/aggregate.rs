//! Duplicate collapsing and per-reporter rollups.
//!
//! The same story is sometimes re-filed under a corrected headline at the
//! same permanent link, so the dedup key prefers the article-ID segment of
//! the URL and only falls back to `(title, publish_date)` when the link
//! carries no recognizable ID. Deduplication is applied within one
//! reporter's group: a joint-byline article legitimately appears once per
//! credited reporter.

use std::collections::{HashMap, HashSet};

use newsdesk_core::{NormalizedArticle, ReporterAggregate};

/// Deduplication key for one article.
///
/// `marker` is the URL path segment preceding the article ID
/// (`AttributionConfig::article_id_marker`).
#[must_use]
pub fn dedup_key(article: &NormalizedArticle, marker: &str) -> String {
    match article_id_from_url(&article.url, marker) {
        Some(id) => format!("id:{id}"),
        None => format!("td:{}\u{1f}{}", article.title, article.publish_date),
    }
}

/// Extracts the article-ID path segment following `marker`, with any query
/// string, fragment, or trailing slash removed. `None` when the URL does
/// not contain the marker or the segment is empty.
#[must_use]
pub fn article_id_from_url(url: &str, marker: &str) -> Option<String> {
    let start = url.find(marker)? + marker.len();
    let id = url[start..]
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim_end_matches('/');
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// Groups articles by reporter, deduplicates within each group, and returns
/// rollups ordered by descending article count (ties keep first-seen
/// reporter order).
#[must_use]
pub fn aggregate(articles: &[NormalizedArticle], marker: &str) -> Vec<ReporterAggregate> {
    // First-seen order is the tie-break, so groups live in a Vec with a
    // name → index side table rather than a map alone.
    let mut order: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<NormalizedArticle>, HashSet<String>)> = Vec::new();

    for article in articles {
        let idx = match order.get(article.reporter_name.as_str()) {
            Some(&idx) => idx,
            None => {
                order.insert(&article.reporter_name, groups.len());
                groups.push((article.reporter_name.clone(), Vec::new(), HashSet::new()));
                groups.len() - 1
            }
        };

        let (_, kept, seen) = &mut groups[idx];
        if seen.insert(dedup_key(article, marker)) {
            kept.push(article.clone());
        }
    }

    let mut aggregates: Vec<ReporterAggregate> = groups
        .into_iter()
        .map(|(name, articles, _)| {
            let total_chars: i64 = articles.iter().map(|a| a.char_count).sum();
            let article_count = i64::try_from(articles.len()).unwrap_or(i64::MAX);
            let avg_chars = if article_count > 0 {
                total_chars / article_count
            } else {
                0
            };
            ReporterAggregate {
                name,
                articles,
                total_chars,
                article_count,
                avg_chars,
            }
        })
        .collect();

    // Stable sort: equal counts preserve first-seen insertion order.
    aggregates.sort_by_key(|a| std::cmp::Reverse(a.article_count));
    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "/NewsView/";

    fn article(reporter: &str, source_id: &str, title: &str, chars: i64) -> NormalizedArticle {
        NormalizedArticle {
            source_id: source_id.to_string(),
            title: title.to_string(),
            raw_author: format!("{reporter} 기자"),
            reporter_name: reporter.to_string(),
            publish_date: "2026-01-12".to_string(),
            publish_time: String::new(),
            content: String::new(),
            char_count: chars,
            url: format!("https://news.example.com/NewsView/{source_id}"),
            paper_number: 3,
            paper_position: String::new(),
            paper_paragraph: String::new(),
            is_top_placement: false,
            category: String::new(),
        }
    }

    #[test]
    fn url_id_extraction_strips_query_string() {
        assert_eq!(
            article_id_from_url(
                "https://news.example.com/NewsView/29XKCDQ8FE?ref=rss",
                MARKER
            )
            .as_deref(),
            Some("29XKCDQ8FE")
        );
    }

    #[test]
    fn url_without_marker_yields_no_id() {
        assert_eq!(
            article_id_from_url("https://news.example.com/story/12345", MARKER),
            None
        );
        assert_eq!(article_id_from_url("", MARKER), None);
    }

    #[test]
    fn fallback_key_uses_title_and_date() {
        let mut a = article("홍길동", "X", "제목", 100);
        a.url = String::new();
        let key = dedup_key(&a, MARKER);
        assert!(key.starts_with("td:"));
        assert!(key.contains("제목"));
        assert!(key.contains("2026-01-12"));
    }

    #[test]
    fn refiled_headline_collapses_to_one_article() {
        // Same permanent link, edited title: one story, counted once.
        let articles = vec![
            article("홍길동", "29SAME", "원래 제목", 900),
            article("홍길동", "29SAME", "수정된 제목", 950),
        ];
        let aggregates = aggregate(&articles, MARKER);
        assert_eq!(aggregates.len(), 1);
        assert_eq!(aggregates[0].article_count, 1);
        assert_eq!(aggregates[0].total_chars, 900);
        assert_eq!(aggregates[0].articles[0].title, "원래 제목");
    }

    #[test]
    fn joint_byline_copies_kept_once_per_reporter() {
        let articles = vec![
            article("홍길동", "29JOINT", "공동 기사", 800),
            article("김철수", "29JOINT", "공동 기사", 800),
        ];
        let aggregates = aggregate(&articles, MARKER);
        assert_eq!(aggregates.len(), 2);
        assert!(aggregates.iter().all(|a| a.article_count == 1));
    }

    #[test]
    fn ordered_by_count_desc_with_first_seen_tiebreak() {
        let articles = vec![
            article("홍길동", "29A", "하나", 100),
            article("김철수", "29B", "둘", 100),
            article("김철수", "29C", "셋", 100),
            article("박지은", "29D", "넷", 100),
        ];
        let aggregates = aggregate(&articles, MARKER);
        let names: Vec<&str> = aggregates.iter().map(|a| a.name.as_str()).collect();
        // 김철수 has 2; 홍길동 and 박지은 tie at 1 in first-seen order.
        assert_eq!(names, vec!["김철수", "홍길동", "박지은"]);
    }

    #[test]
    fn totals_computed_after_dedup() {
        let articles = vec![
            article("홍길동", "29A", "하나", 1000),
            article("홍길동", "29A", "하나 (수정)", 1100),
            article("홍길동", "29B", "둘", 500),
        ];
        let aggregates = aggregate(&articles, MARKER);
        assert_eq!(aggregates[0].article_count, 2);
        assert_eq!(aggregates[0].total_chars, 1500);
        assert_eq!(aggregates[0].avg_chars, 750);
    }

    #[test]
    fn permuted_input_yields_same_aggregate_set() {
        let base = vec![
            article("홍길동", "29A", "하나", 100),
            article("김철수", "29B", "둘", 200),
            article("김철수", "29C", "셋", 300),
        ];
        let mut permuted = base.clone();
        permuted.reverse();

        let mut a = aggregate(&base, MARKER);
        let mut b = aggregate(&permuted, MARKER);
        a.sort_by(|x, y| x.name.cmp(&y.name));
        b.sort_by(|x, y| x.name.cmp(&y.name));
        for (x, y) in a.iter().zip(b.iter()) {
            assert_eq!(x.name, y.name);
            assert_eq!(x.article_count, y.article_count);
            assert_eq!(x.total_chars, y.total_chars);
        }
    }

    #[test]
    fn distinct_articles_without_urls_do_not_collapse() {
        let mut first = article("홍길동", "29A", "제목 하나", 100);
        first.url = String::new();
        let mut second = article("홍길동", "29B", "제목 둘", 200);
        second.url = String::new();
        let aggregates = aggregate(&[first, second], MARKER);
        assert_eq!(aggregates[0].article_count, 2);
    }
}
