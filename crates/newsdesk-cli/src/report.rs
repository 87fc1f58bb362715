//! Report publisher: sweep feeds, aggregate per reporter, and publish the
//! derived JSON documents to storage.

use sqlx::PgPool;

use newsdesk_core::{AggregateReport, AttributionConfig};
use newsdesk_feed::BylineParser;
use newsdesk_storage::FeedStore;

/// Object key for the published aggregate document.
const REPORT_KEY: &str = "data.json";

/// Object key for the merged evaluations document.
const EVALUATIONS_KEY: &str = "evaluations.json";

/// Sweeps every feed under `prefix`, aggregates attributed print articles
/// per reporter, and overwrites `data.json` in storage.
///
/// Unreadable feeds are skipped and counted; the run fails only when no
/// feed could be processed at all, or when the final write fails.
pub(crate) async fn run_report(
    store: &FeedStore,
    rules: &AttributionConfig,
    prefix: &str,
) -> anyhow::Result<()> {
    let dates = store.list_feed_dates(prefix).await?;
    if dates.is_empty() {
        anyhow::bail!("no feeds found for prefix \"{prefix}\"");
    }

    let parser = BylineParser::new(rules);
    let mut articles = Vec::new();
    let mut feeds_processed = 0usize;
    let mut feeds_failed = 0usize;

    for date_key in &dates {
        let parse = match store.get_feed(date_key).await {
            Ok(xml) => match newsdesk_feed::normalize_feed(&xml, date_key, &parser) {
                Ok(parse) => parse,
                Err(e) => {
                    tracing::warn!(feed = %date_key, error = %e, "feed parse failed — skipping");
                    feeds_failed += 1;
                    continue;
                }
            },
            Err(e) => {
                tracing::warn!(feed = %date_key, error = %e, "feed fetch failed — skipping");
                feeds_failed += 1;
                continue;
            }
        };
        articles.extend(parse.articles);
        feeds_processed += 1;
    }

    if feeds_processed == 0 {
        anyhow::bail!("all {feeds_failed} feeds failed; nothing to report");
    }

    let reporters = newsdesk_feed::aggregate(&articles, &rules.article_id_marker);
    let total_articles: i64 = reporters.iter().map(|r| r.article_count).sum();

    let report = AggregateReport {
        last_sync: chrono::Local::now().format("%Y-%m-%d %H:%M").to_string(),
        period_start: iso_or_raw(dates.first().map(String::as_str).unwrap_or_default()),
        period_end: iso_or_raw(dates.last().map(String::as_str).unwrap_or_default()),
        total_articles,
        total_reporters: i64::try_from(reporters.len()).unwrap_or(i64::MAX),
        reporters,
    };

    store
        .put_json(REPORT_KEY, &serde_json::to_value(&report)?)
        .await?;

    println!(
        "published {REPORT_KEY}: {} articles across {} reporters ({} ~ {}, {feeds_processed}/{} feeds)",
        report.total_articles,
        report.total_reporters,
        report.period_start,
        report.period_end,
        dates.len()
    );
    Ok(())
}

/// Exports the stored evaluations into `evaluations.json`, merging them
/// over whatever the document already holds rather than overwriting it.
pub(crate) async fn export_evaluations(pool: &PgPool, store: &FeedStore) -> anyhow::Result<()> {
    let rows = newsdesk_db::evaluations::list_evaluations_for_export(pool).await?;

    let mut updates = serde_json::Map::new();
    for row in rows {
        updates.insert(
            format!("{}:{}", row.source_id, row.reporter_name),
            serde_json::json!({
                "position": row.position,
                "coverage_type": row.coverage_type,
                "article_nature": row.article_nature,
                "impact_grade": row.impact_grade,
                "is_exclusive": row.is_exclusive,
                "is_scoop": row.is_scoop,
                "memo": row.memo,
            }),
        );
    }

    if updates.is_empty() {
        println!("no evaluations to export");
        return Ok(());
    }

    let merged = store.merge_json(EVALUATIONS_KEY, updates).await?;
    println!("merged {merged} evaluations into {EVALUATIONS_KEY}");
    Ok(())
}

fn iso_or_raw(date_key: &str) -> String {
    newsdesk_feed::pubdate::date_key_to_iso(date_key).unwrap_or_else(|| date_key.to_owned())
}
